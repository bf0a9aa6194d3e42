use serde::{Deserialize, Serialize};

/// A recipe row as stored by the backend. The `id` and `created_at` fields
/// are assigned by the server; `user_id` is set once at creation and never
/// changes afterwards, since it decides who may edit or delete the recipe.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub servings: i64,
    pub instructions: String,
    pub category_id: String,
    pub img_url: Option<String>,
    pub user_id: String,
    pub created_at: String,
}

/// The insert shape for a recipe: everything the server does not assign.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub servings: i64,
    pub instructions: String,
    pub category_id: String,
    pub img_url: Option<String>,
    pub user_id: String,
}

/// The update shape for a recipe. Deliberately has no `user_id`, so an
/// update can never reassign ownership.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecipePatch {
    pub name: String,
    pub description: String,
    pub servings: i64,
    pub instructions: String,
    pub category_id: String,
    pub img_url: Option<String>,
}

/// An ingredient row. Ingredients belong to exactly one recipe and have no
/// lifecycle of their own; on edit the whole set is replaced.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Ingredient {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub additional_info: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NewIngredient {
    pub recipe_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub additional_info: Option<String>,
}

/// A recipe category. Read-only from the client's perspective.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub img_url: Option<String>,
    pub created_at: String,
}

/// Profile fields attached to the authenticated user. The auth service
/// stores these as a free-form metadata object; on this side they are a
/// fixed set of typed optional fields.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
