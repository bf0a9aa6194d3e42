use crate::backend::RecipeBackend;
use crate::errors::EditorResult;
use crate::session::Session;
use kb::basic_models::{Ingredient, Recipe};

/// Everything the recipe detail view needs in one place: the recipe, its
/// ingredients, and whether the current user may edit or delete it. The
/// `editable` flag only decides which controls to show; the editor enforces
/// the same ownership check again before any mutation.
#[derive(Debug)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    pub editable: bool,
}

pub async fn fetch_detail<B: RecipeBackend>(
    backend: &B,
    session: Option<&Session>,
    recipe_id: &str,
) -> EditorResult<RecipeDetail> {
    let recipe = backend.get_recipe(recipe_id).await?;
    let ingredients = backend.list_ingredients(recipe_id).await?;
    let editable = session.map_or(false, |s| s.user_id == recipe.user_id);
    Ok(RecipeDetail {
        recipe,
        ingredients,
        editable,
    })
}

/// Render one ingredient the way the detail view lists it:
/// `quantity unit name (additional info)`.
pub fn format_ingredient(ingredient: &Ingredient) -> String {
    let mut line = format!(
        "{} {} {}",
        ingredient.quantity, ingredient.unit, ingredient.name
    )
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ");
    if let Some(info) = ingredient
        .additional_info
        .as_deref()
        .filter(|i| !i.trim().is_empty())
    {
        line.push_str(&format!(" ({})", info));
    }
    line
}
