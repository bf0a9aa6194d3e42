//! In-memory stand-in for the hosted backend, used by the workflow tests to
//! observe exactly which remote calls a code path issues and to inject
//! failures at specific steps.

use crate::backend::RecipeBackend;
use crate::errors::{EditorError, EditorResult};
use crate::forms::RecipeForm;
use async_trait::async_trait;
use kb::basic_models::{Category, Ingredient, NewIngredient, NewRecipe, Recipe, RecipePatch};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    recipes: Vec<Recipe>,
    ingredients: Vec<Ingredient>,
    categories: Vec<Category>,
    calls: Vec<&'static str>,
    next_id: u64,
    fail_insert_ingredients: bool,
    fail_delete_recipe: bool,
}

impl Inner {
    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        format!("gen-{}", self.next_id)
    }
}

pub struct MockState(Mutex<Inner>);

impl MockState {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Inner::default())))
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().calls.clone()
    }

    /// Only the calls that write: inserts, updates, deletes.
    pub fn mutating_calls(&self) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter(|c| {
                c.starts_with("insert_") || c.starts_with("update_") || c.starts_with("delete_")
            })
            .collect()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.0.lock().unwrap().recipes.clone()
    }

    pub fn ingredients_of(&self, recipe_id: &str) -> Vec<Ingredient> {
        self.0
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .filter(|i| i.recipe_id == recipe_id)
            .cloned()
            .collect()
    }

    pub fn fail_insert_ingredients(&self) {
        self.0.lock().unwrap().fail_insert_ingredients = true;
    }

    pub fn fail_delete_recipe(&self) {
        self.0.lock().unwrap().fail_delete_recipe = true;
    }

    /// Place a recipe directly into the store, bypassing call recording.
    pub fn seed_recipe(&self, id: &str, user_id: &str, form: &RecipeForm) -> String {
        let mut inner = self.0.lock().unwrap();
        let created_at = format!("2024-01-01T00:00:{:02}Z", inner.recipes.len());
        inner.recipes.push(Recipe {
            id: id.to_string(),
            name: form.name.clone(),
            description: form.description.clone(),
            servings: form.parsed_servings().unwrap_or(0),
            instructions: form.instructions.clone(),
            category_id: form.category_id.clone(),
            img_url: None,
            user_id: user_id.to_string(),
            created_at,
        });
        id.to_string()
    }

    pub fn seed_ingredient(
        &self,
        recipe_id: &str,
        name: &str,
        quantity: f64,
        unit: &str,
        additional_info: Option<&str>,
    ) {
        let mut inner = self.0.lock().unwrap();
        let id = inner.assign_id();
        inner.ingredients.push(Ingredient {
            id,
            recipe_id: recipe_id.to_string(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            additional_info: additional_info.map(str::to_string),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        });
    }

}

pub struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn new(state: Arc<MockState>) -> Self {
        Self { state }
    }

    fn record(&self, call: &'static str) {
        self.state.0.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RecipeBackend for MockBackend {
    async fn list_categories(&self) -> EditorResult<Vec<Category>> {
        self.record("list_categories");
        let mut categories = self.state.0.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_recipes(&self, category_id: Option<&str>) -> EditorResult<Vec<Recipe>> {
        self.record("list_recipes");
        let recipes = self.state.0.lock().unwrap().recipes.clone();
        Ok(match category_id {
            Some(id) => recipes.into_iter().filter(|r| r.category_id == id).collect(),
            None => recipes,
        })
    }

    async fn list_recipes_by_owner(&self, user_id: &str) -> EditorResult<Vec<Recipe>> {
        self.record("list_recipes_by_owner");
        let mut recipes: Vec<Recipe> = self
            .state
            .0
            .lock()
            .unwrap()
            .recipes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn get_recipe(&self, recipe_id: &str) -> EditorResult<Recipe> {
        self.record("get_recipe");
        let matches: Vec<Recipe> = self
            .state
            .0
            .lock()
            .unwrap()
            .recipes
            .iter()
            .filter(|r| r.id == recipe_id)
            .cloned()
            .collect();
        match matches.len() {
            0 => Err(EditorError::NotFound),
            1 => Ok(matches.into_iter().next().unwrap()),
            n => Err(EditorError::backend(format!("{} rows for {}", n, recipe_id))),
        }
    }

    async fn list_ingredients(&self, recipe_id: &str) -> EditorResult<Vec<Ingredient>> {
        self.record("list_ingredients");
        Ok(self.state.ingredients_of(recipe_id))
    }

    async fn insert_recipe(&self, recipe: &NewRecipe) -> EditorResult<Recipe> {
        self.record("insert_recipe");
        let mut inner = self.state.0.lock().unwrap();
        let id = inner.assign_id();
        let row = Recipe {
            id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            servings: recipe.servings,
            instructions: recipe.instructions.clone(),
            category_id: recipe.category_id.clone(),
            img_url: recipe.img_url.clone(),
            user_id: recipe.user_id.clone(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        inner.recipes.push(row.clone());
        Ok(row)
    }

    async fn update_recipe(&self, recipe_id: &str, patch: &RecipePatch) -> EditorResult<()> {
        self.record("update_recipe");
        let mut inner = self.state.0.lock().unwrap();
        for recipe in inner.recipes.iter_mut().filter(|r| r.id == recipe_id) {
            recipe.name = patch.name.clone();
            recipe.description = patch.description.clone();
            recipe.servings = patch.servings;
            recipe.instructions = patch.instructions.clone();
            recipe.category_id = patch.category_id.clone();
            recipe.img_url = patch.img_url.clone();
        }
        Ok(())
    }

    async fn delete_recipe(&self, recipe_id: &str) -> EditorResult<()> {
        self.record("delete_recipe");
        let mut inner = self.state.0.lock().unwrap();
        if inner.fail_delete_recipe {
            return Err(EditorError::backend("delete refused"));
        }
        inner.recipes.retain(|r| r.id != recipe_id);
        Ok(())
    }

    async fn insert_ingredients(&self, ingredients: &[NewIngredient]) -> EditorResult<()> {
        self.record("insert_ingredients");
        let mut inner = self.state.0.lock().unwrap();
        if inner.fail_insert_ingredients {
            return Err(EditorError::backend("ingredient insert refused"));
        }
        for new in ingredients {
            let id = inner.assign_id();
            inner.ingredients.push(Ingredient {
                id,
                recipe_id: new.recipe_id.clone(),
                name: new.name.clone(),
                quantity: new.quantity,
                unit: new.unit.clone(),
                additional_info: new.additional_info.clone(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_ingredients(&self, recipe_id: &str) -> EditorResult<()> {
        self.record("delete_ingredients");
        let mut inner = self.state.0.lock().unwrap();
        inner.ingredients.retain(|i| i.recipe_id != recipe_id);
        Ok(())
    }
}
