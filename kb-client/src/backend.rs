use crate::config::Config;
use crate::errors::{EditorError, EditorResult};
use async_trait::async_trait;
use kb::basic_models::{Category, Ingredient, NewIngredient, NewRecipe, Recipe, RecipePatch};
use serde::de::DeserializeOwned;

lazy_static::lazy_static! {
    pub(crate) static ref HTTP_CLIENT: reqwest::Client = reqwest::Client::new();
}

/// The relational operations the editor workflow needs from the hosted
/// backend. Kept behind a trait so the workflow can be exercised against an
/// in-memory double; [`RestBackend`] is the real implementation.
#[async_trait]
pub trait RecipeBackend: Send + Sync {
    /// All categories, ordered by display name.
    async fn list_categories(&self) -> EditorResult<Vec<Category>>;
    /// All recipes, optionally restricted to one category.
    async fn list_recipes(&self, category_id: Option<&str>) -> EditorResult<Vec<Recipe>>;
    /// Recipes created by one user, newest first.
    async fn list_recipes_by_owner(&self, user_id: &str) -> EditorResult<Vec<Recipe>>;
    /// Exactly one recipe. Zero rows is [`EditorError::NotFound`]; more than
    /// one is a backend error, since ids are meant to be unique.
    async fn get_recipe(&self, recipe_id: &str) -> EditorResult<Recipe>;
    async fn list_ingredients(&self, recipe_id: &str) -> EditorResult<Vec<Ingredient>>;
    /// Insert one recipe and return the stored row, including the
    /// server-assigned id.
    async fn insert_recipe(&self, recipe: &NewRecipe) -> EditorResult<Recipe>;
    async fn update_recipe(&self, recipe_id: &str, patch: &RecipePatch) -> EditorResult<()>;
    async fn delete_recipe(&self, recipe_id: &str) -> EditorResult<()>;
    /// Insert all rows in one call.
    async fn insert_ingredients(&self, ingredients: &[NewIngredient]) -> EditorResult<()>;
    /// Delete every ingredient belonging to one recipe.
    async fn delete_ingredients(&self, recipe_id: &str) -> EditorResult<()>;
}

/// PostgREST-style REST client against the hosted backend. Every call is a
/// single HTTP request; failures surface the service's message verbatim and
/// nothing is retried.
#[derive(Clone)]
pub struct RestBackend {
    base: String,
    anon_key: String,
    access_token: String,
}

impl RestBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
            access_token: config.access_token.clone(),
        }
    }

    fn table_url(&self, table: &str, filters: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.base, table, filters)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.access_token))
    }

    /// Check the response status, turning non-success into a backend error
    /// carrying whatever the service put in the body.
    async fn checked(response: reqwest::Response) -> EditorResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!("Backend call failed with {}: {}", status, message);
        Err(EditorError::Backend {
            message: if message.is_empty() {
                format!("Backend returned {}", status)
            } else {
                message
            },
        })
    }

    async fn get_rows<T: DeserializeOwned>(&self, url: &str) -> EditorResult<Vec<T>> {
        let response = self
            .authed(HTTP_CLIENT.get(url))
            .send()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        let rows = Self::checked(response)
            .await?
            .json()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        Ok(rows)
    }

    async fn send_checked(&self, request: reqwest::RequestBuilder) -> EditorResult<reqwest::Response> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        Self::checked(response).await
    }

    fn eq_filter(column: &str, value: &str) -> String {
        format!("{}=eq.{}", column, url_escape::encode_component(value))
    }
}

#[async_trait]
impl RecipeBackend for RestBackend {
    async fn list_categories(&self) -> EditorResult<Vec<Category>> {
        self.get_rows(&self.table_url("categories", "select=*&order=name.asc"))
            .await
    }

    async fn list_recipes(&self, category_id: Option<&str>) -> EditorResult<Vec<Recipe>> {
        let filters = match category_id {
            Some(id) => format!("select=*&{}", Self::eq_filter("category_id", id)),
            None => "select=*".to_string(),
        };
        self.get_rows(&self.table_url("recipes", &filters)).await
    }

    async fn list_recipes_by_owner(&self, user_id: &str) -> EditorResult<Vec<Recipe>> {
        let filters = format!(
            "select=*&{}&order=created_at.desc",
            Self::eq_filter("user_id", user_id)
        );
        self.get_rows(&self.table_url("recipes", &filters)).await
    }

    async fn get_recipe(&self, recipe_id: &str) -> EditorResult<Recipe> {
        let filters = format!("select=*&{}", Self::eq_filter("id", recipe_id));
        let mut rows: Vec<Recipe> = self.get_rows(&self.table_url("recipes", &filters)).await?;
        match rows.len() {
            0 => Err(EditorError::NotFound),
            1 => Ok(rows.remove(0)),
            n => Err(EditorError::backend(format!(
                "Expected exactly one recipe for id {}, got {}",
                recipe_id, n
            ))),
        }
    }

    async fn list_ingredients(&self, recipe_id: &str) -> EditorResult<Vec<Ingredient>> {
        let filters = format!("select=*&{}", Self::eq_filter("recipe_id", recipe_id));
        self.get_rows(&self.table_url("ingredients", &filters)).await
    }

    async fn insert_recipe(&self, recipe: &NewRecipe) -> EditorResult<Recipe> {
        let url = self.table_url("recipes", "select=*");
        let request = HTTP_CLIENT
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&[recipe]);
        let mut rows: Vec<Recipe> = self
            .send_checked(request)
            .await?
            .json()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| EditorError::backend("No recipe data returned"))
    }

    async fn update_recipe(&self, recipe_id: &str, patch: &RecipePatch) -> EditorResult<()> {
        let url = self.table_url("recipes", &Self::eq_filter("id", recipe_id));
        self.send_checked(HTTP_CLIENT.patch(&url).json(patch)).await?;
        Ok(())
    }

    async fn delete_recipe(&self, recipe_id: &str) -> EditorResult<()> {
        let url = self.table_url("recipes", &Self::eq_filter("id", recipe_id));
        self.send_checked(HTTP_CLIENT.delete(&url)).await?;
        Ok(())
    }

    async fn insert_ingredients(&self, ingredients: &[NewIngredient]) -> EditorResult<()> {
        let url = self.table_url("ingredients", "select=*");
        self.send_checked(HTTP_CLIENT.post(&url).json(&ingredients))
            .await?;
        Ok(())
    }

    async fn delete_ingredients(&self, recipe_id: &str) -> EditorResult<()> {
        let url = self.table_url("ingredients", &Self::eq_filter("recipe_id", recipe_id));
        self.send_checked(HTTP_CLIENT.delete(&url)).await?;
        Ok(())
    }
}
