use crate::backend::RecipeBackend;
use crate::drafts::DraftStore;
use crate::errors::{EditorError, EditorResult};
use crate::forms::{IngredientLine, RecipeForm};
use crate::session::Session;
use kb::basic_models::Recipe;

/// Which form field a change applies to. Mirrors the inputs of the recipe
/// form one to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Servings,
    Instructions,
    ImgUrl,
    CategoryId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    Name,
    QuantityUnit,
    AdditionalInfo,
}

/// An in-progress edit of one existing recipe. Only [`RecipeEditor::load_for_edit`]
/// constructs this, so by the time any change lands here the authoritative
/// record has loaded; every change is mirrored into the draft store.
#[derive(Debug)]
pub struct EditSession {
    pub recipe_id: String,
    pub form: RecipeForm,
    pub ingredients: Vec<IngredientLine>,
    drafts: DraftStore,
}

impl EditSession {
    pub fn set_field(&mut self, field: FormField, value: &str) {
        let value = value.to_string();
        match field {
            FormField::Name => self.form.name = value,
            FormField::Description => self.form.description = value,
            FormField::Servings => self.form.servings = value,
            FormField::Instructions => self.form.instructions = value,
            FormField::ImgUrl => self.form.img_url = value,
            FormField::CategoryId => self.form.category_id = value,
        }
        self.persist_draft();
    }

    pub fn set_ingredient(&mut self, index: usize, field: IngredientField, value: &str) {
        if let Some(line) = self.ingredients.get_mut(index) {
            let value = value.to_string();
            match field {
                IngredientField::Name => line.name = value,
                IngredientField::QuantityUnit => line.quantity_unit = value,
                IngredientField::AdditionalInfo => line.additional_info = value,
            }
        }
        self.persist_draft();
    }

    pub fn add_ingredient(&mut self) {
        self.ingredients.push(IngredientLine::default());
        self.persist_draft();
    }

    pub fn remove_ingredient(&mut self, index: usize) {
        if index < self.ingredients.len() {
            self.ingredients.remove(index);
        }
        self.persist_draft();
    }

    /// Replace the whole ingredient list at once.
    pub fn set_ingredients(&mut self, ingredients: Vec<IngredientLine>) {
        self.ingredients = ingredients;
        self.persist_draft();
    }

    /// Abandon the edit: the draft is removed and nothing is written remotely.
    pub fn cancel(self) {
        self.drafts.clear(&self.recipe_id);
    }

    fn persist_draft(&self) {
        if let Err(e) = self.drafts.save_form(&self.recipe_id, &self.form) {
            tracing::warn!("Failed to persist form draft: {:#}", e);
        }
        if let Err(e) = self
            .drafts
            .save_ingredients(&self.recipe_id, &self.ingredients)
        {
            tracing::warn!("Failed to persist ingredient draft: {:#}", e);
        }
    }
}

/// The recipe editing workflow: create and edit a recipe together with its
/// ingredients against the hosted backend, with local draft persistence and
/// client-side ownership checks. The recipe row and its ingredient rows are
/// two independently writable tables; this type is what keeps them
/// consistent, since no transaction spans the two.
pub struct RecipeEditor<B: RecipeBackend> {
    backend: B,
    drafts: DraftStore,
    session: Session,
}

impl<B: RecipeBackend> RecipeEditor<B> {
    pub fn new(backend: B, drafts: DraftStore, session: Session) -> Self {
        Self {
            backend,
            drafts,
            session,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the current user may edit or delete this recipe. This is the
    /// same comparison the guard below enforces, exposed so views can hide
    /// the controls; it is a convenience, not a security boundary.
    pub fn can_modify(&self, recipe: &Recipe) -> bool {
        recipe.user_id == self.session.user_id
    }

    /// Create a new recipe with its ingredients. Two dependent writes: the
    /// recipe row first (obtaining the server-assigned id), then one bulk
    /// insert of the parsed ingredient rows. If the ingredient insert fails
    /// the orphaned recipe row is deleted again; should that compensating
    /// delete fail too, the recipe remains with zero ingredients and only the
    /// ingredient error is reported.
    pub async fn create(
        &self,
        form: &RecipeForm,
        ingredients: &[IngredientLine],
    ) -> EditorResult<Recipe> {
        form.validate(ingredients)?;

        let recipe = self
            .backend
            .insert_recipe(&form.to_new_recipe(&self.session.user_id))
            .await
            .map_err(|e| EditorError::backend(format!("Failed to create recipe: {}", e)))?;
        tracing::info!("Created recipe {}", recipe.id);

        let rows: Vec<_> = ingredients
            .iter()
            .map(|line| line.to_new_ingredient(&recipe.id))
            .collect();
        if let Err(e) = self.backend.insert_ingredients(&rows).await {
            tracing::warn!(
                "Ingredient insert failed for new recipe {}, deleting the orphaned row",
                recipe.id
            );
            if let Err(cleanup) = self.backend.delete_recipe(&recipe.id).await {
                tracing::warn!(
                    "Compensating delete of recipe {} failed as well: {}",
                    recipe.id,
                    cleanup
                );
            }
            return Err(EditorError::backend(format!(
                "Failed to add ingredients: {}",
                e
            )));
        }

        Ok(recipe)
    }

    /// Load an existing recipe into an edit session. Any stale draft for
    /// this id is cleared before the authoritative record is fetched, so the
    /// form always starts from what the backend has. Fails with
    /// [`EditorError::Forbidden`] before any form state is built when the
    /// recipe belongs to someone else.
    pub async fn load_for_edit(&self, recipe_id: &str) -> EditorResult<EditSession> {
        self.drafts.clear(recipe_id);

        let recipe = self.backend.get_recipe(recipe_id).await?;
        if !self.can_modify(&recipe) {
            return Err(EditorError::Forbidden);
        }

        let stored = self.backend.list_ingredients(recipe_id).await?;
        let mut ingredients: Vec<IngredientLine> =
            stored.iter().map(IngredientLine::from_ingredient).collect();
        if ingredients.is_empty() {
            // Always show one blank line to fill in.
            ingredients.push(IngredientLine::default());
        }

        Ok(EditSession {
            recipe_id: recipe_id.to_string(),
            form: RecipeForm::from_recipe(&recipe),
            ingredients,
            drafts: self.drafts.clone(),
        })
    }

    /// Persist an edit session: update the recipe row, then replace the
    /// ingredient set by deleting every existing row and bulk-inserting the
    /// re-parsed lines. No transaction spans the three steps; a failure
    /// between delete and insert leaves the recipe with zero ingredients.
    pub async fn submit_update(&self, edit: &EditSession) -> EditorResult<()> {
        edit.form.validate(&edit.ingredients)?;

        self.backend
            .update_recipe(&edit.recipe_id, &edit.form.to_patch())
            .await?;
        self.backend.delete_ingredients(&edit.recipe_id).await?;

        let rows: Vec<_> = edit
            .ingredients
            .iter()
            .map(|line| line.to_new_ingredient(&edit.recipe_id))
            .collect();
        self.backend
            .insert_ingredients(&rows)
            .await
            .map_err(|e| EditorError::backend(format!("Failed to update ingredients: {}", e)))?;

        self.drafts.clear(&edit.recipe_id);
        tracing::info!("Updated recipe {}", edit.recipe_id);
        Ok(())
    }

    /// Delete a recipe and its ingredients, ownership-gated like edit.
    pub async fn delete(&self, recipe_id: &str) -> EditorResult<()> {
        let recipe = self.backend.get_recipe(recipe_id).await?;
        if !self.can_modify(&recipe) {
            return Err(EditorError::Forbidden);
        }
        self.backend.delete_ingredients(recipe_id).await?;
        self.backend.delete_recipe(recipe_id).await?;
        self.drafts.clear(recipe_id);
        tracing::info!("Deleted recipe {}", recipe_id);
        Ok(())
    }
}
