use crate::forms::{IngredientLine, RecipeForm};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Durable local storage for in-progress edits, so an accidental reload does
/// not lose work that was never submitted. One JSON file per key:
/// `recipe_form_<id>.json` for the form fields and
/// `recipe_ingredients_<id>.json` for the ingredient list.
///
/// Everything here is best effort. There is no schema versioning; a draft
/// that no longer deserializes is simply treated as absent.
#[derive(Clone, Debug)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Creating draft directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn form_path(&self, recipe_id: &str) -> PathBuf {
        self.dir.join(format!("recipe_form_{}.json", recipe_id))
    }

    fn ingredients_path(&self, recipe_id: &str) -> PathBuf {
        self.dir
            .join(format!("recipe_ingredients_{}.json", recipe_id))
    }

    pub fn save_form(&self, recipe_id: &str, form: &RecipeForm) -> Result<()> {
        let json = serde_json::to_string(form)?;
        std::fs::write(self.form_path(recipe_id), json)?;
        Ok(())
    }

    pub fn save_ingredients(&self, recipe_id: &str, ingredients: &[IngredientLine]) -> Result<()> {
        let json = serde_json::to_string(ingredients)?;
        std::fs::write(self.ingredients_path(recipe_id), json)?;
        Ok(())
    }

    /// The stored form draft, if one exists and still parses. The edit flow
    /// never calls this itself; it exists for callers that explicitly opt in
    /// to restoring a draft.
    pub fn load_form(&self, recipe_id: &str) -> Option<RecipeForm> {
        let text = std::fs::read_to_string(self.form_path(recipe_id)).ok()?;
        serde_json::from_str(&text).ok()
    }

    pub fn load_ingredients(&self, recipe_id: &str) -> Option<Vec<IngredientLine>> {
        let text = std::fs::read_to_string(self.ingredients_path(recipe_id)).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Remove both draft files for a recipe. Called on successful submit, on
    /// cancel, and before each fresh load of the editor so a stale draft from
    /// an earlier visit never reappears.
    pub fn clear(&self, recipe_id: &str) {
        for path in [self.form_path(recipe_id), self.ingredients_path(recipe_id)] {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove draft {}: {}", path.display(), e);
                }
            }
        }
    }

    pub fn has_draft(&self, recipe_id: &str) -> bool {
        self.form_path(recipe_id).exists() || self.ingredients_path(recipe_id).exists()
    }
}
