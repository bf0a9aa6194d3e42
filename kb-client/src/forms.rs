use kb::basic_models::{Ingredient, NewIngredient, NewRecipe, Recipe, RecipePatch};
use serde::{Deserialize, Serialize};

/// Split a free-text "quantity and unit" input such as `"1.5 l"` or `"3 Stk"`
/// into a numeric quantity and a unit token.
///
/// The input is trimmed and split on whitespace into at most two tokens. If
/// the first token does not parse as a number the quantity silently becomes 0;
/// the second token, when present, is the unit. This is best effort, not a
/// validating parse: `"200g"` has no whitespace, so the whole string ends up
/// as the unit with quantity 0.
pub fn split_quantity_unit(input: &str) -> (f64, String) {
    let trimmed = input.trim();
    let mut tokens = trimmed.split_whitespace();
    let parsed = tokens.next().unwrap_or_default().parse::<f64>();
    let unit = match tokens.next() {
        Some(unit) => unit.to_string(),
        // No parsable number and no second token: keep the raw text as the
        // unit so "200g" survives as "200g" rather than vanishing.
        None if parsed.is_err() => trimmed.to_string(),
        None => String::new(),
    };
    (parsed.unwrap_or(0.0), unit)
}

/// One ingredient row of the form, exactly as the user typed it.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct IngredientLine {
    pub name: String,
    pub quantity_unit: String,
    pub additional_info: String,
}

impl IngredientLine {
    /// Rebuild the form representation from a stored ingredient row, so an
    /// edit session starts from what the backend has.
    pub fn from_ingredient(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            quantity_unit: format!("{} {}", ingredient.quantity, ingredient.unit)
                .trim()
                .to_string(),
            additional_info: ingredient.additional_info.clone().unwrap_or_default(),
        }
    }

    /// Parse this line into the insert shape, tagged with its recipe.
    pub fn to_new_ingredient(&self, recipe_id: &str) -> NewIngredient {
        let (quantity, unit) = split_quantity_unit(&self.quantity_unit);
        let additional_info = self.additional_info.trim();
        NewIngredient {
            recipe_id: recipe_id.to_string(),
            name: self.name.trim().to_string(),
            quantity,
            unit,
            additional_info: if additional_info.is_empty() {
                None
            } else {
                Some(additional_info.to_string())
            },
        }
    }
}

/// Accepts the command-line shape `name|quantity unit|additional info`,
/// with the third part optional.
impl std::str::FromStr for IngredientLine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '|');
        let name = parts.next().unwrap_or_default().trim().to_string();
        let quantity_unit = parts
            .next()
            .ok_or_else(|| {
                anyhow::anyhow!("Expected 'name|quantity unit' or 'name|quantity unit|info', got {s:?}")
            })?
            .trim()
            .to_string();
        let additional_info = parts.next().unwrap_or_default().trim().to_string();
        Ok(Self {
            name,
            quantity_unit,
            additional_info,
        })
    }
}

/// The recipe form fields. All of them are strings because that is what the
/// user types; parsing and trimming happen on submit.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RecipeForm {
    pub name: String,
    pub description: String,
    pub servings: String,
    pub instructions: String,
    pub img_url: String,
    pub category_id: String,
}

/// A validation failure. At most one is reported per submit attempt, in the
/// fixed order below, and nothing is sent to the backend while one exists.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a category")]
    CategoryMissing,
    #[error("Recipe name is required")]
    NameMissing,
    #[error("Description is required")]
    DescriptionMissing,
    #[error("Number of servings is required")]
    ServingsMissing,
    #[error("Instructions are required")]
    InstructionsMissing,
    #[error("At least one ingredient is required")]
    NoIngredients,
    #[error("All ingredient fields (name, quantity_unit) are required")]
    IngredientFieldMissing,
}

impl RecipeForm {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            servings: recipe.servings.to_string(),
            instructions: recipe.instructions.clone(),
            img_url: recipe.img_url.clone().unwrap_or_default(),
            category_id: recipe.category_id.clone(),
        }
    }

    /// Servings as typed, if it is a positive whole number.
    pub fn parsed_servings(&self) -> Option<i64> {
        self.servings.trim().parse::<i64>().ok().filter(|n| *n > 0)
    }

    /// Gate submission on required-field presence. Short-circuits on the
    /// first failure so only one message is shown at a time.
    pub fn validate(&self, ingredients: &[IngredientLine]) -> Result<(), ValidationError> {
        if self.category_id.trim().is_empty() {
            return Err(ValidationError::CategoryMissing);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameMissing);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::DescriptionMissing);
        }
        if self.parsed_servings().is_none() {
            return Err(ValidationError::ServingsMissing);
        }
        if self.instructions.trim().is_empty() {
            return Err(ValidationError::InstructionsMissing);
        }
        if ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }
        for ingredient in ingredients {
            if ingredient.name.trim().is_empty() || ingredient.quantity_unit.trim().is_empty() {
                return Err(ValidationError::IngredientFieldMissing);
            }
        }
        Ok(())
    }

    fn trimmed_img_url(&self) -> Option<String> {
        let img_url = self.img_url.trim();
        if img_url.is_empty() {
            None
        } else {
            Some(img_url.to_string())
        }
    }

    /// The insert shape for a brand new recipe owned by `user_id`.
    /// Callers run `validate` first; an unparsable servings field falls back
    /// to 0 here rather than panicking.
    pub fn to_new_recipe(&self, user_id: &str) -> NewRecipe {
        NewRecipe {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            servings: self.parsed_servings().unwrap_or(0),
            instructions: self.instructions.trim().to_string(),
            category_id: self.category_id.clone(),
            img_url: self.trimmed_img_url(),
            user_id: user_id.to_string(),
        }
    }

    /// The update shape. Carries no owner field, so ownership cannot change.
    pub fn to_patch(&self) -> RecipePatch {
        RecipePatch {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            servings: self.parsed_servings().unwrap_or(0),
            instructions: self.instructions.trim().to_string(),
            category_id: self.category_id.clone(),
            img_url: self.trimmed_img_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wasser() -> IngredientLine {
        IngredientLine {
            name: "Wasser".into(),
            quantity_unit: "1 l".into(),
            additional_info: String::new(),
        }
    }

    fn valid_form() -> RecipeForm {
        RecipeForm {
            name: "Suppe".into(),
            description: "Test".into(),
            servings: "2".into(),
            instructions: "Kochen".into(),
            img_url: String::new(),
            category_id: "soups".into(),
        }
    }

    #[test]
    fn splits_number_and_unit() {
        assert_eq!(split_quantity_unit("1.5 l"), (1.5, "l".to_string()));
        assert_eq!(split_quantity_unit("3 Stk"), (3.0, "Stk".to_string()));
        assert_eq!(split_quantity_unit("  2   EL  "), (2.0, "EL".to_string()));
    }

    #[test]
    fn no_whitespace_keeps_whole_input_as_unit() {
        assert_eq!(split_quantity_unit("200g"), (0.0, "200g".to_string()));
    }

    #[test]
    fn bare_number_has_empty_unit() {
        assert_eq!(split_quantity_unit("4"), (4.0, String::new()));
        assert_eq!(split_quantity_unit("0"), (0.0, String::new()));
    }

    #[test]
    fn empty_input_is_zero_and_empty() {
        assert_eq!(split_quantity_unit(""), (0.0, String::new()));
        assert_eq!(split_quantity_unit("   "), (0.0, String::new()));
    }

    #[test]
    fn extra_tokens_past_the_unit_are_dropped() {
        assert_eq!(
            split_quantity_unit("2 EL gehackt"),
            (2.0, "EL".to_string())
        );
    }

    #[test]
    fn ingredient_line_round_trips_through_storage_shape() {
        let new = wasser().to_new_ingredient("r1");
        assert_eq!(new.name, "Wasser");
        assert_eq!(new.quantity, 1.0);
        assert_eq!(new.unit, "l");
        assert_eq!(new.additional_info, None);

        let stored = Ingredient {
            id: "i1".into(),
            recipe_id: "r1".into(),
            name: new.name,
            quantity: new.quantity,
            unit: new.unit,
            additional_info: new.additional_info,
            created_at: String::new(),
        };
        assert_eq!(IngredientLine::from_ingredient(&stored), wasser());
    }

    #[test]
    fn blank_additional_info_becomes_none() {
        let mut line = wasser();
        line.additional_info = "   ".into();
        assert_eq!(line.to_new_ingredient("r1").additional_info, None);
        line.additional_info = " fein gehackt ".into();
        assert_eq!(
            line.to_new_ingredient("r1").additional_info,
            Some("fein gehackt".to_string())
        );
    }

    #[test]
    fn parses_the_cli_ingredient_shape() {
        let line: IngredientLine = "Wasser|1 l".parse().unwrap();
        assert_eq!(line, wasser());
        let line: IngredientLine = "Zwiebel|1 Stk|fein gehackt".parse().unwrap();
        assert_eq!(line.additional_info, "fein gehackt");
        assert!("nurname".parse::<IngredientLine>().is_err());
    }

    #[test]
    fn validation_passes_on_complete_form() {
        assert_eq!(valid_form().validate(&[wasser()]), Ok(()));
    }

    #[test]
    fn validation_checks_fields_in_fixed_order() {
        let ingredients = [wasser()];
        let mut form = valid_form();
        form.category_id.clear();
        form.name.clear();
        // Category is reported first even though name is also blank.
        assert_eq!(
            form.validate(&ingredients),
            Err(ValidationError::CategoryMissing)
        );
        form.category_id = "soups".into();
        assert_eq!(form.validate(&ingredients), Err(ValidationError::NameMissing));
        form.name = "Suppe".into();
        form.description = "  ".into();
        assert_eq!(
            form.validate(&ingredients),
            Err(ValidationError::DescriptionMissing)
        );
        form.description = "Test".into();
        form.servings = String::new();
        assert_eq!(
            form.validate(&ingredients),
            Err(ValidationError::ServingsMissing)
        );
        form.servings = "2".into();
        form.instructions.clear();
        assert_eq!(
            form.validate(&ingredients),
            Err(ValidationError::InstructionsMissing)
        );
        form.instructions = "Kochen".into();
        assert_eq!(form.validate(&[]), Err(ValidationError::NoIngredients));
        let mut blank = wasser();
        blank.quantity_unit = "  ".into();
        assert_eq!(
            form.validate(&[blank]),
            Err(ValidationError::IngredientFieldMissing)
        );
    }

    #[test]
    fn servings_must_be_a_positive_whole_number() {
        let mut form = valid_form();
        for bad in ["0", "-3", "two", "1.5"] {
            form.servings = bad.into();
            assert_eq!(
                form.validate(&[wasser()]),
                Err(ValidationError::ServingsMissing),
                "servings {bad:?} should not validate"
            );
        }
    }

    #[test]
    fn new_recipe_trims_fields_and_drops_blank_img_url() {
        let mut form = valid_form();
        form.name = "  Suppe  ".into();
        form.img_url = "   ".into();
        let new = form.to_new_recipe("u1");
        assert_eq!(new.name, "Suppe");
        assert_eq!(new.servings, 2);
        assert_eq!(new.img_url, None);
        assert_eq!(new.user_id, "u1");
    }
}
