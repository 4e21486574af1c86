//! Recipe aggregate and its write-side input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, store-assigned recipe identifier.
pub type RecipeId = String;

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub servings: i64,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Returns true when the recipe carries every tag in `required`.
    pub fn has_all_tags(&self, required: &[String]) -> bool {
        required.iter().all(|tag| self.tags.contains(tag))
    }
}

/// A stored ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A single preparation step. `order` is 1-based and unique within a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub order: i64,
    pub text: String,
}

impl Step {
    pub fn new(order: i64, text: impl Into<String>) -> Self {
        Self {
            order,
            text: text.into(),
        }
    }
}

/// Caller-supplied data for a new recipe.
///
/// Every field is optional at the wire level so that missing values surface
/// as schema validation messages rather than deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,

    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Caller-supplied ingredient line. `quantity` defaults to 1 and `unit` to
/// an empty string when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            unit: Some(unit.into()),
        }
    }
}
