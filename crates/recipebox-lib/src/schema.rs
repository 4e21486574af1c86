//! Document schema shared by every store implementation.
//!
//! Stores call [`validate`] before persisting. It applies field defaults
//! (ingredient quantity and unit), lowercases units, and reports one message
//! per invalid field path so the service can aggregate them.

use std::collections::BTreeMap;

use crate::recipe::{Ingredient, NewRecipe, Step};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Default ingredient quantity when none is provided.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// A recipe that passed schema validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecipe {
    pub title: String,
    pub servings: i64,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub tags: Vec<String>,
}

/// Validate `input` and apply defaults.
///
/// On failure returns every invalid field path mapped to its message.
pub fn validate(input: NewRecipe) -> Result<ValidRecipe, BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    let title = input.title.trim().to_string();
    if title.is_empty() {
        errors.insert("title".to_string(), "title is required".to_string());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.insert(
            "title".to_string(),
            format!("title must be at most {MAX_TITLE_LEN} characters"),
        );
    }

    let servings = match input.servings {
        Some(servings) if servings >= 1 => servings,
        Some(_) => {
            errors.insert(
                "servings".to_string(),
                "servings must be at least 1".to_string(),
            );
            0
        }
        None => {
            errors.insert("servings".to_string(), "servings is required".to_string());
            0
        }
    };

    if input.ingredients.is_empty() {
        errors.insert(
            "ingredients".to_string(),
            "ingredients must contain at least one ingredient".to_string(),
        );
    }
    let ingredients: Vec<Ingredient> = input
        .ingredients
        .into_iter()
        .enumerate()
        .map(|(index, ingredient)| {
            let name = ingredient.name.trim().to_string();
            if name.is_empty() {
                errors.insert(
                    format!("ingredients.{index}.name"),
                    format!("ingredients.{index}.name is required"),
                );
            }
            let quantity = ingredient.quantity.unwrap_or(DEFAULT_QUANTITY);
            if !quantity.is_finite() {
                errors.insert(
                    format!("ingredients.{index}.quantity"),
                    format!("ingredients.{index}.quantity must be a number"),
                );
            }
            Ingredient {
                name,
                quantity,
                unit: ingredient.unit.unwrap_or_default().trim().to_lowercase(),
            }
        })
        .collect();

    if input.steps.is_empty() {
        errors.insert(
            "steps".to_string(),
            "steps must contain at least one step".to_string(),
        );
    }
    let steps: Vec<Step> = input
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            if step.order < 1 {
                errors.insert(
                    format!("steps.{index}.order"),
                    format!("steps.{index}.order must be at least 1"),
                );
            }
            let text = step.text.trim().to_string();
            if text.is_empty() {
                errors.insert(
                    format!("steps.{index}.text"),
                    format!("steps.{index}.text is required"),
                );
            }
            Step {
                order: step.order,
                text,
            }
        })
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidRecipe {
        title,
        servings,
        ingredients,
        steps,
        tags: input.tags,
    })
}
