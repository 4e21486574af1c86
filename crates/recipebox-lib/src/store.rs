//! Persistence abstraction consumed by the recipe service.

mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::FindQuery;
use crate::recipe::{NewRecipe, Recipe};
use crate::schema::ValidRecipe;

pub use memory::MemoryRecipeStore;
pub use sqlite::SqliteRecipeStore;

/// Storage backend for recipes.
///
/// Implementations validate records against [`crate::schema`] on insert and
/// report failures through the tagged [`StoreError`] variants.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Validate and persist a new recipe, assigning its identifier and
    /// timestamps.
    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    /// Look up a recipe by identifier.
    ///
    /// Returns `Ok(None)` when no record exists and
    /// [`StoreError::MalformedId`] when `id` is not a valid identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError>;

    /// Execute a filtered, sorted and paginated query.
    async fn execute(&self, query: &FindQuery) -> Result<Vec<Recipe>, StoreError>;
}

/// Generate a fresh, time-ordered recipe identifier.
pub fn new_recipe_id() -> String {
    Uuid::now_v7().to_string()
}

/// Parse an identifier, rejecting anything that is not a UUID.
pub fn parse_recipe_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId { id: id.to_string() })
}

/// Current time truncated to microseconds so it survives a text round trip.
pub(crate) fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    let micros = now.nanosecond() / 1_000 * 1_000;
    now.with_nanosecond(micros).unwrap_or(now)
}

pub(crate) fn materialize(valid: ValidRecipe, id: String, now: DateTime<Utc>) -> Recipe {
    Recipe {
        id,
        title: valid.title,
        servings: valid.servings,
        ingredients: valid.ingredients,
        steps: valid.steps,
        tags: valid.tags,
        created_at: now,
        updated_at: now,
    }
}
