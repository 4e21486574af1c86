use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{materialize, new_recipe_id, now_micros, parse_recipe_id, RecipeStore};
use crate::error::StoreError;
use crate::query::{apply_query, FindQuery};
use crate::recipe::{NewRecipe, Recipe};
use crate::schema;

/// In-memory recipe store.
///
/// Cheap to clone; clones share the same records. Used for tests and local
/// runs. Counts insert attempts so callers can assert that no write happened.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecipeStore {
    recipes: Arc<Mutex<Vec<Recipe>>>,
    insert_attempts: Arc<AtomicUsize>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`RecipeStore::insert`] was called, successful or not.
    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Number of stored recipes.
    pub fn len(&self) -> usize {
        self.lock().map(|recipes| recipes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Recipe>>, StoreError> {
        self.recipes.lock().map_err(|_| StoreError::Unavailable {
            message: "in-memory store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);

        let valid = schema::validate(recipe).map_err(|fields| StoreError::Validation { fields })?;
        let recipe = materialize(valid, new_recipe_id(), now_micros());

        self.lock()?.push(recipe.clone());
        debug!(id = %recipe.id, "recipe stored in memory");
        Ok(recipe)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        let id = parse_recipe_id(id)?.to_string();
        Ok(self.lock()?.iter().find(|recipe| recipe.id == id).cloned())
    }

    async fn execute(&self, query: &FindQuery) -> Result<Vec<Recipe>, StoreError> {
        let recipes = self.lock()?;
        Ok(apply_query(recipes.iter(), query))
    }
}
