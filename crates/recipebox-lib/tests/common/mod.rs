//! Common test utilities and recipe fixtures shared by integration tests.

use std::sync::Arc;

use recipebox_lib::{
    MemoryRecipeStore, NewIngredient, NewRecipe, RecipeService, RecipeStore, SqliteRecipeStore,
    Step,
};
use tempfile::TempDir;

/// A valid recipe input with the given title and tags.
#[allow(dead_code)]
pub fn recipe_input(title: &str, tags: &[&str]) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        servings: Some(4),
        ingredients: vec![
            NewIngredient::new("Arborio rice", 320.0, "g"),
            NewIngredient::new("Mushrooms", 250.0, "g"),
        ],
        steps: vec![Step::new(1, "Toast the rice"), Step::new(2, "Add stock")],
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// A SQLite store in a fresh temporary directory. Keep the `TempDir` alive
/// for as long as the store is used.
#[allow(dead_code)]
pub fn temp_sqlite_store() -> (TempDir, SqliteRecipeStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteRecipeStore::open(dir.path().join("recipes.db")).expect("open sqlite store");
    (dir, store)
}

/// Both store backends behind the service, labelled for assertion messages.
#[allow(dead_code)]
pub fn services() -> Vec<(&'static str, RecipeService, Option<TempDir>)> {
    let memory: Arc<dyn RecipeStore> = Arc::new(MemoryRecipeStore::new());
    let (dir, sqlite) = temp_sqlite_store();
    let sqlite: Arc<dyn RecipeStore> = Arc::new(sqlite);
    vec![
        ("memory", RecipeService::new(memory), None),
        ("sqlite", RecipeService::new(sqlite), Some(dir)),
    ]
}
