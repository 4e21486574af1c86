//! Recipe catalog library entry points.
//!
//! This crate holds the recipe domain model, the validation and normalization
//! rules applied before any write, the query model used for listing, and the
//! persistence backends. Higher-level consumers (the Lambda API) should only
//! depend on the items exported here instead of reimplementing behavior.

pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod recipe;
pub mod schema;
pub mod service;
pub mod store;

pub use config::{
    AppConfig, ConfigSource, DatabaseConfig, DatabaseLocation, EnvConfigSource,
    StaticConfigSource,
};
pub use error::{ConfigError, ConnectError, RecipeError, Result, StoreError};
pub use normalize::{has_duplicate_step_orders, normalize_tags, sort_steps};
pub use provider::{RecipeStoreSource, StaticStore, StoreProvider};
pub use query::{
    FindCursor, FindQuery, ListOptions, ParseSortError, RecipeFilter, SortField, SortOrder,
    SortSpec, DEFAULT_LIMIT,
};
pub use recipe::{Ingredient, NewIngredient, NewRecipe, Recipe, RecipeId, Step};
pub use service::RecipeService;
pub use store::{MemoryRecipeStore, RecipeStore, SqliteRecipeStore};
