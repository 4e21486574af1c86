//! Shared store acquisition.
//!
//! A warm runtime handles many invocations; the store is opened once and
//! reused. Concurrent first callers wait on the same initialization so only
//! one connection is ever opened. A failed initialization is not cached and
//! the next call retries.
//!
//! Initialization logs timing fields to help diagnose cold starts:
//!
//! - `config_ms`: time to resolve database settings
//! - `open_ms`: time to open the database and apply the schema

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::config::{ConfigSource, DatabaseLocation};
use crate::error::ConnectError;
use crate::store::{RecipeStore, SqliteRecipeStore};

/// Something that can hand out the shared recipe store.
#[async_trait]
pub trait RecipeStoreSource: Send + Sync {
    async fn store(&self) -> Result<Arc<dyn RecipeStore>, ConnectError>;
}

/// Lazily opens a [`SqliteRecipeStore`] from a [`ConfigSource`] and caches it.
pub struct StoreProvider<C> {
    environment: String,
    source: C,
    cell: OnceCell<Arc<SqliteRecipeStore>>,
}

impl<C: ConfigSource> StoreProvider<C> {
    pub fn new(environment: impl Into<String>, source: C) -> Self {
        Self {
            environment: environment.into(),
            source,
            cell: OnceCell::new(),
        }
    }

    /// Whether a store has already been opened.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the cached store, opening it on first use.
    pub async fn connect(&self) -> Result<Arc<SqliteRecipeStore>, ConnectError> {
        let store = self
            .cell
            .get_or_try_init(|| async {
                let result = self.open().await;
                if let Err(err) = &result {
                    error!(environment = %self.environment, error = %err, "failed to open recipe store");
                }
                result
            })
            .await?;
        Ok(Arc::clone(store))
    }

    async fn open(&self) -> Result<Arc<SqliteRecipeStore>, ConnectError> {
        let total_start = Instant::now();

        let config_start = Instant::now();
        let config = self.source.database_config(&self.environment).await?;
        let config_ms = config_start.elapsed().as_millis() as u64;

        let open_start = Instant::now();
        let store = match config.location() {
            DatabaseLocation::InMemory => SqliteRecipeStore::open_in_memory()?,
            DatabaseLocation::File(path) => SqliteRecipeStore::open(path)?,
        };
        let open_ms = open_start.elapsed().as_millis() as u64;

        info!(
            environment = %self.environment,
            database = %config.name,
            config_ms,
            open_ms,
            total_init_ms = total_start.elapsed().as_millis() as u64,
            "recipe store initialized"
        );
        Ok(Arc::new(store))
    }
}

#[async_trait]
impl<C: ConfigSource> RecipeStoreSource for StoreProvider<C> {
    async fn store(&self) -> Result<Arc<dyn RecipeStore>, ConnectError> {
        let store: Arc<dyn RecipeStore> = self.connect().await?;
        Ok(store)
    }
}

/// Hands out a pre-built store. Used by tests and local runs.
#[derive(Clone)]
pub struct StaticStore(pub Arc<dyn RecipeStore>);

#[async_trait]
impl RecipeStoreSource for StaticStore {
    async fn store(&self) -> Result<Arc<dyn RecipeStore>, ConnectError> {
        Ok(Arc::clone(&self.0))
    }
}
