//! Process-wide store provider.
//!
//! A warm Lambda container reuses this provider across invocations, so the
//! database is opened at most once per container. Settings come from
//! `RECIPEBOX_ENV` and the `RECIPEBOX_*_DATABASE_*` variables.

use std::sync::{Arc, OnceLock};

use tracing::info;

use recipebox_lib::{AppConfig, EnvConfigSource, RecipeStoreSource, StoreProvider};

static PROVIDER: OnceLock<Arc<StoreProvider<EnvConfigSource>>> = OnceLock::new();

/// Shared store source backed by environment configuration.
///
/// The provider itself is created on first call; the connection is opened
/// lazily on the first [`RecipeStoreSource::store`] call.
pub fn shared_store_source() -> Arc<dyn RecipeStoreSource> {
    let provider = PROVIDER.get_or_init(|| {
        let config = AppConfig::from_env();
        info!(environment = %config.environment, "creating recipe store provider");
        Arc::new(StoreProvider::new(config.environment, EnvConfigSource::new()))
    });
    Arc::clone(provider) as Arc<dyn RecipeStoreSource>
}
