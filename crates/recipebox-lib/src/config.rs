//! Runtime configuration.
//!
//! Database settings are resolved per environment name through a
//! [`ConfigSource`]. The default source reads environment variables:
//!
//! - `RECIPEBOX_ENV`: environment name (default: `dev`)
//! - `RECIPEBOX_<ENV>_DATABASE_URI` / `RECIPEBOX_DATABASE_URI`: database
//!   directory, or `:memory:`
//! - `RECIPEBOX_<ENV>_DATABASE_NAME` / `RECIPEBOX_DATABASE_NAME`: database
//!   name (default: `recipes`)

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ConfigError;

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "recipes";

/// URI selecting a private in-memory database.
pub const IN_MEMORY_URI: &str = ":memory:";

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Environment name used to key database settings.
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Create configuration from `RECIPEBOX_ENV`.
    pub fn from_env() -> Self {
        let environment = std::env::var("RECIPEBOX_ENV")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        Self { environment }
    }
}

/// Connection settings for the recipe database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

/// Where the store should be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

impl DatabaseConfig {
    /// Resolve `uri` and `name` into a concrete location: `<uri>/<name>.db`.
    pub fn location(&self) -> DatabaseLocation {
        if self.uri == IN_MEMORY_URI {
            DatabaseLocation::InMemory
        } else {
            DatabaseLocation::File(PathBuf::from(&self.uri).join(format!("{}.db", self.name)))
        }
    }
}

/// Source of database settings keyed by environment name.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn database_config(&self, environment: &str) -> Result<DatabaseConfig, ConfigError>;
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads database settings from environment variables.
///
/// Environment-specific keys take precedence over the un-prefixed ones.
pub struct EnvConfigSource {
    lookup: Lookup,
}

impl Default for EnvConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvConfigSource {
    /// Read from the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read through a custom lookup function.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn first_of(&self, keys: &[String]) -> Option<String> {
        keys.iter()
            .filter_map(|key| (self.lookup)(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

/// Environment-specific variable name, e.g. `RECIPEBOX_PROD_DATABASE_URI`.
pub fn env_key(environment: &str, suffix: &str) -> String {
    let env = environment
        .trim()
        .to_uppercase()
        .replace(|c: char| !c.is_ascii_alphanumeric(), "_");
    format!("RECIPEBOX_{env}_{suffix}")
}

#[async_trait]
impl ConfigSource for EnvConfigSource {
    async fn database_config(&self, environment: &str) -> Result<DatabaseConfig, ConfigError> {
        let uri_keys = [
            env_key(environment, "DATABASE_URI"),
            "RECIPEBOX_DATABASE_URI".to_string(),
        ];
        let uri = self.first_of(&uri_keys).ok_or_else(|| ConfigError::Missing {
            key: uri_keys[0].clone(),
        })?;

        let name_keys = [
            env_key(environment, "DATABASE_NAME"),
            "RECIPEBOX_DATABASE_NAME".to_string(),
        ];
        let name = self
            .first_of(&name_keys)
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        if name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                key: name_keys[0].clone(),
                message: "database name must not contain path separators".to_string(),
            });
        }

        Ok(DatabaseConfig { uri, name })
    }
}

/// Fixed settings, independent of the environment name.
#[derive(Debug, Clone)]
pub struct StaticConfigSource {
    config: DatabaseConfig,
}

impl StaticConfigSource {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Settings for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(DatabaseConfig {
            uri: IN_MEMORY_URI.to_string(),
            name: DEFAULT_DATABASE_NAME.to_string(),
        })
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn database_config(&self, _environment: &str) -> Result<DatabaseConfig, ConfigError> {
        Ok(self.config.clone())
    }
}
