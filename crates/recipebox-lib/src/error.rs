use std::collections::BTreeMap;

use thiserror::Error;

/// Convenient result alias for service operations.
pub type Result<T> = std::result::Result<T, RecipeError>;

/// Errors reported by a [`RecipeStore`](crate::store::RecipeStore) implementation.
///
/// This is the only error shape the service inspects. Field validation and
/// malformed identifiers are distinguished explicitly; everything else is an
/// infrastructure failure that callers should propagate untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record failed schema validation. Keys are field paths
    /// (`title`, `steps.1.text`, ...), values are human-readable messages.
    #[error("recipe failed schema validation ({} invalid field(s))", .fields.len())]
    Validation { fields: BTreeMap<String, String> },

    /// The identifier cannot possibly refer to a stored recipe.
    #[error("malformed recipe identifier: {id}")]
    MalformedId { id: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Raised when a stored JSON column cannot be encoded or decoded.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// The backing store could not be reached or its worker failed.
    #[error("recipe store unavailable: {message}")]
    Unavailable { message: String },
}

/// Errors surfaced by [`RecipeService`](crate::service::RecipeService).
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Two or more steps share the same `order` value.
    #[error("step order values must be unique within a recipe")]
    DuplicateStepOrder,

    /// Aggregated field validation failures reported by the store.
    #[error("validation failed: {}", .messages.join(", "))]
    ValidationFailed { messages: Vec<String> },

    /// Any other persistence failure, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing configuration value {key}")]
    Missing { key: String },

    /// A setting was provided but could not be used.
    #[error("invalid configuration value {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Errors raised while acquiring the shared store connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_joins_messages() {
        let err = RecipeError::ValidationFailed {
            messages: vec!["title is required".to_string(), "servings must be at least 1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "validation failed: title is required, servings must be at least 1"
        );
    }

    #[test]
    fn store_errors_pass_through_transparently() {
        let err: RecipeError = StoreError::Unavailable {
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "recipe store unavailable: connection refused");
        assert!(matches!(err, RecipeError::Store(StoreError::Unavailable { .. })));
    }
}
