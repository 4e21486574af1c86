use std::sync::Arc;

use tracing::error;

use recipebox_lambda_shared::{from_connect_error, ProblemDetails};
use recipebox_lib::{RecipeService, RecipeStoreSource};

/// State shared by every handler for the lifetime of the process.
#[derive(Clone)]
pub struct ApiContext {
    source: Arc<dyn RecipeStoreSource>,
}

impl ApiContext {
    pub fn new(source: Arc<dyn RecipeStoreSource>) -> Self {
        Self { source }
    }

    /// Build a service over the shared store, or a 503 problem when the store
    /// cannot be reached.
    pub async fn service(&self, request_id: &str) -> Result<RecipeService, Box<ProblemDetails>> {
        match self.source.store().await {
            Ok(store) => Ok(RecipeService::new(store)),
            Err(err) => {
                error!(request_id = %request_id, error = %err, "recipe store unavailable");
                Err(Box::new(from_connect_error(&err, request_id)))
            }
        }
    }
}
