//! Shared helpers for API integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::Value;

use recipebox_lambda_api::{build_router, handler, ApiContext};
use recipebox_lambda_shared::{ApiResponse, ProblemDetails, Router};
use recipebox_lib::{
    ConfigError, ConnectError, MemoryRecipeStore, RecipeStore, RecipeStoreSource, StaticStore,
};

/// Router over a fresh in-memory store, plus a handle on that store.
#[allow(dead_code)]
pub fn memory_router() -> (Router, MemoryRecipeStore) {
    let store = MemoryRecipeStore::new();
    let shared: Arc<dyn RecipeStore> = Arc::new(store.clone());
    let context = ApiContext::new(Arc::new(StaticStore(shared)));
    let router = build_router(Arc::new(context)).expect("routes register");
    (router, store)
}

/// Store source that never connects.
pub struct UnreachableStore;

#[async_trait]
impl RecipeStoreSource for UnreachableStore {
    async fn store(&self) -> Result<Arc<dyn RecipeStore>, ConnectError> {
        Err(ConnectError::Config(ConfigError::Missing {
            key: "RECIPEBOX_TEST_DATABASE_URI".to_string(),
        }))
    }
}

/// Router whose store can never be reached.
#[allow(dead_code)]
pub fn unreachable_router() -> Router {
    build_router(Arc::new(ApiContext::new(Arc::new(UnreachableStore)))).expect("routes register")
}

/// Invoke the Lambda handler the way the runtime would.
#[allow(dead_code)]
pub async fn invoke(router: &Router, payload: Value) -> ApiResponse {
    let mut context = Context::default();
    context.request_id = "lambda-request-id".to_string();
    handler(router, LambdaEvent::new(payload, context))
        .await
        .expect("handler should succeed")
}

#[allow(dead_code)]
pub fn body_json(response: &ApiResponse) -> Value {
    serde_json::from_str(&response.body).expect("response body is JSON")
}

#[allow(dead_code)]
pub fn problem(response: &ApiResponse) -> ProblemDetails {
    serde_json::from_str(&response.body).expect("response body is a problem document")
}
