//! AWS Lambda function serving the recipe catalog JSON API.
//!
//! Routes:
//!
//! - `POST /recipes`: create a recipe (201)
//! - `GET /recipes/{id}`: fetch one recipe (200 / 404)
//! - `GET /recipes`: list recipes with `limit`, `skip`, `sortBy`,
//!   `sortOrder` and `tags` query parameters (200)

mod context;
mod handlers;

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use recipebox_lambda_shared::{
    init_tracing, shared_store_source, ApiRequest, ApiResponse, LoggingConfig, ProblemDetails,
    Router, RouterError,
};

pub use context::ApiContext;

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing(&LoggingConfig::from_env());

    let context = Arc::new(ApiContext::new(shared_store_source()));
    let router = Arc::new(build_router(context)?);
    info!(routes = router.len(), "recipe API ready");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let router = Arc::clone(&router);
        async move { handler(&router, event).await }
    }))
    .await
}

/// Register the recipe routes.
pub fn build_router(context: Arc<ApiContext>) -> Result<Router, RouterError> {
    let mut router = Router::new();

    let ctx = Arc::clone(&context);
    router.add_route("POST", "/recipes", move |request| {
        handlers::create_recipe(Arc::clone(&ctx), request)
    })?;

    let ctx = Arc::clone(&context);
    router.add_route("GET", "/recipes/{id}", move |request| {
        handlers::get_recipe(Arc::clone(&ctx), request)
    })?;

    let ctx = Arc::clone(&context);
    router.add_route("GET", "/recipes", move |request| {
        handlers::list_recipes(Arc::clone(&ctx), request)
    })?;

    Ok(router)
}

/// Lambda handler invoked per request.
pub async fn handler(router: &Router, event: LambdaEvent<Value>) -> Result<ApiResponse, Error> {
    let request_id = event.context.request_id.clone();
    handle_event(router, event.payload, &request_id).await
}

/// Core handler logic separated for reuse in tests.
pub async fn handle_event(
    router: &Router,
    payload: Value,
    request_id: &str,
) -> Result<ApiResponse, Error> {
    let mut request: ApiRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "failed to parse request event");
            return Ok(
                ProblemDetails::bad_request(format!("Invalid request event: {}", e), request_id)
                    .into(),
            );
        }
    };
    request.ensure_request_id(request_id);

    info!(
        request_id = %request.request_id(),
        method = %request.method(),
        path = %request.path(),
        "handling request"
    );

    let response = router.route(request).await?;

    info!(
        request_id = %request_id,
        status = response.status_code,
        "request completed"
    );
    Ok(response)
}
