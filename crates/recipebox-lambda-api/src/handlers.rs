//! Route handlers.
//!
//! Each handler adapts request fields into plain arguments, calls the
//! service, and re-envelopes the outcome. Domain failures become problem
//! responses; only envelope encoding failures surface as `Err`.

use std::sync::Arc;

use http::StatusCode;
use lambda_runtime::Error;
use tracing::{error, info, warn};

use recipebox_lambda_shared::{
    from_recipe_error, ApiRequest, ApiResponse, ListRecipesQuery, ProblemDetails,
};
use recipebox_lib::{NewRecipe, RecipeError};

use crate::context::ApiContext;

/// `POST /recipes`
pub async fn create_recipe(ctx: Arc<ApiContext>, request: ApiRequest) -> Result<ApiResponse, Error> {
    let request_id = request.request_id().to_string();

    let input: NewRecipe = match request.json_body() {
        Ok(input) => input,
        Err(err) => {
            warn!(request_id = %request_id, error = %err, "rejecting recipe payload");
            return Ok(ProblemDetails::bad_request(
                format!("Invalid recipe payload: {}", err),
                &request_id,
            )
            .into());
        }
    };

    let service = match ctx.service(&request_id).await {
        Ok(service) => service,
        Err(problem) => return Ok((*problem).into()),
    };

    match service.add_recipe(input).await {
        Ok(recipe) => {
            info!(request_id = %request_id, id = %recipe.id, "recipe created");
            Ok(ApiResponse::json(StatusCode::CREATED, &recipe)?)
        }
        Err(err) => Ok(error_response(&err, &request_id)),
    }
}

/// `GET /recipes/{id}`
pub async fn get_recipe(ctx: Arc<ApiContext>, request: ApiRequest) -> Result<ApiResponse, Error> {
    let request_id = request.request_id().to_string();

    let Some(id) = request.path_param("id").map(str::to_string) else {
        return Ok(ProblemDetails::bad_request("The 'id' path parameter is required", &request_id).into());
    };

    let service = match ctx.service(&request_id).await {
        Ok(service) => service,
        Err(problem) => return Ok((*problem).into()),
    };

    match service.get_recipe_by_id(&id).await {
        Ok(Some(recipe)) => {
            info!(request_id = %request_id, id = %id, "recipe found");
            Ok(ApiResponse::json(StatusCode::OK, &recipe)?)
        }
        Ok(None) => {
            info!(request_id = %request_id, id = %id, "recipe not found");
            Ok(ProblemDetails::recipe_not_found(&id, &request_id).into())
        }
        Err(err) => Ok(error_response(&err, &request_id)),
    }
}

/// `GET /recipes`
pub async fn list_recipes(ctx: Arc<ApiContext>, request: ApiRequest) -> Result<ApiResponse, Error> {
    let request_id = request.request_id().to_string();

    let query = ListRecipesQuery::from_params(request.query_string_parameters.as_ref());
    let options = match query.to_list_options(&request_id) {
        Ok(options) => options,
        Err(problem) => {
            warn!(request_id = %request_id, detail = ?problem.detail, "rejecting list query");
            return Ok((*problem).into());
        }
    };

    let service = match ctx.service(&request_id).await {
        Ok(service) => service,
        Err(problem) => return Ok((*problem).into()),
    };

    match service.get_all_recipes(&options).await {
        Ok(recipes) => {
            info!(
                request_id = %request_id,
                count = recipes.len(),
                sort_by = %options.sort_by,
                "recipes listed"
            );
            Ok(ApiResponse::json(StatusCode::OK, &recipes)?)
        }
        Err(err) => Ok(error_response(&err, &request_id)),
    }
}

fn error_response(err: &RecipeError, request_id: &str) -> ApiResponse {
    match err {
        RecipeError::Store(_) => {
            error!(request_id = %request_id, error = %err, "recipe store failure")
        }
        _ => warn!(request_id = %request_id, error = %err, "recipe rejected"),
    }
    from_recipe_error(err, request_id).into()
}
