//! Shared infrastructure for the recipe catalog Lambda function.
//!
//! This crate provides the pieces every handler needs around the domain
//! library:
//!
//! - [`ApiRequest`]: inbound HTTP event, in either the structured or legacy shape
//! - [`Router`]: method + path dispatch with `{name}` path parameters
//! - [`ApiResponse`]: `{statusCode, headers, body}` envelope
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ListRecipesQuery`]: query-string options with validation
//! - [`init_tracing`]: JSON or text tracing for CloudWatch Logs
//! - [`shared_store_source`]: process-wide cached store connection
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides event builders and fixture recipes for
//! handler testing. Enable the `test-utils` feature to access it from dependent
//! crates.

mod problem;
mod request;
mod requests;
mod response;
mod router;
mod runtime;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use problem::{
    from_connect_error, from_recipe_error, ProblemDetails, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_RECIPE_NOT_FOUND, PROBLEM_ROUTE_NOT_FOUND,
    PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_VALIDATION_FAILED,
};
pub use request::{ApiRequest, BodyError, HttpContext, RequestContext, UNKNOWN_REQUEST_ID};
pub use requests::{ListRecipesQuery, Validate, MAX_LIMIT};
pub use response::{ApiResponse, CONTENT_TYPE_JSON, CONTENT_TYPE_PROBLEM_JSON};
pub use router::{HandlerFuture, Router, RouterError};
pub use runtime::shared_store_source;
pub use tracing_init::{init_tracing, LogFormat, LoggingConfig};
