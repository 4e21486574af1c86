//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use http::StatusCode;
use serde::{Deserialize, Serialize};

use recipebox_lib::{ConnectError, RecipeError};

/// Problem type URI for malformed or out-of-range request input.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for recipes rejected by schema validation.
pub const PROBLEM_VALIDATION_FAILED: &str = "/problems/validation-failed";

/// Problem type URI for unknown recipe identifiers.
pub const PROBLEM_RECIPE_NOT_FOUND: &str = "/problems/recipe-not-found";

/// Problem type URI for requests no route matches.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for service unavailable (e.g., store cannot be opened).
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use recipebox_lambda_shared::{ProblemDetails, PROBLEM_RECIPE_NOT_FOUND};
/// use http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_RECIPE_NOT_FOUND,
///     "Recipe Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Recipe '0190c7c2-0000-7000-8000-000000000000' does not exist")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Individual validation messages, when there are several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            errors: Vec::new(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Status as an [`http::StatusCode`].
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 400 Bad Request problem listing every validation message.
    pub fn validation_failed(messages: &[String], request_id: impl Into<String>) -> Self {
        let mut problem = Self::new(
            PROBLEM_VALIDATION_FAILED,
            "Validation Failed",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(format!("validation failed: {}", messages.join(", ")))
        .with_request_id(request_id);
        problem.errors = messages.to_vec();
        problem
    }

    /// Create a 404 Not Found problem for an unknown recipe.
    pub fn recipe_not_found(id: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_RECIPE_NOT_FOUND,
            "Recipe Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Recipe '{}' does not exist", id))
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for a request no route matches.
    pub fn route_not_found(method: &str, path: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No route matches {} {}", method, path))
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 503 Service Unavailable problem.
    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Convert service errors to ProblemDetails.
///
/// Caller mistakes map to 400; anything coming from the store is a 500
/// whose detail does not include the underlying store error.
pub fn from_recipe_error(error: &RecipeError, request_id: &str) -> ProblemDetails {
    match error {
        RecipeError::DuplicateStepOrder => ProblemDetails::bad_request(error.to_string(), request_id),
        RecipeError::ValidationFailed { messages } => {
            ProblemDetails::validation_failed(messages, request_id)
        }
        RecipeError::Store(_) => ProblemDetails::internal_error(
            "The recipe store could not complete the request",
            request_id,
        ),
    }
}

/// Convert a failure to acquire the store into a 503 problem.
pub fn from_connect_error(error: &ConnectError, request_id: &str) -> ProblemDetails {
    ProblemDetails::service_unavailable(
        format!("Recipe store is not available: {}", error),
        request_id,
    )
}
