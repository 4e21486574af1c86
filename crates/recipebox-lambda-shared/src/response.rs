//! HTTP response envelope returned to API Gateway.

use std::collections::BTreeMap;

use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_PROBLEM_JSON: &str = "application/problem+json";

/// `{statusCode, headers, body}` envelope with a JSON-encoded body.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use recipebox_lambda_shared::ApiResponse;
///
/// let response = ApiResponse::json(StatusCode::OK, &vec!["a", "b"]).unwrap();
/// assert_eq!(response.status_code, 200);
/// assert_eq!(response.body, r#"["a","b"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// Build a response with the standard headers and a pre-encoded body.
    pub fn with_body(status: StatusCode, content_type: &str, body: String) -> Self {
        let headers = BTreeMap::from([
            (CONTENT_TYPE.as_str().to_string(), content_type.to_string()),
            (
                ACCESS_CONTROL_ALLOW_ORIGIN.as_str().to_string(),
                "*".to_string(),
            ),
        ]);
        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    /// Serialize `data` as an `application/json` body.
    pub fn json<T: Serialize + ?Sized>(
        status: StatusCode,
        data: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::with_body(
            status,
            CONTENT_TYPE_JSON,
            serde_json::to_string(data)?,
        ))
    }

    /// Status as an [`http::StatusCode`].
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl From<ProblemDetails> for ApiResponse {
    fn from(problem: ProblemDetails) -> Self {
        let body = serde_json::to_string(&problem).unwrap_or_else(|_| {
            format!(
                r#"{{"type":"{}","title":"Internal Error","status":500}}"#,
                crate::PROBLEM_INTERNAL_ERROR
            )
        });
        Self::with_body(problem.status_code(), CONTENT_TYPE_PROBLEM_JSON, body)
    }
}
