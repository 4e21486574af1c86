//! Inbound HTTP event model.
//!
//! API Gateway delivers two event shapes. The structured (payload 2.0) shape
//! carries method and path under `requestContext.http`; the legacy (payload
//! 1.0) shape has top-level `httpMethod` and `path`. Both deserialize into
//! [`ApiRequest`]; the structured fields win when both are present.

use std::collections::BTreeMap;

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request ID reported when the event carries none.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Inbound HTTP request event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,

    /// Legacy method field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    /// Legacy path field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<BTreeMap<String, String>>,

    /// Raw body; JSON text, or base64 when `is_base64_encoded` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Errors raised while decoding a request body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body is required")]
    Missing,

    #[error("request body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiRequest {
    fn http(&self) -> Option<&HttpContext> {
        self.request_context.as_ref()?.http.as_ref()
    }

    /// Effective HTTP method; empty when the event carries none.
    pub fn method(&self) -> &str {
        self.http()
            .and_then(|http| http.method.as_deref())
            .or(self.http_method.as_deref())
            .unwrap_or("")
    }

    /// Effective request path; empty when the event carries none.
    pub fn path(&self) -> &str {
        self.http()
            .and_then(|http| http.path.as_deref())
            .or(self.path.as_deref())
            .unwrap_or("")
    }

    /// Request ID from the request context.
    pub fn request_id(&self) -> &str {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.request_id.as_deref())
            .unwrap_or(UNKNOWN_REQUEST_ID)
    }

    /// Fill in the request ID when the event does not carry one.
    pub fn ensure_request_id(&mut self, request_id: &str) {
        let ctx = self.request_context.get_or_insert_with(RequestContext::default);
        if ctx.request_id.is_none() {
            ctx.request_id = Some(request_id.to_string());
        }
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_parameters.as_ref()?.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()?
            .get(name)
            .map(String::as_str)
    }

    /// Merge path parameters, overwriting entries with the same name.
    pub fn merge_path_params<I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.path_parameters
            .get_or_insert_with(BTreeMap::new)
            .extend(params);
    }

    /// Decode the body as JSON into `T`, honouring `isBase64Encoded`.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, BodyError> {
        let body = self.body.as_deref().ok_or(BodyError::Missing)?;
        if self.is_base64_encoded {
            let bytes = base64::engine::general_purpose::STANDARD.decode(body)?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Ok(serde_json::from_str(body)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn structured_shape_is_preferred() {
        let request: ApiRequest = serde_json::from_value(json!({
            "requestContext": {
                "requestId": "req-1",
                "http": { "method": "POST", "path": "/recipes" }
            },
            "httpMethod": "GET",
            "path": "/ignored"
        }))
        .unwrap();

        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), "/recipes");
        assert_eq!(request.request_id(), "req-1");
    }

    #[test]
    fn legacy_shape_is_supported() {
        let request: ApiRequest = serde_json::from_value(json!({
            "httpMethod": "GET",
            "path": "/recipes/42",
            "pathParameters": null,
            "queryStringParameters": { "limit": "5" },
            "multiValueHeaders": {}
        }))
        .unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/recipes/42");
        assert_eq!(request.path_param("id"), None);
        assert_eq!(request.query_param("limit"), Some("5"));
        assert_eq!(request.request_id(), UNKNOWN_REQUEST_ID);
    }

    #[test]
    fn ensure_request_id_keeps_existing_value() {
        let mut request = ApiRequest::default();
        request.ensure_request_id("lambda-1");
        assert_eq!(request.request_id(), "lambda-1");
        request.ensure_request_id("lambda-2");
        assert_eq!(request.request_id(), "lambda-1");
    }

    #[test]
    fn merge_path_params_preserves_and_overwrites() {
        let mut request = ApiRequest {
            path_parameters: Some(BTreeMap::from([
                ("id".to_string(), "old".to_string()),
                ("extra".to_string(), "kept".to_string()),
            ])),
            ..ApiRequest::default()
        };
        request.merge_path_params([("id".to_string(), "new".to_string())]);

        assert_eq!(request.path_param("id"), Some("new"));
        assert_eq!(request.path_param("extra"), Some("kept"));
    }

    #[test]
    fn json_body_decodes_plain_and_base64() {
        let plain = ApiRequest {
            body: Some(r#"{"title":"Soup"}"#.to_string()),
            ..ApiRequest::default()
        };
        let value: serde_json::Value = plain.json_body().unwrap();
        assert_eq!(value["title"], "Soup");

        let encoded = ApiRequest {
            body: Some(base64::engine::general_purpose::STANDARD.encode(r#"{"title":"Soup"}"#)),
            is_base64_encoded: true,
            ..ApiRequest::default()
        };
        let value: serde_json::Value = encoded.json_body().unwrap();
        assert_eq!(value["title"], "Soup");
    }

    #[test]
    fn json_body_reports_missing_and_invalid() {
        let missing = ApiRequest::default();
        assert!(matches!(
            missing.json_body::<serde_json::Value>(),
            Err(BodyError::Missing)
        ));

        let invalid = ApiRequest {
            body: Some("{not json".to_string()),
            ..ApiRequest::default()
        };
        assert!(matches!(
            invalid.json_body::<serde_json::Value>(),
            Err(BodyError::Json(_))
        ));
    }
}
