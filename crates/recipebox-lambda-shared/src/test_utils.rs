//! Test utilities for Lambda handler testing.
//!
//! Event builders produce raw `serde_json::Value` payloads exactly as the
//! Lambda runtime would hand them over, in either event shape.
//!
//! # Usage
//!
//! ```ignore
//! use recipebox_lambda_shared::test_utils::{recipe_json, EventBuilder};
//!
//! let event = EventBuilder::new("POST", "/recipes")
//!     .request_id("req-1")
//!     .json_body(&recipe_json("Risotto", &["italien"]))
//!     .build();
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::ApiRequest;

/// Event payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventShape {
    /// `requestContext.http.{method,path}`
    Structured,
    /// Top-level `httpMethod` and `path`.
    Legacy,
}

/// Fluent builder for inbound HTTP events.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    shape: EventShape,
    method: String,
    path: String,
    request_id: Option<String>,
    query: BTreeMap<String, String>,
    path_params: BTreeMap<String, String>,
    body: Option<String>,
}

impl EventBuilder {
    /// Structured event for `method` and `path`.
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            shape: EventShape::Structured,
            method: method.to_string(),
            path: path.to_string(),
            request_id: None,
            query: BTreeMap::new(),
            path_params: BTreeMap::new(),
            body: None,
        }
    }

    /// Legacy event for `method` and `path`.
    pub fn legacy(method: &str, path: &str) -> Self {
        Self {
            shape: EventShape::Legacy,
            ..Self::new(method, path)
        }
    }

    pub fn request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn path_param(mut self, key: &str, value: &str) -> Self {
        self.path_params.insert(key.to_string(), value.to_string());
        self
    }

    /// Raw body text, sent as-is.
    pub fn raw_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// JSON-encode `body`.
    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_string(body).expect("test body serializes"));
        self
    }

    /// Build the raw event payload.
    pub fn build(self) -> Value {
        let mut event = Map::new();
        let mut context = Map::new();
        if let Some(request_id) = self.request_id {
            context.insert("requestId".into(), Value::String(request_id));
        }

        match self.shape {
            EventShape::Structured => {
                context.insert(
                    "http".into(),
                    json!({ "method": self.method, "path": self.path }),
                );
                event.insert("rawPath".into(), Value::String(self.path.clone()));
            }
            EventShape::Legacy => {
                event.insert("httpMethod".into(), Value::String(self.method));
                event.insert("path".into(), Value::String(self.path));
            }
        }
        event.insert("requestContext".into(), Value::Object(context));

        let optional_map = |map: BTreeMap<String, String>| {
            if map.is_empty() {
                Value::Null
            } else {
                json!(map)
            }
        };
        event.insert("queryStringParameters".into(), optional_map(self.query));
        event.insert("pathParameters".into(), optional_map(self.path_params));
        event.insert(
            "headers".into(),
            json!({ "content-type": "application/json" }),
        );
        if let Some(body) = self.body {
            event.insert("body".into(), Value::String(body));
        }
        event.insert("isBase64Encoded".into(), Value::Bool(false));

        Value::Object(event)
    }

    /// Build and deserialize into an [`ApiRequest`].
    pub fn build_request(self) -> ApiRequest {
        serde_json::from_value(self.build()).expect("event deserializes")
    }
}

/// Mock request ID for test contexts.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{suffix}")
}

/// A valid recipe creation payload.
pub fn recipe_json(title: &str, tags: &[&str]) -> Value {
    json!({
        "title": title,
        "servings": 4,
        "ingredients": [
            { "name": "Arborio rice", "quantity": 320, "unit": "G" },
            { "name": "Mushrooms", "quantity": 250, "unit": "g" },
            { "name": "Salt" }
        ],
        "steps": [
            { "order": 2, "text": "Add the stock ladle by ladle" },
            { "order": 1, "text": "Toast the rice" }
        ],
        "tags": tags,
    })
}
