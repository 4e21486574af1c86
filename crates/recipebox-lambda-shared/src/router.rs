//! Minimal method + path router.
//!
//! Routes are tried in registration order and the first match wins. A route
//! matches when its method equals the request method exactly and either its
//! pattern equals the path verbatim or the compiled matcher accepts it.
//! `{name}` placeholders capture one non-empty path segment and are merged
//! into the request's path parameters before the handler runs. Requests that
//! match nothing get a 404 problem response without invoking any handler.

use std::future::Future;
use std::pin::Pin;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::{ApiRequest, ApiResponse, ProblemDetails};

/// Boxed future returned by a route handler.
pub type HandlerFuture<E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + Send>>;

type BoxedHandler<E> = Box<dyn Fn(ApiRequest) -> HandlerFuture<E> + Send + Sync>;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Errors raised while registering a route.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

struct Route<E> {
    method: String,
    pattern: String,
    matcher: Regex,
    param_names: Vec<String>,
    handler: BoxedHandler<E>,
}

/// Ordered route table. `E` is the handler error type, propagated unchanged.
pub struct Router<E = lambda_runtime::Error> {
    routes: Vec<Route<E>>,
}

impl<E> Default for Router<E> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<E: Send + 'static> Router<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` and `pattern`.
    ///
    /// The pattern is compiled here, once. Duplicate registrations are
    /// allowed; the earlier one shadows the later.
    pub fn add_route<F, Fut>(
        &mut self,
        method: impl Into<String>,
        pattern: impl Into<String>,
        handler: F,
    ) -> Result<&mut Self, RouterError>
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse, E>> + Send + 'static,
    {
        let method = method.into();
        let pattern = pattern.into();
        let (matcher, param_names) = compile_pattern(&pattern)?;
        debug!(%method, %pattern, params = ?param_names, "route registered");

        self.routes.push(Route {
            method,
            pattern,
            matcher,
            param_names,
            handler: Box::new(move |request| Box::pin(handler(request))),
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch `request` to the first matching route.
    pub async fn route(&self, mut request: ApiRequest) -> Result<ApiResponse, E> {
        let method = request.method().to_string();
        let path = request.path().to_string();

        for route in &self.routes {
            if route.method != method {
                continue;
            }

            if route.pattern == path {
                debug!(%method, %path, "exact route match");
                return (route.handler)(request).await;
            }

            if let Some(captures) = route.matcher.captures(&path) {
                let params: Vec<(String, String)> = route
                    .param_names
                    .iter()
                    .zip(captures.iter().skip(1))
                    .filter_map(|(name, value)| {
                        value.map(|value| (name.clone(), value.as_str().to_string()))
                    })
                    .collect();
                debug!(%method, %path, pattern = %route.pattern, "pattern route match");
                request.merge_path_params(params);
                return (route.handler)(request).await;
            }
        }

        info!(%method, %path, request_id = %request.request_id(), "no route matched");
        Ok(ProblemDetails::route_not_found(&method, &path, request.request_id()).into())
    }
}

/// Compile a route pattern into an anchored matcher and its placeholder names.
fn compile_pattern(pattern: &str) -> Result<(Regex, Vec<String>), RouterError> {
    let invalid = |message: String| RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        message,
    };
    let push_literal = |source: &mut String, literal: &str| -> Result<(), RouterError> {
        if literal.contains(['{', '}']) {
            return Err(invalid("unbalanced or malformed placeholder".to_string()));
        }
        source.push_str(&regex::escape(literal));
        Ok(())
    };

    let mut source = String::from("^");
    let mut names: Vec<String> = Vec::new();
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(pattern) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        push_literal(&mut source, &pattern[last..whole.start()])?;
        if names.iter().any(|existing| existing == name.as_str()) {
            return Err(invalid(format!(
                "placeholder '{}' appears more than once",
                name.as_str()
            )));
        }
        source.push_str("([^/]+)");
        names.push(name.as_str().to_string());
        last = whole.end();
    }
    push_literal(&mut source, &pattern[last..])?;
    source.push('$');

    Ok((Regex::new(&source)?, names))
}
