//! Request DTOs and validation for the recipe endpoints.

use std::collections::BTreeMap;

use recipebox_lib::{normalize_tags, ListOptions, SortField, SortOrder, DEFAULT_LIMIT};

use crate::ProblemDetails;

/// Largest page size accepted by `GET /recipes`.
pub const MAX_LIMIT: usize = 100;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Raw query-string options for `GET /recipes`.
///
/// Values stay as strings until validated so that a bad number is reported
/// as a 400 with a precise message rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRecipesQuery {
    pub limit: Option<String>,
    pub skip: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub tags: Option<String>,
}

impl ListRecipesQuery {
    /// Pick the supported keys out of the query-string parameters.
    pub fn from_params(params: Option<&BTreeMap<String, String>>) -> Self {
        let get = |key: &str| params.and_then(|p| p.get(key)).cloned();
        Self {
            limit: get("limit"),
            skip: get("skip"),
            sort_by: get("sortBy"),
            sort_order: get("sortOrder"),
            tags: get("tags"),
        }
    }

    /// Validate and convert into service list options.
    pub fn to_list_options(&self, request_id: &str) -> Result<ListOptions, Box<ProblemDetails>> {
        self.validate(request_id)?;

        let mut options = ListOptions::default();
        if let Some(limit) = parse_limit(self.limit.as_deref()) {
            options.limit = limit;
        }
        if let Some(Ok(skip)) = self.skip.as_deref().map(|s| s.trim().parse::<usize>()) {
            options.skip = skip;
        }
        if let Some(Ok(field)) = self.sort_by.as_deref().map(|s| s.trim().parse::<SortField>()) {
            options.sort_by = field;
        }
        if let Some(raw) = self.sort_order.as_deref() {
            options.sort_order = SortOrder::from_direction(&raw.trim().to_ascii_lowercase());
        }
        let tags = self.tag_list();
        if !tags.is_empty() {
            options.tags = Some(tags);
        }
        Ok(options)
    }

    /// Comma-separated tags, trimmed, lowercased, empties dropped.
    fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|raw| normalize_tags(raw.split(',').filter(|tag| !tag.trim().is_empty())))
            .unwrap_or_default()
    }
}

fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
}

impl Validate for ListRecipesQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(raw) = self.limit.as_deref() {
            match parse_limit(Some(raw)) {
                Some(limit) if (1..=MAX_LIMIT).contains(&limit) => {}
                _ => {
                    return Err(Box::new(ProblemDetails::bad_request(
                        format!(
                            "The 'limit' parameter must be an integer between 1 and {} (default {})",
                            MAX_LIMIT, DEFAULT_LIMIT
                        ),
                        request_id,
                    )));
                }
            }
        }

        if let Some(raw) = self.skip.as_deref() {
            if raw.trim().parse::<usize>().is_err() {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'skip' parameter must be a non-negative integer",
                    request_id,
                )));
            }
        }

        if let Some(raw) = self.sort_by.as_deref() {
            if raw.trim().parse::<SortField>().is_err() {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!(
                        "The 'sortBy' parameter must be one of: createdAt, updatedAt, title, servings, id (got '{}')",
                        raw
                    ),
                    request_id,
                )));
            }
        }

        Ok(())
    }
}
