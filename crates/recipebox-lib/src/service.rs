//! Recipe domain service.
//!
//! Validates and normalizes input before any write, builds filter, sort and
//! pagination parameters before any read, and translates the one known store
//! failure shape (field validation) into [`RecipeError::ValidationFailed`].
//! Every other store failure is passed through unchanged.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{RecipeError, Result, StoreError};
use crate::normalize::{has_duplicate_step_orders, normalize_tags, sort_steps};
use crate::query::{FindCursor, ListOptions, RecipeFilter, SortSpec};
use crate::recipe::{NewRecipe, Recipe};
use crate::store::RecipeStore;

/// Domain service over an injected [`RecipeStore`].
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Create a recipe.
    ///
    /// Duplicate step orders are rejected before the store is touched. Steps
    /// are then sorted by `order` and tags normalized before the insert.
    pub async fn add_recipe(&self, mut input: NewRecipe) -> Result<Recipe> {
        if has_duplicate_step_orders(&input.steps) {
            warn!(title = %input.title, "rejecting recipe with duplicate step orders");
            return Err(RecipeError::DuplicateStepOrder);
        }

        if !input.steps.is_empty() {
            sort_steps(&mut input.steps);
        }
        if !input.tags.is_empty() {
            input.tags = normalize_tags(&input.tags);
        }

        match self.store.insert(input).await {
            Ok(recipe) => {
                info!(id = %recipe.id, title = %recipe.title, "recipe created");
                Ok(recipe)
            }
            Err(StoreError::Validation { fields }) => {
                let messages = messages_in_field_order(fields);
                debug!(count = messages.len(), "recipe failed schema validation");
                Err(RecipeError::ValidationFailed { messages })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Fetch a recipe by identifier.
    ///
    /// A malformed identifier is reported exactly like a missing one: both
    /// yield `Ok(None)`.
    pub async fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        match self.store.find_by_id(id).await {
            Ok(recipe) => Ok(recipe),
            Err(StoreError::MalformedId { id }) => {
                debug!(id = %id, "malformed recipe id treated as not found");
                Ok(None)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// List recipes with tag filtering, single-field sort and pagination.
    pub async fn get_all_recipes(&self, options: &ListOptions) -> Result<Vec<Recipe>> {
        let filter = match options.tags.as_deref() {
            Some(tags) if !tags.is_empty() => RecipeFilter::with_all_tags(tags.iter().cloned()),
            _ => RecipeFilter::all(),
        };

        let recipes = FindCursor::new(self.store.as_ref(), filter)
            .sort(SortSpec::new(options.sort_by, options.sort_order))
            .skip(options.skip)
            .limit(options.limit)
            .to_vec()
            .await?;

        debug!(
            count = recipes.len(),
            sort_by = %options.sort_by,
            skip = options.skip,
            limit = options.limit,
            "recipes listed"
        );
        Ok(recipes)
    }
}

/// One segment of a field path such as `steps.10.text`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PathSegment {
    Index(usize),
    Name(String),
}

/// Field messages ordered by path, with list indexes compared numerically.
fn messages_in_field_order(fields: BTreeMap<String, String>) -> Vec<String> {
    let mut entries: Vec<(String, String)> = fields.into_iter().collect();
    entries.sort_by_cached_key(|(path, _)| {
        path.split('.')
            .map(|segment| match segment.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Name(segment.to_string()),
            })
            .collect::<Vec<_>>()
    });
    entries.into_iter().map(|(_, message)| message).collect()
}
