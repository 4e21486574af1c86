//! Read-side query model: list options, filters, sort specs and the chained
//! find cursor handed out by stores.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;
use crate::recipe::Recipe;
use crate::store::RecipeStore;

/// Default page size for [`ListOptions`].
pub const DEFAULT_LIMIT: usize = 50;

/// Sortable recipe fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Servings,
    Id,
}

impl SortField {
    /// Field name as exposed in the JSON API.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
            SortField::Servings => "servings",
            SortField::Id => "id",
        }
    }

    /// Compare two recipes by this field, ascending.
    pub fn compare(self, a: &Recipe, b: &Recipe) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Servings => a.servings.cmp(&b.servings),
            SortField::Id => a.id.cmp(&b.id),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported sort value '{value}'")]
pub struct ParseSortError {
    pub value: String,
}

impl FromStr for SortField {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "servings" => Ok(SortField::Servings),
            "id" | "_id" => Ok(SortField::Id),
            other => Err(ParseSortError {
                value: other.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Lenient conversion: `"desc"` is descending, anything else ascending.
    pub fn from_direction(value: &str) -> Self {
        if value == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// Options accepted by [`RecipeService::get_all_recipes`](crate::service::RecipeService::get_all_recipes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub skip: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// `None` or an empty list applies no tag restriction.
    pub tags: Option<Vec<String>>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            tags: None,
        }
    }
}

/// Record filter. An empty `all_tags` matches every recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    all_tags: Vec<String>,
}

impl RecipeFilter {
    /// Match every recipe.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to recipes carrying every one of `tags`.
    pub fn with_all_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all_tags: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !all_tags.contains(&tag) {
                all_tags.push(tag);
            }
        }
        Self { all_tags }
    }

    /// Required tags, deduplicated.
    pub fn all_tags(&self) -> &[String] {
        &self.all_tags
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        recipe.has_all_tags(&self.all_tags)
    }
}

/// Single-field sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Compare two recipes honouring the direction.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Fully-specified query executed by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: RecipeFilter,
    pub sort: Option<SortSpec>,
    pub skip: usize,
    /// `None` returns every remaining record.
    pub limit: Option<usize>,
}

/// Chainable query builder over a [`RecipeStore`].
///
/// ```no_run
/// # use recipebox_lib::{FindCursor, MemoryRecipeStore, RecipeFilter, SortField, SortOrder, SortSpec};
/// # async fn example() -> Result<(), recipebox_lib::StoreError> {
/// let store = MemoryRecipeStore::new();
/// let recipes = FindCursor::new(&store, RecipeFilter::all())
///     .sort(SortSpec::new(SortField::Title, SortOrder::Asc))
///     .skip(10)
///     .limit(5)
///     .to_vec()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct FindCursor<'a> {
    store: &'a dyn RecipeStore,
    query: FindQuery,
}

impl<'a> FindCursor<'a> {
    pub fn new(store: &'a dyn RecipeStore, filter: RecipeFilter) -> Self {
        Self {
            store,
            query: FindQuery {
                filter,
                ..FindQuery::default()
            },
        }
    }

    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.query.sort = Some(spec);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.query.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Execute the query and materialize the results.
    pub async fn to_vec(self) -> Result<Vec<Recipe>, StoreError> {
        self.store.execute(&self.query).await
    }
}

/// Apply a query to an in-memory collection. Ties keep input order.
pub fn apply_query<'r, I>(recipes: I, query: &FindQuery) -> Vec<Recipe>
where
    I: IntoIterator<Item = &'r Recipe>,
{
    let mut matched: Vec<Recipe> = recipes
        .into_iter()
        .filter(|recipe| query.filter.matches(recipe))
        .cloned()
        .collect();

    if let Some(spec) = query.sort {
        matched.sort_by(|a, b| spec.compare(a, b));
    }

    let page = matched.into_iter().skip(query.skip);
    match query.limit {
        Some(limit) => page.take(limit).collect(),
        None => page.collect(),
    }
}
