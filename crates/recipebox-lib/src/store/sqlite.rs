use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{materialize, new_recipe_id, now_micros, parse_recipe_id, RecipeStore};
use crate::error::StoreError;
use crate::query::{FindQuery, SortField, SortOrder};
use crate::recipe::{NewRecipe, Recipe};
use crate::schema;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS recipes (
        seq         INTEGER PRIMARY KEY AUTOINCREMENT,
        id          TEXT NOT NULL UNIQUE,
        title       TEXT NOT NULL,
        servings    INTEGER NOT NULL,
        ingredients TEXT NOT NULL,
        steps       TEXT NOT NULL,
        tags        TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS recipe_tags (
        recipe_id TEXT NOT NULL REFERENCES recipes(id),
        tag       TEXT NOT NULL,
        PRIMARY KEY (recipe_id, tag)
    );
    CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag);
";

const SELECT_COLUMNS: &str =
    "SELECT id, title, servings, ingredients, steps, tags, created_at, updated_at FROM recipes";

/// SQLite-backed recipe store.
///
/// The connection lives behind a mutex and every operation runs on the
/// blocking thread pool. Nested collections are stored as JSON columns; tags
/// are mirrored into `recipe_tags` for superset filtering.
#[derive(Debug, Clone)]
pub struct SqliteRecipeStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecipeStore {
    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening recipe database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Unavailable {
                message: "sqlite connection lock poisoned".to_string(),
            })?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable {
            message: format!("blocking task failed: {e}"),
        })?
    }
}

#[async_trait]
impl RecipeStore for SqliteRecipeStore {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let valid = schema::validate(recipe).map_err(|fields| StoreError::Validation { fields })?;
        let recipe = materialize(valid, new_recipe_id(), now_micros());

        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO recipes (id, title, servings, ingredients, steps, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    recipe.id,
                    recipe.title,
                    recipe.servings,
                    serde_json::to_string(&recipe.ingredients)?,
                    serde_json::to_string(&recipe.steps)?,
                    serde_json::to_string(&recipe.tags)?,
                    format_timestamp(&recipe.created_at),
                    format_timestamp(&recipe.updated_at),
                ],
            )?;
            {
                let mut insert_tag = tx.prepare(
                    "INSERT OR IGNORE INTO recipe_tags (recipe_id, tag) VALUES (?1, ?2)",
                )?;
                for tag in &recipe.tags {
                    insert_tag.execute(params![recipe.id, tag])?;
                }
            }
            tx.commit()?;
            debug!(id = %recipe.id, "recipe inserted");
            Ok(recipe)
        })
        .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        let id = parse_recipe_id(id)?.to_string();
        self.with_connection(move |conn| {
            let recipe = conn
                .query_row(
                    &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                    params![id],
                    recipe_from_row,
                )
                .optional()?;
            Ok(recipe)
        })
        .await
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn execute(&self, query: &FindQuery) -> Result<Vec<Recipe>, StoreError> {
        let (sql, values) = build_select(query);
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), recipe_from_row)?;
            let recipes = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(recipes)
        })
        .await
    }
}

/// Build the SELECT statement and its positional parameters for `query`.
fn build_select(query: &FindQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(SELECT_COLUMNS);
    let mut values = Vec::new();

    let tags = query.filter.all_tags();
    if !tags.is_empty() {
        let placeholders = vec!["?"; tags.len()].join(", ");
        sql.push_str(&format!(
            " WHERE id IN (SELECT recipe_id FROM recipe_tags WHERE tag IN ({placeholders}) \
             GROUP BY recipe_id HAVING COUNT(DISTINCT tag) = ?)"
        ));
        values.extend(tags.iter().cloned().map(Value::Text));
        values.push(Value::Integer(tags.len() as i64));
    }

    match query.sort {
        Some(spec) => sql.push_str(&format!(
            " ORDER BY {} {}, seq ASC",
            sort_column(spec.field),
            match spec.order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            }
        )),
        None => sql.push_str(" ORDER BY seq ASC"),
    }

    // SQLite treats a negative LIMIT as unbounded; OFFSET requires a LIMIT.
    let limit = query
        .limit
        .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX))
        .unwrap_or(-1);
    sql.push_str(" LIMIT ? OFFSET ?");
    values.push(Value::Integer(limit));
    values.push(Value::Integer(
        i64::try_from(query.skip).unwrap_or(i64::MAX),
    ));

    (sql, values)
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Title => "title",
        SortField::Servings => "servings",
        SortField::Id => "id",
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        servings: row.get(2)?,
        ingredients: json_column(row, 3)?,
        steps: json_column(row, 4)?,
        tags: json_column(row, 5)?,
        created_at: timestamp_column(row, 6)?,
        updated_at: timestamp_column(row, 7)?,
    })
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
