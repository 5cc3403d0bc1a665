//! SQLite implementation of the snippet store
//!
//! Tags are stored as a JSON array in a TEXT column and timestamps as unix
//! seconds. Search uses `LIKE` with `%`, `_` and `\` in the query escaped.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use snipcat_core::errors::{ExResult, SnipcatError};
use snipcat_core::model::{Category, NewCategory, NewSnippet, Snippet};
use snipcat_core::SnippetStore;

use crate::db;
use crate::errors::{from_rusqlite, serialization_error};

const SNIPPET_COLUMNS: &str = "id, title, description, html, css, javascript, installation, \
     how_it_works, category_id, tags, compatibility, updated_at, view_count";

/// Catalog store backed by one SQLite connection
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and migrate) the catalog database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> ExResult<Self> {
        Ok(Self {
            conn: db::open_catalog(path)?,
        })
    }

    /// A migrated in-memory catalog
    pub fn in_memory() -> ExResult<Self> {
        let mut conn = db::open_in_memory()?;
        crate::migrations::apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Wrap an already-migrated connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    fn query_snippets(
        &self,
        where_clause: &str,
        params: impl rusqlite::Params,
    ) -> ExResult<Vec<Snippet>> {
        let sql = format!(
            "SELECT {} FROM snippets {} ORDER BY id",
            SNIPPET_COLUMNS, where_clause
        );
        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params, snippet_from_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    fn category_where(&self, column: &str, value: &dyn rusqlite::ToSql) -> ExResult<Option<Category>> {
        let sql = format!("SELECT id, name, slug FROM categories WHERE {} = ?1", column);
        self.conn
            .query_row(&sql, [value], category_from_row)
            .optional()
            .map_err(from_rusqlite)
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
    })
}

fn snippet_from_row(row: &Row<'_>) -> rusqlite::Result<Snippet> {
    let tags_json: String = row.get(9)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    let updated_secs: i64 = row.get(11)?;
    let updated_at = DateTime::<Utc>::from_timestamp(updated_secs, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(11, updated_secs))?;

    Ok(Snippet {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        html: row.get(3)?,
        css: row.get(4)?,
        javascript: row.get(5)?,
        installation: row.get(6)?,
        how_it_works: row.get(7)?,
        category_id: row.get(8)?,
        tags,
        compatibility: row.get(10)?,
        updated_at,
        view_count: row.get(12)?,
    })
}

/// Escape `LIKE` wildcards so the query matches literally
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl SnippetStore for SqliteStore {
    fn list_categories(&self) -> ExResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, slug FROM categories ORDER BY id")
            .map_err(from_rusqlite)?;
        let categories = stmt
            .query_map([], category_from_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(categories)
    }

    fn category_by_slug(&self, slug: &str) -> ExResult<Option<Category>> {
        self.category_where("slug", &slug)
    }

    fn category_by_id(&self, id: i64) -> ExResult<Option<Category>> {
        self.category_where("id", &id)
    }

    fn create_category(&mut self, category: NewCategory) -> ExResult<Category> {
        if self.category_where("name", &category.name)?.is_some() {
            return Err(SnipcatError::DuplicateCategory {
                field: "name".to_string(),
                value: category.name,
            }
            .into());
        }
        if self.category_where("slug", &category.slug)?.is_some() {
            return Err(SnipcatError::DuplicateCategory {
                field: "slug".to_string(),
                value: category.slug,
            }
            .into());
        }

        self.conn
            .execute(
                "INSERT INTO categories (name, slug) VALUES (?1, ?2)",
                rusqlite::params![category.name, category.slug],
            )
            .map_err(from_rusqlite)?;
        let id = self.conn.last_insert_rowid();

        tracing::debug!(category_id = id, slug = %category.slug, "category inserted");
        Ok(category.into_category(id))
    }

    fn list_snippets(&self) -> ExResult<Vec<Snippet>> {
        self.query_snippets("", [])
    }

    fn snippet_by_id(&self, id: i64) -> ExResult<Option<Snippet>> {
        Ok(self.query_snippets("WHERE id = ?1", [id])?.into_iter().next())
    }

    fn snippets_by_category(&self, category_id: i64) -> ExResult<Vec<Snippet>> {
        self.query_snippets("WHERE category_id = ?1", [category_id])
    }

    fn create_snippet(&mut self, snippet: NewSnippet) -> ExResult<Snippet> {
        let tags = serde_json::to_string(&snippet.tags)
            .map_err(|e| serialization_error("tags", e))?;
        let now = Utc::now();

        self.conn
            .execute(
                "INSERT INTO snippets (title, description, html, css, javascript, installation,
                    how_it_works, category_id, tags, compatibility, updated_at, view_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0)",
                rusqlite::params![
                    snippet.title,
                    snippet.description,
                    snippet.html,
                    snippet.css,
                    snippet.javascript,
                    snippet.installation,
                    snippet.how_it_works,
                    snippet.category_id,
                    tags,
                    snippet.compatibility,
                    now.timestamp(),
                ],
            )
            .map_err(from_rusqlite)?;
        let id = self.conn.last_insert_rowid();

        tracing::debug!(snippet_id = id, "snippet inserted");
        // Stored at second precision; hand back what a later read returns.
        let stored_at = DateTime::<Utc>::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        Ok(snippet.into_snippet(id, stored_at))
    }

    fn increment_view_count(&mut self, id: i64) -> ExResult<Option<Snippet>> {
        let changed = self
            .conn
            .execute(
                "UPDATE snippets SET view_count = view_count + 1 WHERE id = ?1",
                [id],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Ok(None);
        }
        self.snippet_by_id(id)
    }

    fn search_snippets(&self, query: &str) -> ExResult<Vec<Snippet>> {
        let pattern = format!("%{}%", escape_like(query));
        self.query_snippets(
            "WHERE title LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'",
            [pattern],
        )
    }
}
