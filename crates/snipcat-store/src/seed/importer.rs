//! Seed importer orchestration
//!
//! Writes a parsed seed into the catalog inside one transaction and records
//! the import in `seed_imports`.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::errors::{from_rusqlite, serialization_error, Result};
use crate::seed::format::SeedCatalog;
use crate::seed::{compute_seed_digest, default_seed, parse_seed_file};

/// What an import did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub digest: String,
    pub categories_created: usize,
    pub snippets_created: usize,
    /// True when the catalog already had categories and `force` was off
    pub skipped: bool,
}

/// Import a seed file into the database
pub fn import_seed_file(path: &Path, conn: &mut Connection, force: bool) -> Result<ImportOutcome> {
    let seed = parse_seed_file(path)?;
    import_seed(&seed, conn, force)
}

/// Import the bundled starter catalog
pub fn import_default_seed(conn: &mut Connection, force: bool) -> Result<ImportOutcome> {
    let seed = default_seed()?;
    import_seed(&seed, conn, force)
}

/// Import a parsed seed
///
/// An empty catalog receives the whole seed. A catalog that already has
/// categories is left alone unless `force` is set; a forced import adds
/// only the categories (by slug) and snippets (by title within a category)
/// that are missing, so repeating it is harmless.
///
/// Returns the seed digest along with counts of what was written.
pub fn import_seed(seed: &SeedCatalog, conn: &mut Connection, force: bool) -> Result<ImportOutcome> {
    let digest = compute_seed_digest(seed);

    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .map_err(from_rusqlite)?;
    if existing > 0 && !force {
        tracing::debug!(digest = %digest, "seed import skipped: catalog not empty");
        return Ok(ImportOutcome {
            digest,
            categories_created: 0,
            snippets_created: 0,
            skipped: true,
        });
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let now = chrono::Utc::now().timestamp();
    let mut categories_created = 0;
    let mut snippets_created = 0;

    for category in &seed.categories {
        let found: Option<i64> = tx
            .query_row(
                "SELECT id FROM categories WHERE slug = ?1",
                [&category.slug],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        let category_id = match found {
            Some(id) => id,
            None => {
                tx.execute(
                    "INSERT INTO categories (name, slug) VALUES (?1, ?2)",
                    rusqlite::params![category.name, category.slug],
                )
                .map_err(from_rusqlite)?;
                categories_created += 1;
                tx.last_insert_rowid()
            }
        };

        for snippet in &category.snippets {
            let present: Option<i64> = tx
                .query_row(
                    "SELECT id FROM snippets WHERE category_id = ?1 AND title = ?2",
                    rusqlite::params![category_id, snippet.title],
                    |row| row.get(0),
                )
                .optional()
                .map_err(from_rusqlite)?;
            if present.is_some() {
                continue;
            }

            let tags =
                serde_json::to_string(&snippet.tags).map_err(|e| serialization_error("tags", e))?;
            tx.execute(
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
                    category_id,
                    tags,
                    snippet.compatibility,
                    now,
                ],
            )
            .map_err(from_rusqlite)?;
            snippets_created += 1;
        }
    }

    tx.execute(
        "INSERT INTO seed_imports (digest, imported_at, categories_created, snippets_created)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![digest, now, categories_created as i64, snippets_created as i64],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        digest = %digest,
        categories_created,
        snippets_created,
        "seed imported"
    );

    Ok(ImportOutcome {
        digest,
        categories_created,
        snippets_created,
        skipped: false,
    })
}
