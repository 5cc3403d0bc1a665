//! Catalog operations with boundary logging
//!
//! ## Logging Ownership
//!
//! These handlers own lifecycle logging for catalog operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Store implementations use only `tracing::debug!()` for internal details.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::store::SnippetStore;
use crate::errors::{ExError, ExResult, SnipcatError};
use crate::model::{Category, NewCategory, NewSnippet, Snippet};
use crate::rules::{validate_new_category, validate_new_snippet};
use crate::{log_op_end, log_op_error, log_op_start};

/// A category together with every snippet filed under it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub category: Category,
    pub snippets: Vec<Snippet>,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// List every category in id order
///
/// # Errors
/// Propagates store failures.
pub fn list_categories<S: SnippetStore + ?Sized>(store: &S) -> ExResult<Vec<Category>> {
    log_op_start!("list_categories");
    let start = Instant::now();

    let categories = store.list_categories().map_err(|e| {
        log_op_error!("list_categories", e.clone(), duration_ms = elapsed_ms(start));
        e.with_op("list_categories")
    })?;

    log_op_end!(
        "list_categories",
        duration_ms = elapsed_ms(start),
        count = categories.len()
    );
    Ok(categories)
}

/// Validate and create a category
///
/// # Errors
/// - `InvalidInput` with field violations
/// - `AlreadyExists` if the name or slug is taken
pub fn create_category<S: SnippetStore + ?Sized>(
    store: &mut S,
    category: NewCategory,
) -> ExResult<Category> {
    log_op_start!("create_category", category_slug = %category.slug);
    let start = Instant::now();

    let result = validate_new_category(&category)
        .map_err(ExError::from)
        .and_then(|()| store.create_category(category))
        .map_err(|e| {
            log_op_error!("create_category", e.clone(), duration_ms = elapsed_ms(start));
            e.with_op("create_category")
        })?;

    log_op_end!(
        "create_category",
        duration_ms = elapsed_ms(start),
        category_slug = %result.slug
    );
    Ok(result)
}

/// Resolve a category by slug along with its snippets
///
/// # Errors
/// `NotFound` when no category has this slug.
pub fn category_with_snippets<S: SnippetStore + ?Sized>(
    store: &S,
    slug: &str,
) -> ExResult<CategoryListing> {
    log_op_start!("category_with_snippets", category_slug = slug);
    let start = Instant::now();

    let result = category_with_snippets_impl(store, slug).map_err(|e| {
        log_op_error!(
            "category_with_snippets",
            e.clone(),
            duration_ms = elapsed_ms(start),
            category_slug = slug
        );
        e.with_op("category_with_snippets")
    })?;

    log_op_end!(
        "category_with_snippets",
        duration_ms = elapsed_ms(start),
        count = result.snippets.len()
    );
    Ok(result)
}

fn category_with_snippets_impl<S: SnippetStore + ?Sized>(
    store: &S,
    slug: &str,
) -> ExResult<CategoryListing> {
    let category = store
        .category_by_slug(slug)?
        .ok_or_else(|| SnipcatError::CategoryNotFound {
            slug: slug.to_string(),
        })?;
    let snippets = store.snippets_by_category(category.id)?;
    Ok(CategoryListing { category, snippets })
}

/// Search snippets by title or description, or list all of them
///
/// An absent or empty query lists everything. Any other query, whitespace
/// included, is matched as given.
///
/// # Errors
/// Propagates store failures.
pub fn list_or_search<S: SnippetStore + ?Sized>(
    store: &S,
    query: Option<&str>,
) -> ExResult<Vec<Snippet>> {
    let query = query.filter(|q| !q.is_empty());
    log_op_start!("list_or_search", search = query.is_some());
    let start = Instant::now();

    let result = match query {
        Some(q) => store.search_snippets(q),
        None => store.list_snippets(),
    }
    .map_err(|e| {
        log_op_error!("list_or_search", e.clone(), duration_ms = elapsed_ms(start));
        e.with_op("list_or_search")
    })?;

    log_op_end!(
        "list_or_search",
        duration_ms = elapsed_ms(start),
        count = result.len()
    );
    Ok(result)
}

/// Fetch a snippet for display, counting one view
///
/// # Errors
/// `NotFound` when the id is unknown.
pub fn view_snippet<S: SnippetStore + ?Sized>(store: &mut S, id: i64) -> ExResult<Snippet> {
    log_op_start!("view_snippet", snippet_id = id);
    let start = Instant::now();

    let result = store
        .increment_view_count(id)
        .and_then(|found| {
            found.ok_or_else(|| SnipcatError::SnippetNotFound { snippet_id: id }.into())
        })
        .map_err(|e| {
            log_op_error!(
                "view_snippet",
                e.clone(),
                duration_ms = elapsed_ms(start),
                snippet_id = id
            );
            e.with_op("view_snippet")
        })?;

    log_op_end!(
        "view_snippet",
        duration_ms = elapsed_ms(start),
        snippet_id = id,
        view_count = result.view_count
    );
    Ok(result)
}

/// Fetch a snippet without counting a view
///
/// Used by preview surfaces, which render the code but are not a visit.
///
/// # Errors
/// `NotFound` when the id is unknown.
pub fn get_snippet<S: SnippetStore + ?Sized>(store: &S, id: i64) -> ExResult<Snippet> {
    store
        .snippet_by_id(id)?
        .ok_or_else(|| SnipcatError::SnippetNotFound { snippet_id: id }.into())
}

/// Validate and create a snippet
///
/// # Errors
/// - `InvalidInput` with field violations, including an unknown category
pub fn create_snippet<S: SnippetStore + ?Sized>(
    store: &mut S,
    snippet: NewSnippet,
) -> ExResult<Snippet> {
    log_op_start!("create_snippet", category_id = snippet.category_id);
    let start = Instant::now();

    let result = create_snippet_impl(store, snippet).map_err(|e| {
        log_op_error!("create_snippet", e.clone(), duration_ms = elapsed_ms(start));
        e.with_op("create_snippet")
    })?;

    log_op_end!(
        "create_snippet",
        duration_ms = elapsed_ms(start),
        snippet_id = result.id
    );
    Ok(result)
}

fn create_snippet_impl<S: SnippetStore + ?Sized>(
    store: &mut S,
    mut snippet: NewSnippet,
) -> ExResult<Snippet> {
    validate_new_snippet(&snippet)?;

    if store.category_by_id(snippet.category_id)?.is_none() {
        return Err(SnipcatError::CategoryIdNotFound {
            category_id: snippet.category_id,
        }
        .into());
    }

    snippet.tags = snippet.tags.iter().map(|t| t.trim().to_string()).collect();
    store.create_snippet(snippet)
}
