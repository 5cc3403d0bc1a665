use crate::errors::ExResult;
use crate::model::{Category, NewCategory, NewSnippet, Snippet};

/// Persistence contract for categories and snippets
///
/// Implementations store records as given: validation belongs to the
/// catalog operations in [`super::catalog`]. Implementations do enforce
/// uniqueness of category name and slug (`AlreadyExists`).
///
/// Listing methods return records in ascending id order.
pub trait SnippetStore {
    fn list_categories(&self) -> ExResult<Vec<Category>>;

    fn category_by_slug(&self, slug: &str) -> ExResult<Option<Category>>;

    fn category_by_id(&self, id: i64) -> ExResult<Option<Category>>;

    /// # Errors
    /// `AlreadyExists` if the name or slug is taken.
    fn create_category(&mut self, category: NewCategory) -> ExResult<Category>;

    fn list_snippets(&self) -> ExResult<Vec<Snippet>>;

    /// Fetch one snippet without counting a view
    fn snippet_by_id(&self, id: i64) -> ExResult<Option<Snippet>>;

    fn snippets_by_category(&self, category_id: i64) -> ExResult<Vec<Snippet>>;

    fn create_snippet(&mut self, snippet: NewSnippet) -> ExResult<Snippet>;

    /// Add one to the view counter, returning the updated record
    fn increment_view_count(&mut self, id: i64) -> ExResult<Option<Snippet>>;

    /// Case-insensitive substring match on title or description
    fn search_snippets(&self, query: &str) -> ExResult<Vec<Snippet>>;
}
