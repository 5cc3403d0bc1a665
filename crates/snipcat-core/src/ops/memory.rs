use std::collections::BTreeMap;

use chrono::Utc;

use super::store::SnippetStore;
use crate::errors::{ExResult, SnipcatError};
use crate::model::{Category, NewCategory, NewSnippet, Snippet};

/// In-memory store for categories and snippets
///
/// BTreeMap-backed so listings come out in id order. Not thread-safe;
/// callers that share it wrap it in a lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: BTreeMap<i64, Category>,
    snippets: BTreeMap<i64, Snippet>,
    next_category_id: i64,
    next_snippet_id: i64,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed snippet, bypassing id assignment
    ///
    /// Used by tests and importers that need fixed ids or view counts.
    pub fn insert_snippet(&mut self, snippet: Snippet) {
        self.next_snippet_id = self.next_snippet_id.max(snippet.id);
        self.snippets.insert(snippet.id, snippet);
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl SnippetStore for MemoryStore {
    fn list_categories(&self) -> ExResult<Vec<Category>> {
        Ok(self.categories.values().cloned().collect())
    }

    fn category_by_slug(&self, slug: &str) -> ExResult<Option<Category>> {
        Ok(self.categories.values().find(|c| c.slug == slug).cloned())
    }

    fn category_by_id(&self, id: i64) -> ExResult<Option<Category>> {
        Ok(self.categories.get(&id).cloned())
    }

    fn create_category(&mut self, category: NewCategory) -> ExResult<Category> {
        if self.categories.values().any(|c| c.name == category.name) {
            return Err(SnipcatError::DuplicateCategory {
                field: "name".to_string(),
                value: category.name,
            }
            .into());
        }
        if self.categories.values().any(|c| c.slug == category.slug) {
            return Err(SnipcatError::DuplicateCategory {
                field: "slug".to_string(),
                value: category.slug,
            }
            .into());
        }

        self.next_category_id += 1;
        let created = category.into_category(self.next_category_id);
        self.categories.insert(created.id, created.clone());
        Ok(created)
    }

    fn list_snippets(&self) -> ExResult<Vec<Snippet>> {
        Ok(self.snippets.values().cloned().collect())
    }

    fn snippet_by_id(&self, id: i64) -> ExResult<Option<Snippet>> {
        Ok(self.snippets.get(&id).cloned())
    }

    fn snippets_by_category(&self, category_id: i64) -> ExResult<Vec<Snippet>> {
        Ok(self
            .snippets
            .values()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect())
    }

    fn create_snippet(&mut self, snippet: NewSnippet) -> ExResult<Snippet> {
        self.next_snippet_id += 1;
        let created = snippet.into_snippet(self.next_snippet_id, Utc::now());
        self.snippets.insert(created.id, created.clone());
        Ok(created)
    }

    fn increment_view_count(&mut self, id: i64) -> ExResult<Option<Snippet>> {
        Ok(self.snippets.get_mut(&id).map(|s| {
            s.view_count += 1;
            s.clone()
        }))
    }

    fn search_snippets(&self, query: &str) -> ExResult<Vec<Snippet>> {
        let needle = query.to_lowercase();
        Ok(self
            .snippets
            .values()
            .filter(|s| {
                contains_ignore_case(&s.title, &needle)
                    || contains_ignore_case(&s.description, &needle)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_new_store() {
        let store = MemoryStore::new();
        assert!(store.list_categories().unwrap().is_empty());
        assert!(store.list_snippets().unwrap().is_empty());
    }

    #[test]
    fn test_category_ids_are_sequential() {
        let mut store = MemoryStore::new();
        let a = store
            .create_category(NewCategory::new("Analytics", "analytics"))
            .unwrap();
        let b = store
            .create_category(NewCategory::new("Collections", "collections"))
            .unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut store = MemoryStore::new();
        store
            .create_category(NewCategory::new("Analytics", "analytics"))
            .unwrap();
        let err = store
            .create_category(NewCategory::new("Other", "analytics"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_increment_missing_snippet_is_none() {
        let mut store = MemoryStore::new();
        assert!(store.increment_view_count(42).unwrap().is_none());
    }
}
