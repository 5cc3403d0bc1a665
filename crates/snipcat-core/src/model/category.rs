use serde::{Deserialize, Serialize};

/// A named group of snippets, addressed by its slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Display name (unique)
    pub name: String,
    /// URL-safe identifier (unique)
    pub slug: String,
}

/// Writable fields of a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }

    /// Attach a store-assigned id
    pub fn into_category(self, id: i64) -> Category {
        Category {
            id,
            name: self.name,
            slug: self.slug,
        }
    }
}
