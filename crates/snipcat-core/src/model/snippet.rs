use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::code::SnippetCode;

/// A catalog entry: a reusable HTML/CSS/JavaScript fragment with its docs
///
/// Serialized in camelCase to match the catalog API wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub html: Option<String>,
    pub css: Option<String>,
    pub javascript: Option<String>,
    /// Installation instructions (HTML, served verbatim)
    pub installation: Option<String>,
    /// Explanation of the technique (HTML, served verbatim)
    pub how_it_works: Option<String>,
    pub category_id: i64,
    pub tags: Vec<String>,
    /// Platform versions the snippet targets, e.g. "Shopify 2.0+"
    pub compatibility: String,
    pub updated_at: DateTime<Utc>,
    pub view_count: i64,
}

impl Snippet {
    /// Snapshot the renderable triple; missing fields become empty strings
    pub fn code(&self) -> SnippetCode {
        SnippetCode {
            html: self.html.clone().unwrap_or_default(),
            css: self.css.clone().unwrap_or_default(),
            javascript: self.javascript.clone().unwrap_or_default(),
        }
    }
}

/// Writable fields of a snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippet {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub javascript: Option<String>,
    #[serde(default)]
    pub installation: Option<String>,
    #[serde(default)]
    pub how_it_works: Option<String>,
    pub category_id: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub compatibility: String,
}

impl NewSnippet {
    /// Attach a store-assigned id, a fresh timestamp and a zero view count
    pub fn into_snippet(self, id: i64, updated_at: DateTime<Utc>) -> Snippet {
        Snippet {
            id,
            title: self.title,
            description: self.description,
            html: self.html,
            css: self.css,
            javascript: self.javascript,
            installation: self.installation,
            how_it_works: self.how_it_works,
            category_id: self.category_id,
            tags: self.tags,
            compatibility: self.compatibility,
            updated_at,
            view_count: 0,
        }
    }
}
