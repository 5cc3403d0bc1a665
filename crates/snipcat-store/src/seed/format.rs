//! Catalog seed schema
//!
//! Defines the YAML structure for seed import

use serde::{Deserialize, Serialize};
use snipcat_core::model::NewSnippet;

/// The only schema version this build reads
pub const SEED_SCHEMA_VERSION: u32 = 1;

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCatalog {
    pub schema_version: u32,

    /// Categories in insertion order, each with its snippets
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub slug: String,

    #[serde(default)]
    pub snippets: Vec<SeedSnippet>,
}

/// Snippet definition in seed; the category comes from the enclosing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSnippet {
    pub title: String,
    pub description: String,
    pub compatibility: String,
    #[serde(default)]
    pub tags: Vec<String>,
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
}

impl SeedSnippet {
    /// Attach the id of the category this snippet was filed under
    pub fn to_new_snippet(&self, category_id: i64) -> NewSnippet {
        NewSnippet {
            title: self.title.clone(),
            description: self.description.clone(),
            html: self.html.clone(),
            css: self.css.clone(),
            javascript: self.javascript.clone(),
            installation: self.installation.clone(),
            how_it_works: self.how_it_works.clone(),
            category_id,
            tags: self.tags.clone(),
            compatibility: self.compatibility.clone(),
        }
    }
}
