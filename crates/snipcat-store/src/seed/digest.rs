//! Seed digest canonicalization
//!
//! Computes stable SHA256 digests of seeds for reproducibility

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::seed::format::{SeedCatalog, SeedSnippet};

/// Canonical representation of a seed for digest calculation
#[derive(Debug, Clone, Serialize)]
struct CanonicalSeed<'a> {
    schema_version: u32,
    categories: Vec<CanonicalCategory<'a>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalCategory<'a> {
    slug: &'a str,
    name: &'a str,
    snippets: Vec<CanonicalSnippet<'a>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalSnippet<'a> {
    title: &'a str,
    description: &'a str,
    compatibility: &'a str,
    tags: &'a [String],
    html: &'a str,
    css: &'a str,
    javascript: &'a str,
    installation: &'a str,
    how_it_works: &'a str,
}

/// Compute a stable digest for a seed
///
/// Categories are ordered by slug and snippets by their full content, so
/// reordering entries or reformatting the YAML does not change the digest.
/// A missing optional field and an empty one digest the same.
pub fn compute_seed_digest(seed: &SeedCatalog) -> String {
    let mut categories: Vec<CanonicalCategory<'_>> = seed
        .categories
        .iter()
        .map(|c| {
            let mut snippets: Vec<CanonicalSnippet<'_>> =
                c.snippets.iter().map(canonicalize_snippet).collect();
            snippets.sort();
            CanonicalCategory {
                slug: &c.slug,
                name: &c.name,
                snippets,
            }
        })
        .collect();
    categories.sort();

    let canonical = CanonicalSeed {
        schema_version: seed.schema_version,
        categories,
    };

    let mut hasher = Sha256::new();
    // Serializing plain strings and integers into a Vec cannot fail
    if let Ok(json) = serde_json::to_vec(&canonical) {
        hasher.update(&json);
    }
    hex::encode(hasher.finalize())
}

fn canonicalize_snippet(snippet: &SeedSnippet) -> CanonicalSnippet<'_> {
    CanonicalSnippet {
        title: &snippet.title,
        description: &snippet.description,
        compatibility: &snippet.compatibility,
        tags: &snippet.tags,
        html: snippet.html.as_deref().unwrap_or(""),
        css: snippet.css.as_deref().unwrap_or(""),
        javascript: snippet.javascript.as_deref().unwrap_or(""),
        installation: snippet.installation.as_deref().unwrap_or(""),
        how_it_works: snippet.how_it_works.as_deref().unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::parser::parse_seed_str;

    const SEED: &str = r#"
schema_version: 1
categories:
  - name: Analytics
    slug: analytics
    snippets:
      - title: "Track Clicks"
        description: "Counts add-to-cart clicks"
        compatibility: "All versions"
  - name: Collections
    slug: collections
"#;

    #[test]
    fn test_seed_digest_stable() {
        let seed1 = parse_seed_str(SEED).unwrap();
        let seed2 = parse_seed_str(SEED).unwrap();

        let digest1 = compute_seed_digest(&seed1);
        assert_eq!(digest1, compute_seed_digest(&seed2));
        assert_eq!(digest1.len(), 64); // SHA256 is 64 hex chars
    }

    #[test]
    fn test_seed_digest_order_independent() {
        let reordered = r#"
schema_version: 1
categories:
  - name: Collections
    slug: collections
    snippets: []
  - name: Analytics
    slug: analytics
    snippets:
      - title: "Track Clicks"
        description: "Counts add-to-cart clicks"
        compatibility: "All versions"
        html: ""
"#;
        assert_eq!(
            compute_seed_digest(&parse_seed_str(SEED).unwrap()),
            compute_seed_digest(&parse_seed_str(reordered).unwrap()),
            "Digest should be stable regardless of category order"
        );
    }

    #[test]
    fn test_seed_digest_content_sensitive() {
        let changed = SEED.replace("Counts add-to-cart clicks", "Counts checkout clicks");
        assert_ne!(
            compute_seed_digest(&parse_seed_str(SEED).unwrap()),
            compute_seed_digest(&parse_seed_str(&changed).unwrap())
        );
    }
}
