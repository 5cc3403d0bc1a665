//! Seed parser with validation
//!
//! Parses YAML and validates schema version, category uniqueness and the
//! snippet rules shared with the catalog operations

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use snipcat_core::errors::ExError;
use snipcat_core::model::NewCategory;
use snipcat_core::rules::{validate_new_category, validate_new_snippet};

use crate::errors::{seed_validation, Result};
use crate::seed::format::{SeedCatalog, SEED_SCHEMA_VERSION};

/// The bundled starter catalog
pub const DEFAULT_SEED: &str = include_str!("../../seeds/default.yaml");

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedCatalog> {
    let content = fs::read_to_string(path)
        .map_err(|e| seed_validation(&format!("Failed to read seed file: {}", e)))?;

    parse_seed_str(&content)
}

/// Parse the bundled starter catalog
pub fn default_seed() -> Result<SeedCatalog> {
    parse_seed_str(DEFAULT_SEED)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<SeedCatalog> {
    let seed: SeedCatalog = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed)?;

    Ok(seed)
}

/// Validate a parsed seed
fn validate_seed(seed: &SeedCatalog) -> Result<()> {
    if seed.schema_version != SEED_SCHEMA_VERSION {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected {}",
            seed.schema_version, SEED_SCHEMA_VERSION
        )));
    }

    let mut names = HashSet::new();
    let mut slugs = HashSet::new();

    for category in &seed.categories {
        validate_new_category(&NewCategory::new(&category.name, &category.slug))
            .map_err(|e| in_seed(e.into(), &category.slug))?;

        if !names.insert(category.name.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate category name: {}",
                category.name
            )));
        }
        if !slugs.insert(category.slug.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate category slug: {}",
                category.slug
            )));
        }

        for snippet in &category.snippets {
            // Placeholder id: the real one is assigned on import
            validate_new_snippet(&snippet.to_new_snippet(1))
                .map_err(|e| in_seed(e.into(), &snippet.title))?;
        }
    }

    Ok(())
}

fn in_seed(err: ExError, entity: &str) -> ExError {
    let detail = err
        .violations()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    seed_validation(&format!("Invalid seed entry '{}': {}", entity, detail))
        .with_entity_id(entity)
        .with_violations(err.violations().to_vec())
}
