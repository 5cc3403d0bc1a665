//! Seed import system
//!
//! Provides:
//! - Catalog seed format (schema version 1)
//! - YAML parser with validation
//! - Digest canonicalization
//! - Importer that writes a seed in one transaction

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format::{SeedCategory, SeedCatalog, SeedSnippet, SEED_SCHEMA_VERSION};
pub use importer::{import_default_seed, import_seed, import_seed_file, ImportOutcome};
pub use parser::{default_seed, parse_seed_file, parse_seed_str, DEFAULT_SEED};
