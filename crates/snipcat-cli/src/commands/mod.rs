pub mod category;
pub mod preview;
pub mod seed;
pub mod snippet;

use std::path::Path;

use snipcat_store::SqliteStore;

pub const DEFAULT_DB: &str = ".snipcat/catalog.db";

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open (and migrate) the catalog at `db`
pub fn open_store(db: &Path) -> Result<SqliteStore, Box<dyn std::error::Error>> {
    Ok(SqliteStore::open(db)?)
}
