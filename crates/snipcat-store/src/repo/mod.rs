//! Repository layer persisting the catalog to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::SqliteStore;
