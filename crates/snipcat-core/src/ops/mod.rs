pub mod catalog;
pub mod memory;
pub mod store;

pub use catalog::CategoryListing;
pub use memory::MemoryStore;
pub use store::SnippetStore;
