//! SnipCat Core - snippet catalog domain and sandboxed live preview
//!
//! This crate provides:
//! - Category and snippet models, and the `SnippetCode` triple a preview renders
//! - The store contract (`SnippetStore`) with an in-memory implementation
//! - Catalog operations with validation and structured logging
//! - The editor draft that feeds a live preview as the author types
//! - The preview renderer: document synthesis, sandbox policy, execution
//!   contexts, and the coalescing render driver

pub mod editor;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod preview;
pub mod rules;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ExResult, Result, SnipcatError};
pub use model::{Category, NewCategory, NewSnippet, Snippet, SnippetCode};
pub use editor::SnippetDraft;
pub use ops::{CategoryListing, MemoryStore, SnippetStore};
pub use preview::{CodeSupplier, PreviewDocument, PreviewDriver, PreviewRenderer, SandboxPolicy};

#[doc(hidden)]
pub use snipcat_core_types as core_types;
