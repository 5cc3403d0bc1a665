//! Sandboxed live preview
//!
//! A preview turns one [`SnippetCode`](crate::model::SnippetCode) triple into
//! a standalone document and loads it into an isolated execution context:
//!
//! - [`document`]: synthesis of the document source
//! - [`sandbox`]: the capability policy the context runs under
//! - [`context`]: the execution context seam and the embedded-frame host
//! - [`renderer`]: render/refresh with the pending flag
//! - [`supplier`]: the watch channel that carries the latest triple
//! - [`driver`]: the task that re-renders when the triple changes

pub mod context;
pub mod document;
pub mod driver;
pub mod renderer;
pub mod sandbox;
pub mod supplier;

pub use context::{ExecutionContext, FrameContext, MountPoint};
pub use document::{synthesize, PreviewDocument, BASELINE_CSS};
pub use driver::{PreviewDriver, PreviewHandle, DEFAULT_DEBOUNCE};
pub use renderer::{PreviewRenderer, DEFAULT_REFRESH_DELAY};
pub use sandbox::{Capability, SandboxPolicy};
pub use supplier::CodeSupplier;
