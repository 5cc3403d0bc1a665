//! SnipCat Server - HTTP surface for the snippet catalog
//!
//! JSON catalog API plus the preview endpoints that serve synthesized,
//! sandboxed documents.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
