//! Router assembly

mod catalog;
mod preview;

use axum::routing::get;
use axum::{middleware, Router};
use snipcat_core_types::RequestId;

use crate::error::ApiError;
use crate::middleware::request_context;
use crate::state::AppState;

/// Build the application router with request correlation applied
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/api/categories/:slug", get(catalog::category_by_slug))
        .route(
            "/api/snippets",
            get(catalog::list_snippets).post(catalog::create_snippet),
        )
        .route("/api/snippets/:id", get(catalog::view_snippet))
        .route("/api/preview", axum::routing::post(preview::preview_draft))
        .route("/preview/:id", get(preview::preview_snippet))
        .route("/embed/:id", get(preview::embed_snippet))
        .with_state(state)
        .layer(middleware::from_fn(request_context))
}

/// Parse a numeric snippet id from a path segment
fn parse_snippet_id(raw: &str, request_id: &RequestId) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        ApiError(
            ApiError::bad_request("Invalid snippet ID")
                .0
                .with_entity_id(raw)
                .with_request_id(request_id.clone()),
        )
    })
}

/// Attach the request id to an operation error
fn tagged(request_id: &RequestId) -> impl Fn(snipcat_core::ExError) -> ApiError + '_ {
    move |err| ApiError(err.with_request_id(request_id.clone()))
}
