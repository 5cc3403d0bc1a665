//! Preview endpoints
//!
//! Documents are served with the sandbox CSP so a directly opened preview
//! gets the same isolation as one embedded in a sandboxed frame.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use snipcat_core::model::SnippetCode;
use snipcat_core::ops::catalog;
use snipcat_core::preview::{synthesize, FrameContext, MountPoint, PreviewDocument};
use snipcat_core::{PreviewRenderer, SandboxPolicy};
use snipcat_core_types::RequestId;

use super::catalog::rejected;
use super::{parse_snippet_id, tagged};
use crate::error::ApiError;
use crate::state::AppState;

const HTML: &str = "text/html; charset=utf-8";
const NO_STORE: &str = "no-store";

/// Synthesized document for a stored snippet; does not count a view
pub async fn preview_snippet(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_snippet_id(&raw_id, &request_id)?;
    let code = snippet_code(&state, id, &request_id)?;
    Ok(document_response(synthesize(&code)))
}

/// Synthesized document for an unsaved draft triple
pub async fn preview_draft(
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<SnippetCode>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(code) = body.map_err(|e| rejected(e, &request_id))?;
    Ok(document_response(synthesize(&code)))
}

/// Host-side iframe markup carrying the snippet's document
pub async fn embed_snippet(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_snippet_id(&raw_id, &request_id)?;
    let code = snippet_code(&state, id, &request_id)?;

    let frame = FrameContext::mounted(MountPoint::new(format!("snippet-{}", id)));
    let mut renderer = PreviewRenderer::new(frame);
    renderer.render(code).map_err(tagged(&request_id))?;
    let markup = renderer
        .context()
        .markup()
        .unwrap_or_default()
        .to_string();

    Ok((
        [(header::CONTENT_TYPE, HTML), (header::CACHE_CONTROL, NO_STORE)],
        markup,
    )
        .into_response())
}

fn snippet_code(state: &AppState, id: i64, request_id: &RequestId) -> Result<SnippetCode, ApiError> {
    let store = state.store().map_err(tagged(request_id))?;
    let snippet = catalog::get_snippet(&*store, id).map_err(tagged(request_id))?;
    Ok(snippet.code())
}

fn document_response(document: PreviewDocument) -> Response {
    let csp = SandboxPolicy::preview().content_security_policy();
    (
        [
            (header::CONTENT_TYPE, HTML.to_string()),
            (header::CACHE_CONTROL, NO_STORE.to_string()),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            (header::CONTENT_SECURITY_POLICY, csp),
        ],
        document.into_source(),
    )
        .into_response()
}
