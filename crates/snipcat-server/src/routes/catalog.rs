//! Catalog API handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use snipcat_core::model::{Category, NewCategory, NewSnippet, Snippet};
use snipcat_core::ops::catalog;
use snipcat_core::CategoryListing;
use snipcat_core_types::RequestId;

use super::{parse_snippet_id, tagged};
use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    search: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<Vec<Category>>> {
    let store = state.store().map_err(tagged(&request_id))?;
    let categories = catalog::list_categories(&*store).map_err(tagged(&request_id))?;
    Ok(Json(categories))
}

pub async fn category_by_slug(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> ApiResult<Json<CategoryListing>> {
    let store = state.store().map_err(tagged(&request_id))?;
    let listing = catalog::category_with_snippets(&*store, &slug).map_err(tagged(&request_id))?;
    Ok(Json(listing))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<NewCategory>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(new_category) = body.map_err(|e| rejected(e, &request_id))?;
    let mut store = state.store().map_err(tagged(&request_id))?;
    let category =
        catalog::create_category(&mut *store, new_category).map_err(tagged(&request_id))?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_snippets(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Snippet>>> {
    let store = state.store().map_err(tagged(&request_id))?;
    let snippets = catalog::list_or_search(&*store, params.search.as_deref())
        .map_err(tagged(&request_id))?;
    Ok(Json(snippets))
}

pub async fn view_snippet(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Snippet>> {
    let id = parse_snippet_id(&raw_id, &request_id)?;
    let mut store = state.store().map_err(tagged(&request_id))?;
    let snippet = catalog::view_snippet(&mut *store, id).map_err(tagged(&request_id))?;
    Ok(Json(snippet))
}

pub async fn create_snippet(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<NewSnippet>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Snippet>)> {
    let Json(new_snippet) = body.map_err(|e| rejected(e, &request_id))?;
    let mut store = state.store().map_err(tagged(&request_id))?;
    let snippet =
        catalog::create_snippet(&mut *store, new_snippet).map_err(tagged(&request_id))?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// Malformed or mistyped JSON bodies are input errors like any other
pub(super) fn rejected(rejection: JsonRejection, request_id: &RequestId) -> ApiError {
    ApiError(
        ApiError::bad_request(rejection.body_text())
            .0
            .with_request_id(request_id.clone()),
    )
}
