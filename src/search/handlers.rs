use super::engine::PrecedenceSearchEngine;
use super::types::{ApiResponse, PopularSearch, SearchRequest, SearchResult, SearchStats};
use crate::error::{QueryError, SearchError};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "useCache")]
    pub use_cache: Option<bool>,
}

#[derive(Deserialize)]
pub struct SuggestParams {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct PopularParams {
    pub limit: Option<usize>,
}

/// Pagination checks owned by the routing layer; the engine never sees these values.
pub fn validate_pagination(page: u32, limit: u32, max_limit: u32) -> Result<(), QueryError> {
    if page < 1 {
        return Err(QueryError::InvalidPage(page));
    }
    if limit < 1 || limit > max_limit {
        return Err(QueryError::InvalidLimit {
            got: limit,
            max: max_limit,
        });
    }
    Ok(())
}

fn error_status(err: &SearchError) -> StatusCode {
    match err {
        SearchError::Query(_) => StatusCode::BAD_REQUEST,
        SearchError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(engine): Extension<Arc<PrecedenceSearchEngine>>,
) -> (StatusCode, Json<ApiResponse<SearchResult>>) {
    let page = params.page.unwrap_or(1);
    let limit = params
        .limit
        .unwrap_or(engine.config().default_page_size);

    if let Err(e) = validate_pagination(page, limit, engine.config().max_page_size) {
        tracing::debug!("Rejected search request: {}", e);
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
    }

    let mut request = SearchRequest::new(params.q.unwrap_or_default())
        .page(page)
        .limit(limit);
    if params.use_cache == Some(false) {
        request = request.without_cache();
    }

    match engine.search(request).await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::ok(result))),
        Err(e) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

pub async fn handle_suggest(
    Query(params): Query<SuggestParams>,
    Extension(engine): Extension<Arc<PrecedenceSearchEngine>>,
) -> (StatusCode, Json<ApiResponse<Vec<String>>>) {
    let limit = params.limit.unwrap_or(10);
    match engine.suggest(&params.q, limit).await {
        Ok(suggestions) => (StatusCode::OK, Json(ApiResponse::ok(suggestions))),
        Err(e) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

pub async fn handle_popular(
    Query(params): Query<PopularParams>,
    Extension(engine): Extension<Arc<PrecedenceSearchEngine>>,
) -> Json<ApiResponse<Vec<PopularSearch>>> {
    let limit = params.limit.unwrap_or(10);
    Json(ApiResponse::ok(engine.popular_searches(limit).await))
}

pub async fn handle_stats(
    Extension(engine): Extension<Arc<PrecedenceSearchEngine>>,
) -> (StatusCode, Json<ApiResponse<SearchStats>>) {
    match engine.search_stats().await {
        Ok(stats) => (StatusCode::OK, Json(ApiResponse::ok(stats))),
        Err(e) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}
