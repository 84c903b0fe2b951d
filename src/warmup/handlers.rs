use super::orchestrator::WarmupOrchestrator;
use super::types::{CacheMetrics, ClearSummary, WarmupSummary};
use crate::search::types::ApiResponse;
use axum::extract::Query;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WarmupParams {
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

pub async fn handle_warmup(
    Query(params): Query<WarmupParams>,
    Extension(orchestrator): Extension<Arc<WarmupOrchestrator>>,
) -> Json<ApiResponse<WarmupSummary>> {
    let summary = match params.top_n {
        Some(top_n) => orchestrator.perform_warmup(top_n).await,
        None => orchestrator.perform_full_warmup().await,
    };
    Json(ApiResponse::ok(summary))
}

pub async fn handle_clear_cache(
    Extension(orchestrator): Extension<Arc<WarmupOrchestrator>>,
) -> Json<ApiResponse<ClearSummary>> {
    Json(ApiResponse::ok(orchestrator.clear_cache().await))
}

pub async fn handle_cache_metrics(
    Extension(orchestrator): Extension<Arc<WarmupOrchestrator>>,
) -> Json<ApiResponse<CacheMetrics>> {
    Json(ApiResponse::ok(orchestrator.cache_metrics().await))
}
