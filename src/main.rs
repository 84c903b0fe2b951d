use axum::Json;
use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use catalog_search::cache::CacheBackend;
use catalog_search::cache::gateway::{CacheGateway, CacheTtls};
use catalog_search::cache::memory::MemoryCache;
use catalog_search::category::CategoryCatalog;
use catalog_search::category::service::CategoryService;
use catalog_search::config::Config;
use catalog_search::search::engine::PrecedenceSearchEngine;
use catalog_search::search::handlers::{
    handle_popular, handle_search, handle_stats, handle_suggest,
};
use catalog_search::search::popularity::PopularityTracker;
use catalog_search::store::DocumentStore;
use catalog_search::store::memory::MemoryProductStore;
use catalog_search::warmup::handlers::{
    handle_cache_metrics, handle_clear_cache, handle_warmup,
};
use catalog_search::warmup::orchestrator::WarmupOrchestrator;
use catalog_search::warmup::scheduler::WarmupScheduler;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Arc::new(Config::parse());
    tracing::info!("Starting catalog search on {}", config.bind);

    // 1. Document store:
    let products = Arc::new(MemoryProductStore::new());
    if let Some(path) = &config.catalog {
        products.load_json(path).await?;
    } else {
        tracing::warn!("No catalog given, starting with an empty store");
    }
    let store: Arc<dyn DocumentStore> = products;

    // 2. Cache layer:
    let backend: Arc<dyn CacheBackend> = Arc::new(MemoryCache::new());
    let cache = CacheGateway::new(
        backend,
        CacheTtls {
            search_secs: config.search_ttl_secs,
            warmup_secs: config.popular_ttl_secs,
        },
    );

    // 3. Search + warmup:
    let popularity = PopularityTracker::new(cache.clone(), config.popularity_cap);
    let engine = Arc::new(PrecedenceSearchEngine::new(
        store.clone(),
        cache.clone(),
        popularity,
        config.clone(),
    ));
    let categories: Arc<dyn CategoryCatalog> =
        Arc::new(CategoryService::new(store, cache, config.clone()));
    let orchestrator = WarmupOrchestrator::new(engine.clone(), categories);

    if config.disable_warmup {
        tracing::info!("Periodic warmup disabled");
    } else {
        WarmupScheduler::new(orchestrator.clone(), config.warmup_interval()).start();
    }

    // 4. HTTP Router:
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/search", get(handle_search))
        .route("/api/search/suggest", get(handle_suggest))
        .route("/api/search/popular", get(handle_popular))
        .route("/api/search/stats", get(handle_stats))
        .route("/api/cache/warmup", post(handle_warmup))
        .route("/api/cache/clear", post(handle_clear_cache))
        .route("/api/cache/metrics", get(handle_cache_metrics))
        .layer(Extension(engine))
        .layer(Extension(orchestrator));

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    warmup: String,
}

async fn handle_health(
    Extension(orchestrator): Extension<Arc<WarmupOrchestrator>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        warmup: format!("{:?}", orchestrator.state()),
    })
}
