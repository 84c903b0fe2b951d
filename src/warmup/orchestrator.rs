//! Warmup Orchestrator
//!
//! Runs full cache-priming cycles. A cycle launches three independent
//! sub-tasks concurrently (popular searches, categories, stats), waits for all
//! of them, and aggregates their counters.
//!
//! ## Guarantees
//! - **Single-flight**: at most one cycle per orchestrator. A call made while a
//!   cycle is running returns an all-zero summary immediately.
//! - **Isolation**: each sub-task runs on its own tokio task. An error or panic
//!   in one is counted and never cancels its siblings.

use super::types::{CacheMetrics, ClearSummary, TaskOutcome, WarmupState, WarmupSummary};
use crate::cache::keys::{
    CATEGORY_SEARCH_PREFIX, POPULAR_SNAPSHOT_KEY, SEARCH_PREFIX, selective_clear_patterns,
};
use crate::category::CategoryCatalog;
use crate::error::{SearchError, WarmupTaskError};
use crate::search::engine::PrecedenceSearchEngine;
use crate::search::types::SearchRequest;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};

/// Categories pre-searched during category warmup, and their page size.
const TOP_CATEGORIES: usize = 5;
const CATEGORY_PAGE_SIZE: u32 = 12;
/// Size of the popular-search snapshot cached by stats warmup.
const POPULAR_SNAPSHOT_SIZE: usize = 10;

/// Holds the Idle -> Warming transition; dropping it returns to Idle.
/// Owned by the spawned cycle task, never by the caller.
struct WarmingGuard(Arc<WarmupOrchestrator>);

impl WarmingGuard {
    fn acquire(orchestrator: &Arc<WarmupOrchestrator>) -> Option<Self> {
        orchestrator
            .warming
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(orchestrator.clone()))
    }
}

impl Drop for WarmingGuard {
    fn drop(&mut self) {
        self.0.warming.store(false, Ordering::Release);
    }
}

pub struct WarmupOrchestrator {
    engine: Arc<PrecedenceSearchEngine>,
    categories: Arc<dyn CategoryCatalog>,
    warming: AtomicBool,
    completed_cycles: AtomicU64,
    top_n: usize,
    batch_size: usize,
}

impl WarmupOrchestrator {
    pub fn new(
        engine: Arc<PrecedenceSearchEngine>,
        categories: Arc<dyn CategoryCatalog>,
    ) -> Arc<Self> {
        let top_n = engine.config().warmup_top_n;
        let batch_size = engine.config().warmup_batch_size.max(1);
        Arc::new(Self {
            engine,
            categories,
            warming: AtomicBool::new(false),
            completed_cycles: AtomicU64::new(0),
            top_n,
            batch_size,
        })
    }

    pub fn state(&self) -> WarmupState {
        if self.warming.load(Ordering::Acquire) {
            WarmupState::Warming
        } else {
            WarmupState::Idle
        }
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles.load(Ordering::Acquire)
    }

    pub async fn perform_full_warmup(self: &Arc<Self>) -> WarmupSummary {
        self.perform_warmup(self.top_n).await
    }

    /// Runs one cycle warming the `top_n` most popular searches.
    ///
    /// The cycle runs on its own task. Dropping the returned future does not
    /// stop it, and the orchestrator stays `Warming` until all three
    /// sub-tasks have settled.
    pub async fn perform_warmup(self: &Arc<Self>, top_n: usize) -> WarmupSummary {
        let Some(guard) = WarmingGuard::acquire(self) else {
            tracing::info!("Warmup already in progress, skipping");
            return WarmupSummary::default();
        };

        let cycle = tokio::spawn(async move {
            let summary = guard.0.run_cycle(top_n).await;
            drop(guard);
            summary
        });

        match cycle.await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Warmup cycle aborted: {}", e);
                WarmupSummary {
                    errors: 1,
                    ..WarmupSummary::default()
                }
            }
        }
    }

    async fn run_cycle(self: &Arc<Self>, top_n: usize) -> WarmupSummary {
        let started = Instant::now();
        tracing::info!("Starting full cache warmup (top {} searches)", top_n);

        let searches = {
            let this = self.clone();
            tokio::spawn(async move { this.warm_popular_searches(top_n).await })
        };
        let categories = {
            let this = self.clone();
            tokio::spawn(async move { this.warm_categories().await })
        };
        let stats = {
            let this = self.clone();
            tokio::spawn(async move { this.warm_stats().await })
        };
        let (searches, categories, stats) = tokio::join!(searches, categories, stats);

        let summary = WarmupSummary::from_outcomes(
            settle("searches", searches),
            settle("categories", categories),
            settle("stats", stats),
            started.elapsed().as_millis() as u64,
        );
        self.completed_cycles.fetch_add(1, Ordering::AcqRel);

        tracing::info!(
            "Warmup finished in {}ms: searches={} categories={} stats={} total={} errors={}",
            summary.duration,
            summary.searches,
            summary.categories,
            summary.stats,
            summary.total_warmed,
            summary.errors
        );
        summary
    }

    /// Re-runs page 1 of every popular query that has no live warmup copy,
    /// a few at a time.
    async fn warm_popular_searches(&self, top_n: usize) -> Result<TaskOutcome, WarmupTaskError> {
        let popular = self.engine.popular_searches(top_n).await;
        tracing::info!("Warming {} popular searches", popular.len());

        let mut outcome = TaskOutcome::default();
        for batch in popular.chunks(self.batch_size) {
            let mut in_flight = JoinSet::new();
            for entry in batch {
                let engine = self.engine.clone();
                let query = entry.query.clone();
                in_flight.spawn(async move {
                    let result = warm_query(&engine, &query).await;
                    (query, result)
                });
            }

            while let Some(joined) = in_flight.join_next().await {
                match joined {
                    Ok((query, Ok(searched))) => {
                        if searched {
                            tracing::debug!("Warmed '{}'", query);
                        } else {
                            tracing::debug!("'{}' already warm", query);
                        }
                        outcome.warmed += 1;
                    }
                    Ok((query, Err(e))) => {
                        tracing::warn!("Failed to warm '{}': {}", query, e);
                        outcome.errors += 1;
                    }
                    Err(e) => {
                        tracing::error!("Popular search warm task aborted: {}", e);
                        outcome.errors += 1;
                    }
                }
            }
        }
        Ok(outcome)
    }

    async fn warm_categories(&self) -> Result<TaskOutcome, WarmupTaskError> {
        let categories = self
            .categories
            .all_categories()
            .await
            .map_err(|e| WarmupTaskError::Category(e.to_string()))?;
        tracing::info!("{} categories cached", categories.len());

        self.categories
            .category_stats()
            .await
            .map_err(|e| WarmupTaskError::Category(e.to_string()))?;

        let mut searched = 0;
        let mut errors = 0;
        for category in categories.iter().take(TOP_CATEGORIES) {
            match self
                .categories
                .search_by_category(category, 1, CATEGORY_PAGE_SIZE)
                .await
            {
                Ok(_) => searched += 1,
                Err(e) => {
                    tracing::warn!("Failed to warm category '{}': {}", category, e);
                    errors += 1;
                }
            }
        }

        Ok(TaskOutcome {
            warmed: categories.len() as u64 + searched + 1,
            errors,
        })
    }

    async fn warm_stats(&self) -> Result<TaskOutcome, WarmupTaskError> {
        self.engine
            .search_stats()
            .await
            .map_err(|e| WarmupTaskError::Stats(e.to_string()))?;

        let popular = self.engine.popular_searches(POPULAR_SNAPSHOT_SIZE).await;
        self.engine
            .cache()
            .set_json(
                POPULAR_SNAPSHOT_KEY,
                self.engine.config().stats_ttl_secs,
                &popular,
            )
            .await;
        tracing::debug!("Cached top {} popular searches", popular.len());

        Ok(TaskOutcome {
            warmed: 2,
            errors: 0,
        })
    }

    /// Drops result, aggregation and category caches (keeping popularity), then rewarms.
    pub async fn clear_cache(self: &Arc<Self>) -> ClearSummary {
        let deleted_keys = self
            .engine
            .cache()
            .delete_matching(&selective_clear_patterns())
            .await;
        tracing::info!("Cleared {} cache keys, popularity kept", deleted_keys);

        let warmup = self.perform_full_warmup().await;
        ClearSummary {
            deleted_keys,
            warmup,
        }
    }

    pub async fn cache_metrics(&self) -> CacheMetrics {
        let cache = self.engine.cache();
        let search_pattern = format!("{}*", SEARCH_PREFIX);
        let category_pattern = format!("{}*", CATEGORY_SEARCH_PREFIX);

        let (search_keys, category_keys, popular_searches_count, memory_usage) = tokio::join!(
            cache.keys(&search_pattern),
            cache.keys(&category_pattern),
            cache.popularity_count(),
            cache.memory_usage(),
        );

        let search_keys = search_keys.len() as u64;
        let category_keys = category_keys.len() as u64;
        CacheMetrics {
            total_keys: search_keys + category_keys,
            search_keys,
            category_keys,
            popular_searches_count,
            memory_usage,
        }
    }
}

/// Returns whether a search actually ran (false: already warm).
async fn warm_query(engine: &PrecedenceSearchEngine, query: &str) -> Result<bool, SearchError> {
    if engine.cache().is_warmed(query).await {
        return Ok(false);
    }
    let request = SearchRequest::new(query)
        .limit(engine.config().default_page_size)
        .untracked();
    engine.search(request).await?;
    Ok(true)
}

fn settle(
    name: &'static str,
    joined: Result<Result<TaskOutcome, WarmupTaskError>, JoinError>,
) -> TaskOutcome {
    match joined {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::warn!("Warmup sub-task '{}' failed: {}", name, e);
            TaskOutcome::failed()
        }
        Err(e) => {
            tracing::error!("{}: {}", WarmupTaskError::Panicked(name), e);
            TaskOutcome::failed()
        }
    }
}
