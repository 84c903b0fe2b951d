use super::types::PopularSearch;
use crate::cache::gateway::CacheGateway;

use std::sync::Arc;
use tokio::task::JoinHandle;

/// Frequency-ranked record of past queries, kept in the cache's sorted set
/// and capped at `cap` members.
pub struct PopularityTracker {
    cache: CacheGateway,
    cap: u64,
}

impl PopularityTracker {
    pub fn new(cache: CacheGateway, cap: u64) -> Arc<Self> {
        Arc::new(Self { cache, cap })
    }

    /// Adds one hit for `query`, trimming the least popular entries when the
    /// set grows past the cap. Returns the set size, or `None` if the cache
    /// could not be updated.
    pub async fn track(&self, query: &str) -> Option<u64> {
        if query.trim().is_empty() {
            return None;
        }
        self.cache.increment_popularity(query, self.cap).await
    }

    /// Fire-and-forget variant used on the response path; nobody awaits the handle.
    pub fn track_detached(self: &Arc<Self>, query: String) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            if tracker.track(&query).await.is_none() {
                tracing::debug!("Popularity for '{}' was not recorded", query);
            }
        })
    }

    /// `limit` most popular queries, highest count first.
    pub async fn top_n(&self, limit: usize) -> Vec<PopularSearch> {
        self.cache
            .top_popular(limit)
            .await
            .into_iter()
            .map(|(query, score)| PopularSearch {
                query,
                count: score as u64,
            })
            .collect()
    }

    pub async fn score(&self, query: &str) -> Option<u64> {
        self.cache
            .popularity_score(query)
            .await
            .map(|score| score as u64)
    }

    pub async fn len(&self) -> u64 {
        self.cache.popularity_count().await
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }
}
