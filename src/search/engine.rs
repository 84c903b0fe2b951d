use super::normalizer::{is_long_query, normalize_query};
use super::popularity::PopularityTracker;
use super::tiers::{Tier, long_query_filter};
use super::types::{CachedPage, PopularSearch, SearchRequest, SearchResult, total_pages};
use crate::cache::gateway::CacheGateway;
use crate::config::Config;
use crate::error::{SearchError, StoreError};
use crate::store::DocumentStore;
use crate::store::types::{Filter, FindOptions, Product};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Products for one page plus the (possibly approximate) total.
pub(crate) struct Matches {
    pub products: Vec<Product>,
    pub total_count: u64,
}

/// Tiered relevance search over the document store, with the cache in front.
pub struct PrecedenceSearchEngine {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) cache: CacheGateway,
    popularity: Arc<PopularityTracker>,
    pub(crate) config: Arc<Config>,
}

impl PrecedenceSearchEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: CacheGateway,
        popularity: Arc<PopularityTracker>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            store,
            cache,
            popularity,
            config,
        }
    }

    pub fn popularity(&self) -> &Arc<PopularityTracker> {
        &self.popularity
    }

    pub fn cache(&self) -> &CacheGateway {
        &self.cache
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a search, consulting the cache first.
    ///
    /// Only an unreachable document store fails the call; cache faults degrade
    /// to a miss. Popularity is recorded in the background after the result
    /// is ready.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let query = normalize_query(&request.query, self.config.max_query_length);
        let page = request.page.max(1);
        let limit = request.limit.clamp(1, self.config.max_page_size.max(1));
        let skip = (page as usize - 1) * limit as usize;

        if request.use_cache
            && let Some(cached) = self.cache.lookup_search::<CachedPage>(&query, page, limit).await
        {
            tracing::debug!("Cache hit for '{}' (page {}, limit {})", query, page, limit);
            if request.track_popularity {
                self.record_popularity(&query);
            }
            return Ok(cached.into_result(elapsed_ms(started)));
        }

        let matches = self
            .execute(&query, skip, limit as usize)
            .await
            .inspect_err(|e| tracing::error!("Search for '{}' failed: {}", query, e))?;

        let result = SearchResult {
            total_pages: total_pages(matches.total_count, limit),
            products: matches.products,
            total_count: matches.total_count,
            page,
            limit,
            search_time: elapsed_ms(started),
            from_cache: false,
        };

        if request.use_cache {
            if !result.products.is_empty() {
                self.cache
                    .store_search(&query, page, limit, &CachedPage::from_result(&result))
                    .await;
            }
            if request.track_popularity {
                self.record_popularity(&query);
            }
        }

        tracing::debug!(
            "Search '{}' -> {} of {} products in {}ms",
            query,
            result.products.len(),
            result.total_count,
            result.search_time
        );
        Ok(result)
    }

    pub async fn popular_searches(&self, limit: usize) -> Vec<PopularSearch> {
        self.popularity.top_n(limit).await
    }

    fn record_popularity(&self, query: &str) {
        if !query.is_empty() {
            self.popularity.track_detached(query.to_string());
        }
    }

    async fn execute(&self, query: &str, skip: usize, limit: usize) -> Result<Matches, StoreError> {
        if query.is_empty() {
            return self.scan(&Filter::All, skip, limit).await;
        }
        if is_long_query(query, self.config.long_query_threshold) {
            return self.scan(&long_query_filter(query), skip, limit).await;
        }
        self.precedence_search(query, skip, limit).await
    }

    /// One skip/limit query with an exact count.
    async fn scan(&self, filter: &Filter, skip: usize, limit: usize) -> Result<Matches, StoreError> {
        let (products, total_count) = tokio::try_join!(
            self.store.find(filter, FindOptions::page(skip, limit)),
            self.store.count(filter),
        )?;
        Ok(Matches {
            products,
            total_count,
        })
    }

    /// Walks the tiers in order, asking each only for what is still missing.
    ///
    /// Products already gathered by a stronger tier are dropped from weaker
    /// ones. The reported total is `max(new matches per tier, gathered)`,
    /// which never exceeds `skip + limit` and is not a catalog-wide count.
    async fn precedence_search(
        &self,
        query: &str,
        skip: usize,
        limit: usize,
    ) -> Result<Matches, StoreError> {
        let wanted = skip + limit;
        let mut gathered: Vec<Product> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut total_found = 0u64;

        for tier in Tier::PRECEDENCE {
            if gathered.len() >= wanted {
                break;
            }
            let remaining = wanted - gathered.len();
            let batch = self
                .store
                .find(&tier.filter(query), FindOptions::limit(remaining))
                .await?;

            let before = gathered.len();
            for product in batch {
                if seen.insert(product.id.clone()) {
                    gathered.push(product);
                }
            }
            let added = gathered.len() - before;
            total_found += added as u64;
            tracing::trace!("Tier {:?} added {} products for '{}'", tier, added, query);
        }

        let total_count = total_found.max(gathered.len() as u64);
        let products = gathered.into_iter().skip(skip).take(limit).collect();
        Ok(Matches {
            products,
            total_count,
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
