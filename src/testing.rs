//! Shared fixtures for the unit tests: product builders, unreachable
//! collaborators and a fully wired engine over in-memory backends.

use crate::cache::CacheBackend;
use crate::cache::gateway::{CacheGateway, CacheTtls};
use crate::cache::memory::MemoryCache;
use crate::cache::protocol::{Command, Reply};
use crate::config::Config;
use crate::error::{CacheError, StoreError};
use crate::search::engine::PrecedenceSearchEngine;
use crate::search::popularity::PopularityTracker;
use crate::store::DocumentStore;
use crate::store::memory::MemoryProductStore;
use crate::store::types::{Field, Filter, FindOptions, Product};

use async_trait::async_trait;
use std::sync::Arc;

pub fn product(title: &str, category: &str, brand: &str, sku: &str) -> Product {
    Product {
        id: String::new(),
        title: title.to_string(),
        category: category.to_string(),
        brand: brand.to_string(),
        product_type: String::new(),
        sku: sku.to_string(),
        price: 0.0,
        description: String::new(),
        created_at: 0,
        updated_at: 0,
    }
}

pub async fn store_with(products: Vec<Product>) -> Arc<MemoryProductStore> {
    let store = Arc::new(MemoryProductStore::new());
    store.insert_many(products).await;
    store
}

pub fn gateway(backend: Arc<dyn CacheBackend>, config: &Config) -> CacheGateway {
    CacheGateway::new(
        backend,
        CacheTtls {
            search_secs: config.search_ttl_secs,
            warmup_secs: config.popular_ttl_secs,
        },
    )
}

pub fn engine_with_config(
    store: Arc<dyn DocumentStore>,
    backend: Arc<dyn CacheBackend>,
    config: Config,
) -> Arc<PrecedenceSearchEngine> {
    let config = Arc::new(config);
    let cache = gateway(backend, &config);
    let popularity = PopularityTracker::new(cache.clone(), config.popularity_cap);
    Arc::new(PrecedenceSearchEngine::new(store, cache, popularity, config))
}

pub fn engine_with(
    store: Arc<dyn DocumentStore>,
    backend: Arc<dyn CacheBackend>,
) -> Arc<PrecedenceSearchEngine> {
    engine_with_config(store, backend, Config::default())
}

/// Engine over the given products and a fresh in-memory cache.
pub async fn engine(products: Vec<Product>) -> (Arc<PrecedenceSearchEngine>, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let engine = engine_with(store_with(products).await, cache.clone());
    (engine, cache)
}

/// A cache server that is never reachable.
pub struct FailingCache;

#[async_trait]
impl CacheBackend for FailingCache {
    async fn execute(&self, _command: Command) -> Result<Reply, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn pipeline(
        &self,
        _commands: Vec<Command>,
    ) -> Result<Vec<Result<Reply, CacheError>>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// A document store that is never reachable.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find(&self, _filter: &Filter, _options: FindOptions) -> Result<Vec<Product>, StoreError> {
        Err(unreachable_store())
    }

    async fn count(&self, _filter: &Filter) -> Result<u64, StoreError> {
        Err(unreachable_store())
    }

    async fn distinct(&self, _field: Field) -> Result<Vec<String>, StoreError> {
        Err(unreachable_store())
    }

    async fn find_values(
        &self,
        _filter: &Filter,
        _field: Field,
        _limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        Err(unreachable_store())
    }

    async fn group_count(&self, _field: Field) -> Result<Vec<(String, u64)>, StoreError> {
        Err(unreachable_store())
    }
}

fn unreachable_store() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}
