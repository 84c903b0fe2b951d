use super::DocumentStore;
use super::types::{Field, Filter, FindOptions, Product, now_ms};
use crate::error::StoreError;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory product store.
///
/// Products are kept in insertion order so that `find` without a sort is
/// deterministic (the "natural order" of the catalog). The sku index enforces
/// uniqueness.
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
    sku_index: DashMap<String, String>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
            sku_index: DashMap::new(),
        }
    }

    /// Inserts a product, assigning an id and timestamps when missing.
    pub async fn insert(&self, mut product: Product) -> Result<String, StoreError> {
        if product.id.is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
        if product.created_at == 0 {
            let now = now_ms();
            product.created_at = now;
            product.updated_at = now;
        }

        let id = product.id.clone();
        // Claim the sku before touching the product list; the shard lock is
        // released before the await below.
        match self.sku_index.entry(product.sku.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Query(format!("duplicate sku '{}'", product.sku)));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        self.products.write().await.push(product);
        Ok(id)
    }

    /// Inserts every product, skipping (and logging) duplicates.
    pub async fn insert_many(&self, products: Vec<Product>) -> usize {
        let mut inserted = 0;
        for product in products {
            match self.insert(product).await {
                Ok(_) => inserted += 1,
                Err(e) => tracing::warn!("Skipping product: {}", e),
            }
        }
        inserted
    }

    /// Seeds the store from a JSON array of products.
    pub async fn load_json(&self, path: &Path) -> Result<usize, StoreError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let products: Vec<Product> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Query(e.to_string()))?;
        let inserted = self.insert_many(products).await;
        tracing::info!("Loaded {} products from {}", inserted, path.display());
        Ok(inserted)
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryProductStore {
    async fn find(&self, filter: &Filter, options: FindOptions) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        let mut matched: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();

        if let Some(field) = options.sort_by {
            matched.sort_by_cached_key(|p| field.value(p).to_lowercase());
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(options.skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError> {
        let products = self.products.read().await;
        let mut values: Vec<String> = products
            .iter()
            .map(|p| field.value(p))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }

    async fn find_values(
        &self,
        filter: &Filter,
        field: Field,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| filter.matches(p))
            .take(limit)
            .map(|p| field.value(p).to_string())
            .collect())
    }

    async fn group_count(&self, field: Field) -> Result<Vec<(String, u64)>, StoreError> {
        let products = self.products.read().await;
        let mut groups: HashMap<&str, u64> = HashMap::new();
        for product in products.iter() {
            *groups.entry(field.value(product)).or_insert(0) += 1;
        }

        let mut counts: Vec<(String, u64)> = groups
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }
}
