//! Category Module
//!
//! The category collaborator the warmup cycle delegates to. The orchestrator
//! only depends on [`CategoryCatalog`]; `CategoryService` is the cache-backed
//! implementation wired into the binary. Every call caches its result as a
//! side effect, which is what makes it useful for warming.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

use crate::error::StoreError;
use async_trait::async_trait;
use types::{CategoryCount, CategoryPage};

#[async_trait]
pub trait CategoryCatalog: Send + Sync {
    /// Sorted distinct categories.
    async fn all_categories(&self) -> Result<Vec<String>, StoreError>;

    /// Product count per category, largest first.
    async fn category_stats(&self) -> Result<Vec<CategoryCount>, StoreError>;

    async fn search_by_category(
        &self,
        category: &str,
        page: u32,
        limit: u32,
    ) -> Result<CategoryPage, StoreError>;
}
