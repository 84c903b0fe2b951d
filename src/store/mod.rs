//! Document Store Module
//!
//! The read side of the product catalog. The search core only talks to the
//! [`DocumentStore`] trait; `MemoryProductStore` is the in-process
//! implementation used by the binary and the tests.
//!
//! ## Capabilities
//! - **Matching**: case-insensitive exact / prefix / substring predicates per field.
//! - **Projection**: single-field lookups for suggestions.
//! - **Aggregation**: `distinct`, `count` and group-by-count.

pub mod memory;
pub mod types;

#[cfg(test)]
mod tests;

use crate::error::StoreError;
use async_trait::async_trait;
use types::{Field, Filter, FindOptions, Product};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, filter: &Filter, options: FindOptions) -> Result<Vec<Product>, StoreError>;

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// Distinct non-empty values of `field`, sorted.
    async fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError>;

    /// Projects `field` out of the first `limit` matches of `filter`.
    async fn find_values(
        &self,
        filter: &Filter,
        field: Field,
        limit: usize,
    ) -> Result<Vec<String>, StoreError>;

    /// Document count per value of `field`, largest group first.
    async fn group_count(&self, field: Field) -> Result<Vec<(String, u64)>, StoreError>;
}
