//! Product Catalog Search Library
//!
//! Ranked full-text search over a product catalog with a warm cache layer.
//! This crate holds the core; the binary (`main.rs`) wires it to HTTP.
//!
//! ## Architecture Modules
//! - **`store`**: The document store seam (`DocumentStore`) and its in-memory
//!   implementation. Case-insensitive field matching, counts and aggregations.
//! - **`cache`**: The cache seam (`CacheBackend`), a Redis-style in-memory server,
//!   and `CacheGateway`, the fail-open, pipelined client with the key schema.
//! - **`search`**: Query normalization, the twelve precedence tiers, the
//!   `PrecedenceSearchEngine`, suggestions, stats and popularity tracking.
//! - **`category`**: The category collaborator used by cache warming.
//! - **`warmup`**: The single-flight `WarmupOrchestrator`, its periodic
//!   scheduler, selective cache clearing and cache metrics.
//! - **`config`** / **`error`**: Runtime knobs and the error taxonomy.

pub mod cache;
pub mod category;
pub mod config;
pub mod error;
pub mod search;
pub mod store;
pub mod warmup;

#[cfg(test)]
pub(crate) mod testing;
