//! Search Service Module
//!
//! Ranked full-text search over the product catalog without an inverted index.
//!
//! ## Overview
//! A request is normalized, looked up in the cache, and on a miss evaluated
//! against the document store through a fixed list of precedence tiers
//! (exact title first, any-field substring last). Results are written back to
//! the cache and the query's popularity is bumped in the background.
//!
//! ## Submodules
//! - **`normalizer`**: trimming, lowercasing and length clamping of raw queries.
//! - **`tiers`**: the twelve precedence predicates and the long-query fallback.
//! - **`engine`**: `PrecedenceSearchEngine`, the cache-aware search pipeline.
//! - **`suggest`**: prefix suggestions over titles, categories and brands.
//! - **`stats`**: cached catalog aggregates.
//! - **`popularity`**: the capped, score-ordered record of past queries.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`types`**: request/response types.

pub mod engine;
pub mod handlers;
pub mod normalizer;
pub mod popularity;
pub mod stats;
pub mod suggest;
pub mod tiers;
pub mod types;
