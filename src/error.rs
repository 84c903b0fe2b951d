//! Error taxonomy shared by every subsystem.
//!
//! Only [`SearchError`] is ever surfaced to a caller of a live search. Cache
//! and warmup errors are absorbed where they happen: the gateway turns a
//! [`CacheError`] into a miss, and the orchestrator counts a
//! [`WarmupTaskError`] instead of failing the cycle.

use thiserror::Error;

/// Failure reported by a `DocumentStore`.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document store query failed: {0}")]
    Query(String),
}

/// Malformed pagination, rejected before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("page must be >= 1, got {0}")]
    InvalidPage(u32),
    #[error("limit must be between 1 and {max}, got {got}")]
    InvalidLimit { got: u32, max: u32 },
}

/// Error returned by search, suggestion and stats operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The store could not be reached while a search was running.
    #[error("search execution failed: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Any failure of the cache collaborator.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
    #[error("WRONGTYPE operation against key '{0}' holding the wrong kind of value")]
    WrongType(String),
    #[error("invalid key pattern '{0}'")]
    InvalidPattern(String),
}

/// Failure inside one warmup sub-task.
#[derive(Debug, Error)]
pub enum WarmupTaskError {
    #[error("category warmup failed: {0}")]
    Category(String),
    #[error("stats warmup failed: {0}")]
    Stats(String),
    #[error("warmup sub-task '{0}' panicked")]
    Panicked(&'static str),
}
