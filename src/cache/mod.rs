//! Cache Module
//!
//! The warm layer in front of the document store.
//!
//! ## Core Concepts
//! - **Backend**: anything implementing [`CacheBackend`]; `MemoryCache` is the in-process server.
//! - **Pipelining**: multi-command reads and writes go out as one batch (one round trip).
//! - **Fail-open**: `CacheGateway` absorbs every [`CacheError`], logs it, and reports a miss/no-op.
//! - **Key schema**: see [`keys`]; result pages, page-1 warmup copies, aggregations and
//!   the global popularity sorted set live in disjoint namespaces.

pub mod gateway;
pub mod keys;
pub mod memory;
pub mod protocol;


use crate::error::CacheError;
use async_trait::async_trait;
use protocol::{Command, Reply};

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn execute(&self, command: Command) -> Result<Reply, CacheError>;

    /// Runs every command in one round trip. The outer error means the batch
    /// never reached the server; inner errors are per command.
    async fn pipeline(
        &self,
        commands: Vec<Command>,
    ) -> Result<Vec<Result<Reply, CacheError>>, CacheError>;
}
