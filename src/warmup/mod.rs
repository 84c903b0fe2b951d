//! Cache Warmup Module
//!
//! Keeps the cache hot by periodically replaying what users search for most.
//!
//! ## Lifecycle
//! 1. **Schedule**: `WarmupScheduler` fires a cycle at startup and then on a fixed period.
//! 2. **Guard**: `WarmupOrchestrator` lets exactly one cycle run; extra triggers are no-ops.
//! 3. **Warm**: popular searches, categories and stats are primed concurrently.
//! 4. **Report**: counters from the three sub-tasks are folded into a `WarmupSummary`.
//!
//! The orchestrator also owns the selective cache clear (which rewarms
//! immediately) and the cache metrics snapshot.
//!
//! ## Submodules
//! - **`orchestrator`**: single-flight cycles, sub-tasks, clear and metrics.
//! - **`scheduler`**: the fixed-interval background loop.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`types`**: summaries and metrics.

pub mod handlers;
pub mod orchestrator;
pub mod scheduler;
pub mod types;
