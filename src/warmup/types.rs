use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarmupState {
    Idle,
    Warming,
}

/// Counters reported by one warmup sub-task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub warmed: u64,
    pub errors: u64,
}

impl TaskOutcome {
    pub fn failed() -> Self {
        Self {
            warmed: 0,
            errors: 1,
        }
    }
}

/// Result of one full warmup cycle. All zeros when the cycle was skipped
/// because another one was already running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupSummary {
    pub total_warmed: u64,
    pub searches: u64,
    pub categories: u64,
    pub stats: u64,
    pub errors: u64,
    /// Milliseconds.
    pub duration: u64,
}

impl WarmupSummary {
    pub fn from_outcomes(
        searches: TaskOutcome,
        categories: TaskOutcome,
        stats: TaskOutcome,
        duration: u64,
    ) -> Self {
        Self {
            total_warmed: searches.warmed + categories.warmed + stats.warmed,
            searches: searches.warmed,
            categories: categories.warmed,
            stats: stats.warmed,
            errors: searches.errors + categories.errors + stats.errors,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearSummary {
    pub deleted_keys: u64,
    pub warmup: WarmupSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    pub total_keys: u64,
    pub search_keys: u64,
    pub category_keys: u64,
    pub popular_searches_count: u64,
    pub memory_usage: String,
}
