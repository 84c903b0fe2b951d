//! Runtime configuration.
//!
//! Every knob can be set from the command line or the environment; the
//! `Default` impl carries the same values so library users and tests do not
//! need to go through argument parsing.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_TTL_SECS: u64 = 300;
pub const DEFAULT_SUGGESTIONS_TTL_SECS: u64 = 600;
pub const DEFAULT_STATS_TTL_SECS: u64 = 3600;
pub const DEFAULT_POPULAR_TTL_SECS: u64 = 86_400;
pub const DEFAULT_AGGREGATIONS_TTL_SECS: u64 = 1800;
pub const DEFAULT_CATEGORY_LIST_TTL_SECS: u64 = 3600;
pub const DEFAULT_CATEGORY_SEARCH_TTL_SECS: u64 = 300;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_WARMUP_INTERVAL_MINUTES: u64 = 30;
pub const DEFAULT_WARMUP_BATCH_SIZE: usize = 5;
pub const DEFAULT_WARMUP_TOP_N: usize = 20;
pub const DEFAULT_POPULARITY_CAP: u64 = 1000;
pub const DEFAULT_LONG_QUERY_THRESHOLD: usize = 50;
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 100;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "catalog-search",
    about = "Ranked product catalog search with a warm cache layer"
)]
pub struct Config {
    /// HTTP listen address.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// JSON array of products loaded into the in-memory store at startup.
    #[arg(long, env = "CATALOG_PATH")]
    pub catalog: Option<PathBuf>,

    #[arg(long, env = "SEARCH_TTL_SECS", default_value_t = DEFAULT_SEARCH_TTL_SECS)]
    pub search_ttl_secs: u64,

    #[arg(long, env = "SUGGESTIONS_TTL_SECS", default_value_t = DEFAULT_SUGGESTIONS_TTL_SECS)]
    pub suggestions_ttl_secs: u64,

    #[arg(long, env = "STATS_TTL_SECS", default_value_t = DEFAULT_STATS_TTL_SECS)]
    pub stats_ttl_secs: u64,

    /// TTL of the page-1 `warmup:` copies.
    #[arg(long, env = "POPULAR_TTL_SECS", default_value_t = DEFAULT_POPULAR_TTL_SECS)]
    pub popular_ttl_secs: u64,

    #[arg(long, env = "AGGREGATIONS_TTL_SECS", default_value_t = DEFAULT_AGGREGATIONS_TTL_SECS)]
    pub aggregations_ttl_secs: u64,

    #[arg(long, env = "CATEGORY_LIST_TTL_SECS", default_value_t = DEFAULT_CATEGORY_LIST_TTL_SECS)]
    pub category_list_ttl_secs: u64,

    #[arg(long, env = "CATEGORY_SEARCH_TTL_SECS", default_value_t = DEFAULT_CATEGORY_SEARCH_TTL_SECS)]
    pub category_search_ttl_secs: u64,

    #[arg(long, env = "DEFAULT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub default_page_size: u32,

    #[arg(long, env = "MAX_PAGE_SIZE", default_value_t = MAX_PAGE_SIZE)]
    pub max_page_size: u32,

    #[arg(long, env = "WARMUP_INTERVAL_MINUTES", default_value_t = DEFAULT_WARMUP_INTERVAL_MINUTES)]
    pub warmup_interval_minutes: u64,

    #[arg(long, env = "WARMUP_BATCH_SIZE", default_value_t = DEFAULT_WARMUP_BATCH_SIZE)]
    pub warmup_batch_size: usize,

    #[arg(long, env = "WARMUP_TOP_N", default_value_t = DEFAULT_WARMUP_TOP_N)]
    pub warmup_top_n: usize,

    #[arg(long, env = "POPULARITY_CAP", default_value_t = DEFAULT_POPULARITY_CAP)]
    pub popularity_cap: u64,

    /// Queries longer than this (in chars) take the title/sku fallback path.
    #[arg(long, env = "LONG_QUERY_THRESHOLD", default_value_t = DEFAULT_LONG_QUERY_THRESHOLD)]
    pub long_query_threshold: usize,

    #[arg(long, env = "MAX_QUERY_LENGTH", default_value_t = DEFAULT_MAX_QUERY_LENGTH)]
    pub max_query_length: usize,

    /// Disable the periodic warmup loop.
    #[arg(long, env = "DISABLE_WARMUP", default_value_t = false)]
    pub disable_warmup: bool,
}

impl Config {
    pub fn warmup_interval(&self) -> Duration {
        Duration::from_secs(self.warmup_interval_minutes.max(1) * 60)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            catalog: None,
            search_ttl_secs: DEFAULT_SEARCH_TTL_SECS,
            suggestions_ttl_secs: DEFAULT_SUGGESTIONS_TTL_SECS,
            stats_ttl_secs: DEFAULT_STATS_TTL_SECS,
            popular_ttl_secs: DEFAULT_POPULAR_TTL_SECS,
            aggregations_ttl_secs: DEFAULT_AGGREGATIONS_TTL_SECS,
            category_list_ttl_secs: DEFAULT_CATEGORY_LIST_TTL_SECS,
            category_search_ttl_secs: DEFAULT_CATEGORY_SEARCH_TTL_SECS,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            warmup_interval_minutes: DEFAULT_WARMUP_INTERVAL_MINUTES,
            warmup_batch_size: DEFAULT_WARMUP_BATCH_SIZE,
            warmup_top_n: DEFAULT_WARMUP_TOP_N,
            popularity_cap: DEFAULT_POPULARITY_CAP,
            long_query_threshold: DEFAULT_LONG_QUERY_THRESHOLD,
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
            disable_warmup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_cli_defaults() {
        let parsed = Config::parse_from(["catalog-search", "--bind", "127.0.0.1:3000"]);
        let default = Config::default();

        assert_eq!(parsed.search_ttl_secs, default.search_ttl_secs);
        assert_eq!(parsed.max_page_size, 100);
        assert_eq!(parsed.default_page_size, 20);
        assert_eq!(parsed.popularity_cap, 1000);
        assert_eq!(parsed.warmup_batch_size, 5);
    }

    #[test]
    fn test_warmup_interval_in_minutes() {
        let config = Config {
            warmup_interval_minutes: 2,
            ..Config::default()
        };
        assert_eq!(config.warmup_interval(), Duration::from_secs(120));
    }
}
