//! Cache key schema.

pub const SEARCH_PREFIX: &str = "search:";
pub const SUGGESTIONS_PREFIX: &str = "suggestions:";
pub const STATS_PREFIX: &str = "stats:";
pub const AGGREGATIONS_PREFIX: &str = "agg:";
pub const WARMUP_PREFIX: &str = "warmup:";
/// The single global popularity sorted set.
pub const POPULAR_KEY: &str = "popular_searches";

pub const CATEGORY_SEARCH_PREFIX: &str = "category_search:";
pub const CATEGORY_STATS_KEY: &str = "category_stats";
pub const ALL_CATEGORIES_KEY: &str = "all_categories";

pub const SEARCH_STATS_KEY: &str = "agg:search_stats";
pub const POPULAR_SNAPSHOT_KEY: &str = "stats:popular_searches";

pub fn search_key(query: &str, page: u32, limit: u32) -> String {
    format!("{}{}:{}:{}", SEARCH_PREFIX, query, page, limit)
}

pub fn warmup_key(query: &str) -> String {
    format!("{}{}", WARMUP_PREFIX, query)
}

pub fn suggestions_key(query: &str, limit: usize) -> String {
    format!("{}{}:{}", SUGGESTIONS_PREFIX, query, limit)
}

pub fn category_search_key(category: &str, page: u32, limit: u32) -> String {
    format!("{}{}:{}:{}:title:asc", CATEGORY_SEARCH_PREFIX, category, page, limit)
}

/// Patterns removed by a selective clear. The popularity set is deliberately absent.
pub fn selective_clear_patterns() -> [String; 5] {
    [
        format!("{}*", SEARCH_PREFIX),
        format!("{}*", AGGREGATIONS_PREFIX),
        format!("{}*", CATEGORY_SEARCH_PREFIX),
        CATEGORY_STATS_KEY.to_string(),
        ALL_CATEGORIES_KEY.to_string(),
    ]
}
