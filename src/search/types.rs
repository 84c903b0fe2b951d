use crate::store::types::Product;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub limit: u32,
    pub use_cache: bool,
    /// Cache warming sets this to false so it does not inflate popularity.
    pub track_popularity: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            limit: crate::config::DEFAULT_PAGE_SIZE,
            use_cache: true,
            track_popularity: true,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn untracked(mut self) -> Self {
        self.track_popularity = false;
        self
    }
}

/// One page of ranked products. Built fresh for every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    /// Milliseconds spent serving the request.
    pub search_time: u64,
    pub from_cache: bool,
}

/// The cached fragment of a [`SearchResult`]; timing and cache provenance are
/// recomputed on every hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPage {
    pub products: Vec<Product>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl CachedPage {
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            products: result.products.clone(),
            total_count: result.total_count,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }

    pub fn into_result(self, search_time: u64) -> SearchResult {
        SearchResult {
            products: self.products,
            total_count: self.total_count,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            search_time,
            from_cache: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularSearch {
    pub query: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub total_products: u64,
    pub total_categories: u64,
    pub total_brands: u64,
}

pub fn total_pages(total_count: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit as u64)
}

/// JSON envelope used by every HTTP handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
