use super::CategoryCatalog;
use super::types::{CategoryCount, CategoryPage, Pagination};
use crate::cache::gateway::CacheGateway;
use crate::cache::keys::{ALL_CATEGORIES_KEY, CATEGORY_STATS_KEY, category_search_key};
use crate::config::Config;
use crate::error::StoreError;
use crate::search::types::total_pages;
use crate::store::DocumentStore;
use crate::store::types::{Field, Filter, FindOptions};

use async_trait::async_trait;
use std::sync::Arc;

/// Cache-backed category listing, statistics and browsing.
pub struct CategoryService {
    store: Arc<dyn DocumentStore>,
    cache: CacheGateway,
    config: Arc<Config>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn DocumentStore>, cache: CacheGateway, config: Arc<Config>) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }
}

#[async_trait]
impl CategoryCatalog for CategoryService {
    async fn all_categories(&self) -> Result<Vec<String>, StoreError> {
        if let Some(cached) = self.cache.get_json::<Vec<String>>(ALL_CATEGORIES_KEY).await {
            return Ok(cached);
        }

        let categories = self.store.distinct(Field::Category).await?;
        self.cache
            .set_json(ALL_CATEGORIES_KEY, self.config.category_list_ttl_secs, &categories)
            .await;
        Ok(categories)
    }

    async fn category_stats(&self) -> Result<Vec<CategoryCount>, StoreError> {
        if let Some(cached) = self
            .cache
            .get_json::<Vec<CategoryCount>>(CATEGORY_STATS_KEY)
            .await
        {
            return Ok(cached);
        }

        let stats: Vec<CategoryCount> = self
            .store
            .group_count(Field::Category)
            .await?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        self.cache
            .set_json(CATEGORY_STATS_KEY, self.config.aggregations_ttl_secs, &stats)
            .await;
        Ok(stats)
    }

    async fn search_by_category(
        &self,
        category: &str,
        page: u32,
        limit: u32,
    ) -> Result<CategoryPage, StoreError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let key = category_search_key(category, page, limit);

        if let Some(mut cached) = self.cache.get_json::<CategoryPage>(&key).await {
            cached.from_cache = true;
            return Ok(cached);
        }

        let filter = if category.is_empty() || category.eq_ignore_ascii_case("all") {
            Filter::All
        } else {
            Filter::contains(Field::Category, category)
        };
        let skip = (page as usize - 1) * limit as usize;
        let options = FindOptions::page(skip, limit as usize).sorted_by(Field::Title);

        let (products, total, categories) = tokio::try_join!(
            self.store.find(&filter, options),
            self.store.count(&filter),
            self.all_categories(),
        )?;

        let pages = total_pages(total, limit);
        let result = CategoryPage {
            products,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: pages,
                has_next: (page as u64) < pages,
                has_prev: page > 1,
            },
            categories,
            from_cache: false,
        };

        if !result.products.is_empty() {
            self.cache
                .set_json(&key, self.config.category_search_ttl_secs, &result)
                .await;
        }
        Ok(result)
    }
}
