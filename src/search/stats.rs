use super::engine::PrecedenceSearchEngine;
use super::types::SearchStats;
use crate::cache::keys::SEARCH_STATS_KEY;
use crate::error::SearchError;
use crate::store::types::{Field, Filter};

impl PrecedenceSearchEngine {
    /// Catalog-wide aggregates, cached under the aggregation TTL.
    pub async fn search_stats(&self) -> Result<SearchStats, SearchError> {
        if let Some(cached) = self.cache.get_json::<SearchStats>(SEARCH_STATS_KEY).await {
            return Ok(cached);
        }

        let (total_products, categories, brands) = tokio::try_join!(
            self.store.count(&Filter::All),
            self.store.distinct(Field::Category),
            self.store.distinct(Field::Brand),
        )?;

        let stats = SearchStats {
            total_products,
            total_categories: categories.len() as u64,
            total_brands: brands.len() as u64,
        };
        self.cache
            .set_json(SEARCH_STATS_KEY, self.config.aggregations_ttl_secs, &stats)
            .await;
        Ok(stats)
    }
}
