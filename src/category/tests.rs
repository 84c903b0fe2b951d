//! Category Module Tests
//!
//! Validates the cache-backed category collaborator used by warmup.

#[cfg(test)]
mod tests {
    use crate::cache::gateway::CacheGateway;
    use crate::cache::keys::{ALL_CATEGORIES_KEY, CATEGORY_STATS_KEY, category_search_key};
    use crate::cache::memory::MemoryCache;
    use crate::category::CategoryCatalog;
    use crate::category::service::CategoryService;
    use crate::category::types::CategoryCount;
    use crate::config::Config;
    use crate::error::StoreError;
    use crate::testing::{FailingStore, gateway, product, store_with};
    use std::sync::Arc;

    async fn service() -> (CategoryService, CacheGateway) {
        let config = Arc::new(Config::default());
        let store = store_with(vec![
            product("Table Saw", "Tools", "Bosch", "SKU-1"),
            product("Angle Grinder", "Tools", "Makita", "SKU-2"),
            product("Hose", "Garden", "Acme", "SKU-3"),
            product("Chainsaw", "Power Tools", "Stihl", "SKU-4"),
            product("Rake", "Garden", "Acme", "SKU-5"),
            product("Hammer", "Tools", "Acme", "SKU-6"),
        ])
        .await;
        let cache = gateway(Arc::new(MemoryCache::new()), &config);
        (CategoryService::new(store, cache.clone(), config), cache)
    }

    #[tokio::test]
    async fn test_all_categories_sorted_and_cached() {
        let (service, cache) = service().await;

        let categories = service.all_categories().await.unwrap();

        assert_eq!(categories, vec!["Garden", "Power Tools", "Tools"]);
        let cached: Option<Vec<String>> = cache.get_json(ALL_CATEGORIES_KEY).await;
        assert_eq!(cached, Some(categories));
    }

    #[tokio::test]
    async fn test_category_stats_largest_first() {
        let (service, cache) = service().await;

        let stats = service.category_stats().await.unwrap();

        assert_eq!(
            stats,
            vec![
                CategoryCount {
                    category: "Tools".to_string(),
                    count: 3
                },
                CategoryCount {
                    category: "Garden".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "Power Tools".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(
            cache.keys(CATEGORY_STATS_KEY).await,
            vec![CATEGORY_STATS_KEY.to_string()]
        );
    }

    #[tokio::test]
    async fn test_search_by_category_sorted_by_title() {
        let (service, _cache) = service().await;

        let page = service.search_by_category("tools", 1, 2).await.unwrap();

        let titles: Vec<&str> = page.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Angle Grinder", "Chainsaw"]);
        assert_eq!(page.pagination.total, 4);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_next);
        assert!(!page.pagination.has_prev);
        assert_eq!(page.categories.len(), 3);
        assert!(!page.from_cache);
    }

    #[tokio::test]
    async fn test_search_by_category_second_call_from_cache() {
        let (service, cache) = service().await;

        service.search_by_category("Garden", 1, 12).await.unwrap();
        let again = service.search_by_category("Garden", 1, 12).await.unwrap();

        assert!(again.from_cache);
        assert_eq!(again.products.len(), 2);
        assert_eq!(
            cache.keys("category_search:*").await,
            vec![category_search_key("Garden", 1, 12)]
        );
    }

    #[tokio::test]
    async fn test_search_by_category_all_lists_everything() {
        let (service, _cache) = service().await;

        let page = service.search_by_category("all", 1, 12).await.unwrap();

        assert_eq!(page.pagination.total, 6);
        assert_eq!(page.products[0].title, "Angle Grinder");
    }

    #[tokio::test]
    async fn test_empty_category_page_not_cached() {
        let (service, cache) = service().await;

        let page = service.search_by_category("Kitchen", 1, 12).await.unwrap();

        assert!(page.products.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(cache.keys("category_search:*").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_reported() {
        let config = Arc::new(Config::default());
        let cache = gateway(Arc::new(MemoryCache::new()), &config);
        let service = CategoryService::new(Arc::new(FailingStore), cache, config);

        assert!(matches!(
            service.all_categories().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(service.search_by_category("Tools", 1, 12).await.is_err());
    }
}
