//! Store Module Tests
//!
//! Validates predicate semantics and the in-memory store used by the engine.
//!
//! ## Test Scopes
//! - **Filters**: case-insensitive exact / prefix / contains and `Any`.
//! - **MemoryProductStore**: natural order, skip/limit, sorting, uniqueness.
//! - **Aggregations**: distinct, count and group-by-count.

#[cfg(test)]
mod tests {
    use crate::store::DocumentStore;
    use crate::store::memory::MemoryProductStore;
    use crate::store::types::{Field, Filter, FindOptions};
    use crate::testing::product;

    async fn seeded_store() -> MemoryProductStore {
        let store = MemoryProductStore::new();
        store
            .insert_many(vec![
                product("Acme Drill", "Tools", "Acme", "SKU-1"),
                product("Cordless Drill", "Tools", "Bosch", "SKU-2"),
                product("Garden Hose", "Garden", "Acme", "SKU-3"),
                product("drill bits", "Accessories", "Makita", "SKU-4"),
            ])
            .await;
        store
    }

    // ============================================================
    // FILTER TESTS
    // ============================================================

    #[test]
    fn test_filter_exact_is_case_insensitive() {
        let p = product("Acme Drill", "Tools", "Acme", "SKU-1");

        assert!(Filter::exact(Field::Title, "acme drill").matches(&p));
        assert!(Filter::exact(Field::Title, "ACME DRILL").matches(&p));
        assert!(!Filter::exact(Field::Title, "acme").matches(&p));
    }

    #[test]
    fn test_filter_prefix_and_contains() {
        let p = product("Acme Drill", "Tools", "Acme", "SKU-1");

        assert!(Filter::prefix(Field::Title, "acme").matches(&p));
        assert!(!Filter::prefix(Field::Title, "drill").matches(&p));
        assert!(Filter::contains(Field::Title, "drill").matches(&p));
        assert!(Filter::contains(Field::Sku, "sku-").matches(&p));
    }

    #[test]
    fn test_filter_is_literal_not_regex() {
        let p = product("Widget (large)", "Tools", "Acme", "SKU-1");

        assert!(Filter::contains(Field::Title, "(large)").matches(&p));
        assert!(!Filter::contains(Field::Title, "w.dget").matches(&p));
    }

    #[test]
    fn test_filter_any() {
        let p = product("Hammer", "Tools", "Stanley", "SKU-9");
        let filter = Filter::Any(vec![
            Filter::contains(Field::Title, "drill"),
            Filter::contains(Field::Brand, "stan"),
        ]);

        assert!(filter.matches(&p));
        assert!(Filter::All.matches(&p));
    }

    // ============================================================
    // MEMORY STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_find_preserves_insertion_order() {
        let store = seeded_store().await;

        let drills = store
            .find(&Filter::contains(Field::Title, "drill"), FindOptions::default())
            .await
            .unwrap();

        let titles: Vec<&str> = drills.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Acme Drill", "Cordless Drill", "drill bits"]);
    }

    #[tokio::test]
    async fn test_find_skip_and_limit() {
        let store = seeded_store().await;

        let page = store.find(&Filter::All, FindOptions::page(1, 2)).await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].sku, "SKU-2");
        assert_eq!(page[1].sku, "SKU-3");
    }

    #[tokio::test]
    async fn test_find_sorted_by_title() {
        let store = seeded_store().await;

        let sorted = store
            .find(&Filter::All, FindOptions::default().sorted_by(Field::Title))
            .await
            .unwrap();

        assert_eq!(sorted[0].title, "Acme Drill");
        assert_eq!(sorted[1].title, "Cordless Drill");
        assert_eq!(sorted[2].title, "drill bits");
        assert_eq!(sorted[3].title, "Garden Hose");
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_rejects_duplicate_sku() {
        let store = MemoryProductStore::new();

        let id = store
            .insert(product("Acme Drill", "Tools", "Acme", "SKU-1"))
            .await
            .unwrap();
        assert!(!id.is_empty());

        let duplicate = store
            .insert(product("Other", "Tools", "Acme", "SKU-1"))
            .await;
        assert!(duplicate.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_inserts_of_same_sku_admit_one() {
        // ARRANGE
        let store = std::sync::Arc::new(MemoryProductStore::new());

        // ACT
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert(product(&format!("Drill {}", i), "Tools", "Acme", "SKU-RACE"))
                    .await
            }));
        }
        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }

        // ASSERT
        assert_eq!(admitted, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_count_distinct_and_group_count() {
        let store = seeded_store().await;

        assert_eq!(store.count(&Filter::All).await.unwrap(), 4);
        assert_eq!(
            store.count(&Filter::exact(Field::Brand, "acme")).await.unwrap(),
            2
        );

        let categories = store.distinct(Field::Category).await.unwrap();
        assert_eq!(categories, vec!["Accessories", "Garden", "Tools"]);

        let groups = store.group_count(Field::Category).await.unwrap();
        assert_eq!(groups[0], ("Tools".to_string(), 2));
        assert_eq!(groups.len(), 3);
    }

    #[tokio::test]
    async fn test_find_values_projects_field() {
        let store = seeded_store().await;

        let brands = store
            .find_values(&Filter::prefix(Field::Brand, "ac"), Field::Brand, 10)
            .await
            .unwrap();

        assert_eq!(brands, vec!["Acme", "Acme"]);
    }

    #[tokio::test]
    async fn test_load_json_seeds_store() {
        let dir = std::env::temp_dir().join(format!("catalog-seed-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        let products = vec![
            product("Acme Drill", "Tools", "Acme", "SKU-1"),
            product("Garden Hose", "Garden", "Acme", "SKU-2"),
        ];
        std::fs::write(&path, serde_json::to_string(&products).unwrap()).unwrap();

        let store = MemoryProductStore::new();
        let loaded = store.load_json(&path).await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(store.len().await, 2);
        std::fs::remove_dir_all(&dir).ok();
    }
}
