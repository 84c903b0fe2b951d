use super::engine::PrecedenceSearchEngine;
use super::normalizer::normalize_query;
use crate::cache::keys::suggestions_key;
use crate::error::SearchError;
use crate::store::types::{Field, Filter};

use std::collections::HashSet;

impl PrecedenceSearchEngine {
    /// Prefix suggestions drawn from titles, then categories, then brands.
    pub async fn suggest(&self, raw: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let query = normalize_query(raw, self.config.max_query_length);
        if query.chars().count() < 2 || limit == 0 {
            return Ok(Vec::new());
        }

        let key = suggestions_key(&query, limit);
        if let Some(cached) = self.cache.get_json::<Vec<String>>(&key).await {
            return Ok(cached);
        }

        let suggestions = self.generate_suggestions(&query, limit).await?;
        self.cache
            .set_json(&key, self.config.suggestions_ttl_secs, &suggestions)
            .await;
        Ok(suggestions)
    }

    async fn generate_suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, SearchError> {
        // Earlier sources win; titles get twice the candidates.
        let sources = [
            (Field::Title, limit.saturating_mul(2)),
            (Field::Category, limit),
            (Field::Brand, limit),
        ];

        let mut suggestions: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (field, candidates) in sources {
            if suggestions.len() >= limit {
                break;
            }
            let values = self
                .store
                .find_values(&Filter::prefix(field, query), field, candidates)
                .await?;
            for value in values {
                if suggestions.len() >= limit {
                    break;
                }
                if !value.is_empty() && seen.insert(value.clone()) {
                    suggestions.push(value);
                }
            }
        }

        Ok(suggestions)
    }
}
