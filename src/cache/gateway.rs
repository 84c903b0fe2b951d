//! Fail-open access to the cache backend.
//!
//! Every public method returns a plain value: a cache fault is logged and
//! surfaces as a miss (`None`, `false`, empty) or a no-op. Nothing in here can
//! fail a search or a warmup.

use super::CacheBackend;
use super::keys::{self, POPULAR_KEY};
use super::protocol::{Command, Reply};
use crate::error::CacheError;

use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, LazyLock};

static USED_MEMORY_HUMAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"used_memory_human:([^\r\n]+)").expect("valid regex"));

/// TTLs the gateway applies to writes it issues on its own.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub search_secs: u64,
    pub warmup_secs: u64,
}

#[derive(Clone)]
pub struct CacheGateway {
    backend: Arc<dyn CacheBackend>,
    ttls: CacheTtls,
}

impl CacheGateway {
    pub fn new(backend: Arc<dyn CacheBackend>, ttls: CacheTtls) -> Self {
        Self { backend, ttls }
    }

    async fn run(&self, command: Command) -> Option<Reply> {
        let name = command.name();
        match self.backend.execute(command).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::warn!("Cache {} failed, continuing without cache: {}", name, e);
                None
            }
        }
    }

    async fn run_pipeline(&self, commands: Vec<Command>) -> Option<Vec<Result<Reply, CacheError>>> {
        let size = commands.len();
        match self.backend.pipeline(commands).await {
            Ok(replies) => Some(replies),
            Err(e) => {
                tracing::warn!("Cache pipeline of {} commands failed: {}", size, e);
                None
            }
        }
    }

    fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding undecodable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    // --- Search results ---

    /// Pipelined lookup of a result page together with the query's popularity score.
    pub async fn lookup_search<T: DeserializeOwned>(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Option<T> {
        let key = keys::search_key(query, page, limit);
        let replies = self
            .run_pipeline(vec![
                Command::Get { key: key.clone() },
                Command::ZScore {
                    key: POPULAR_KEY.to_string(),
                    member: query.to_string(),
                },
            ])
            .await?;

        let mut replies = replies.into_iter();
        let cached = match replies.next() {
            Some(Ok(reply)) => reply.into_bulk(),
            Some(Err(e)) => {
                tracing::warn!("Cache GET {} failed: {}", key, e);
                None
            }
            None => None,
        };
        if let Some(Ok(score)) = replies.next() {
            tracing::debug!("Popularity of '{}': {:?}", query, score.as_float());
        }

        cached.and_then(|raw| Self::decode(&key, &raw))
    }

    /// Writes a result page; page 1 also gets a long-lived `warmup:` copy in the same batch.
    pub async fn store_search<T: Serialize>(&self, query: &str, page: u32, limit: u32, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Not caching '{}': {}", query, e);
                return;
            }
        };

        let mut commands = vec![Command::SetEx {
            key: keys::search_key(query, page, limit),
            ttl_secs: self.ttls.search_secs,
            value: payload.clone(),
        }];
        if page == 1 {
            commands.push(Command::SetEx {
                key: keys::warmup_key(query),
                ttl_secs: self.ttls.warmup_secs,
                value: payload,
            });
        }

        if let Some(replies) = self.run_pipeline(commands).await {
            for reply in replies {
                if let Err(e) = reply {
                    tracing::warn!("Cache write for '{}' failed: {}", query, e);
                }
            }
        }
    }

    /// Whether the page-1 warmup copy of `query` is live.
    pub async fn is_warmed(&self, query: &str) -> bool {
        self.run(Command::Exists {
            key: keys::warmup_key(query),
        })
        .await
        .and_then(|reply| reply.as_int())
        .is_some_and(|n| n > 0)
    }

    // --- Generic JSON values ---

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self
            .run(Command::Get {
                key: key.to_string(),
            })
            .await?
            .into_bulk()?;
        Self::decode(key, &raw)
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, ttl_secs: u64, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => {
                self.run(Command::SetEx {
                    key: key.to_string(),
                    ttl_secs,
                    value: payload,
                })
                .await;
            }
            Err(e) => tracing::warn!("Not caching '{}': {}", key, e),
        }
    }

    // --- Popularity sorted set ---

    /// Increments `member` by one and trims the set back to its `cap`
    /// highest-scored members, in one pipelined batch. The trim is relative
    /// to the set's size when it runs, so concurrent callers never cut below
    /// `cap`. Returns the cardinality after trimming.
    pub async fn increment_popularity(&self, member: &str, cap: u64) -> Option<u64> {
        let mut commands = vec![Command::ZIncrBy {
            key: POPULAR_KEY.to_string(),
            increment: 1.0,
            member: member.to_string(),
        }];
        // A cap beyond i64 can never be exceeded.
        if let Ok(cap) = i64::try_from(cap) {
            commands.push(Command::ZRemRangeByRank {
                key: POPULAR_KEY.to_string(),
                start: 0,
                stop: -cap - 1,
            });
        }
        commands.push(Command::ZCard {
            key: POPULAR_KEY.to_string(),
        });

        let mut replies = self.run_pipeline(commands).await?;
        let count = match replies.pop() {
            Some(Ok(reply)) => reply.as_int()? as u64,
            _ => return None,
        };

        let mut replies = replies.into_iter();
        if let Some(Err(e)) = replies.next() {
            tracing::warn!("Cache ZINCRBY for '{}' failed: {}", member, e);
            return None;
        }
        match replies.next() {
            Some(Ok(reply)) => {
                let removed = reply.as_int().unwrap_or(0);
                if removed > 0 {
                    tracing::debug!("Trimmed {} least popular searches", removed);
                }
            }
            Some(Err(e)) => tracing::warn!("Cache ZREMRANGEBYRANK failed: {}", e),
            None => {}
        }
        Some(count)
    }

    pub async fn popularity_score(&self, member: &str) -> Option<f64> {
        self.run(Command::ZScore {
            key: POPULAR_KEY.to_string(),
            member: member.to_string(),
        })
        .await?
        .as_float()
    }

    pub async fn popularity_count(&self) -> u64 {
        self.run(Command::ZCard {
            key: POPULAR_KEY.to_string(),
        })
        .await
        .and_then(|reply| reply.as_int())
        .unwrap_or(0) as u64
    }

    /// Highest-scored members first.
    pub async fn top_popular(&self, limit: usize) -> Vec<(String, f64)> {
        if limit == 0 {
            return Vec::new();
        }
        // Anything past i64::MAX means "the whole set".
        let stop = i64::try_from(limit).map_or(-1, |limit| limit - 1);
        self.run(Command::ZRevRangeWithScores {
            key: POPULAR_KEY.to_string(),
            start: 0,
            stop,
        })
        .await
        .and_then(Reply::into_scored)
        .unwrap_or_default()
    }

    // --- Keyspace management ---

    pub async fn keys(&self, pattern: &str) -> Vec<String> {
        self.run(Command::Keys {
            pattern: pattern.to_string(),
        })
        .await
        .and_then(Reply::into_array)
        .unwrap_or_default()
    }

    /// Deletes every key matching any of `patterns` in one pipelined batch.
    pub async fn delete_matching(&self, patterns: &[String]) -> u64 {
        let mut commands = Vec::new();
        for pattern in patterns {
            let matched = self.keys(pattern).await;
            if !matched.is_empty() {
                commands.push(Command::Del { keys: matched });
            }
        }
        if commands.is_empty() {
            return 0;
        }

        self.run_pipeline(commands)
            .await
            .map(|replies| {
                replies
                    .into_iter()
                    .filter_map(|reply| reply.ok().and_then(|r| r.as_int()))
                    .sum::<i64>() as u64
            })
            .unwrap_or(0)
    }

    /// Human-readable memory usage from the backend's introspection report.
    pub async fn memory_usage(&self) -> String {
        self.run(Command::Info {
            section: "memory".to_string(),
        })
        .await
        .and_then(Reply::into_bulk)
        .and_then(|report| {
            USED_MEMORY_HUMAN
                .captures(&report)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .unwrap_or_else(|| "N/A".to_string())
    }
}
