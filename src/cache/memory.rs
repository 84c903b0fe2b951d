use super::CacheBackend;
use super::protocol::{Command, Reply};
use crate::error::CacheError;

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

enum Value {
    Str(String),
    SortedSet(HashMap<String, f64>),
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn approx_size(&self) -> usize {
        match &self.value {
            Value::Str(value) => value.len(),
            Value::SortedSet(set) => set.keys().map(|member| member.len() + 8).sum(),
        }
    }
}

/// In-process cache server speaking the [`Command`] protocol.
///
/// Keys expire passively: an expired entry is dropped the next time it is
/// touched or enumerated. Sorted sets follow Redis rank semantics (ascending
/// score, ties broken by member).
pub struct MemoryCache {
    data: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    pub fn key_count(&self) -> usize {
        let now = Instant::now();
        self.data.iter().filter(|e| !e.value().is_expired(now)).count()
    }

    fn purge_if_expired(&self, key: &str) {
        let now = Instant::now();
        self.data.remove_if(key, |_, entry| entry.is_expired(now));
    }

    fn apply(&self, command: Command) -> Result<Reply, CacheError> {
        match command {
            Command::Get { key } => {
                self.purge_if_expired(&key);
                match self.data.get(&key) {
                    Some(entry) => match &entry.value {
                        Value::Str(value) => Ok(Reply::Bulk(value.clone())),
                        Value::SortedSet(_) => Err(CacheError::WrongType(key.clone())),
                    },
                    None => Ok(Reply::Nil),
                }
            }
            Command::SetEx {
                key,
                ttl_secs,
                value,
            } => {
                let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
                self.data.insert(
                    key,
                    Entry {
                        value: Value::Str(value),
                        expires_at: Some(expires_at),
                    },
                );
                Ok(Reply::Ok)
            }
            Command::Del { keys } => {
                let now = Instant::now();
                let removed = keys
                    .iter()
                    .filter_map(|key| self.data.remove(key))
                    .filter(|(_, entry)| !entry.is_expired(now))
                    .count();
                Ok(Reply::Int(removed as i64))
            }
            Command::Exists { key } => {
                self.purge_if_expired(&key);
                Ok(Reply::Int(self.data.contains_key(&key) as i64))
            }
            Command::Keys { pattern } => {
                let matcher = glob::Pattern::new(&pattern)
                    .map_err(|_| CacheError::InvalidPattern(pattern.clone()))?;
                let now = Instant::now();
                let mut keys: Vec<String> = self
                    .data
                    .iter()
                    .filter(|entry| !entry.value().is_expired(now) && matcher.matches(entry.key()))
                    .map(|entry| entry.key().clone())
                    .collect();
                keys.sort();
                Ok(Reply::Array(keys))
            }
            Command::ZIncrBy {
                key,
                increment,
                member,
            } => {
                self.purge_if_expired(&key);
                let mut entry = self.data.entry(key.clone()).or_insert_with(|| Entry {
                    value: Value::SortedSet(HashMap::new()),
                    expires_at: None,
                });
                match &mut entry.value {
                    Value::SortedSet(set) => {
                        let score = set.entry(member).or_insert(0.0);
                        *score += increment;
                        Ok(Reply::Float(*score))
                    }
                    Value::Str(_) => Err(CacheError::WrongType(key)),
                }
            }
            Command::ZScore { key, member } => self.with_set(&key, |set| {
                set.get(&member).map_or(Reply::Nil, |score| Reply::Float(*score))
            }),
            Command::ZCard { key } => {
                self.with_set(&key, |set| Reply::Int(set.len() as i64))
            }
            Command::ZRevRangeWithScores { key, start, stop } => self.with_set(&key, |set| {
                let mut ranked = ascending(set);
                ranked.reverse();
                match resolve_range(ranked.len(), start, stop) {
                    Some((from, to)) => Reply::Scored(ranked[from..=to].to_vec()),
                    None => Reply::Scored(Vec::new()),
                }
            }),
            Command::ZRemRangeByRank { key, start, stop } => {
                self.purge_if_expired(&key);
                let removed = match self.data.get_mut(&key) {
                    Some(mut entry) => match &mut entry.value {
                        Value::SortedSet(set) => {
                            let ranked = ascending(set);
                            match resolve_range(ranked.len(), start, stop) {
                                Some((from, to)) => {
                                    for (member, _) in &ranked[from..=to] {
                                        set.remove(member);
                                    }
                                    to - from + 1
                                }
                                None => 0,
                            }
                        }
                        Value::Str(_) => return Err(CacheError::WrongType(key)),
                    },
                    None => 0,
                };
                self.data.remove_if(&key, |_, entry| {
                    matches!(&entry.value, Value::SortedSet(set) if set.is_empty())
                });
                Ok(Reply::Int(removed as i64))
            }
            Command::Info { section } => Ok(Reply::Bulk(self.info(&section))),
        }
    }

    fn with_set<F>(&self, key: &str, read: F) -> Result<Reply, CacheError>
    where
        F: FnOnce(&HashMap<String, f64>) -> Reply,
    {
        self.purge_if_expired(key);
        match self.data.get(key) {
            Some(entry) => match &entry.value {
                Value::SortedSet(set) => Ok(read(set)),
                Value::Str(_) => Err(CacheError::WrongType(key.to_string())),
            },
            None => Ok(read(&HashMap::new())),
        }
    }

    fn info(&self, section: &str) -> String {
        let now = Instant::now();
        let used: usize = self
            .data
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .map(|entry| entry.key().len() + entry.value().approx_size())
            .sum();

        match section {
            "memory" => format!(
                "# Memory\r\nused_memory:{}\r\nused_memory_human:{}\r\n",
                used,
                human_bytes(used)
            ),
            _ => format!("# Keyspace\r\nkeys:{}\r\n", self.key_count()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn execute(&self, command: Command) -> Result<Reply, CacheError> {
        self.apply(command)
    }

    async fn pipeline(
        &self,
        commands: Vec<Command>,
    ) -> Result<Vec<Result<Reply, CacheError>>, CacheError> {
        Ok(commands.into_iter().map(|command| self.apply(command)).collect())
    }
}

fn ascending(set: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = set.iter().map(|(m, s)| (m.clone(), *s)).collect();
    ranked.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}

/// Resolves an inclusive, possibly negative, rank range against `len`.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

fn human_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.2}{}", value, unit)
}
