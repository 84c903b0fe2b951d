//! Cache Wire Protocol
//!
//! Commands and replies exchanged with a `CacheBackend`. The command set is the
//! subset of a Redis-style server this service relies on: plain strings with
//! TTL, pattern enumeration, a score-ordered set for popularity, and memory
//! introspection. A batch of commands sent through `pipeline` costs a single
//! round trip.

/// A single cache command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get {
        key: String,
    },
    /// Set `key` to `value`, expiring after `ttl_secs`.
    SetEx {
        key: String,
        ttl_secs: u64,
        value: String,
    },
    /// Replies with the number of keys removed.
    Del {
        keys: Vec<String>,
    },
    Exists {
        key: String,
    },
    /// Glob-style enumeration (`search:*`).
    Keys {
        pattern: String,
    },
    /// Replies with the member's new score.
    ZIncrBy {
        key: String,
        increment: f64,
        member: String,
    },
    ZScore {
        key: String,
        member: String,
    },
    ZCard {
        key: String,
    },
    /// Highest score first; inclusive, negative indices count from the end.
    ZRevRangeWithScores {
        key: String,
        start: i64,
        stop: i64,
    },
    /// Removes by ascending rank (lowest score is rank 0).
    ZRemRangeByRank {
        key: String,
        start: i64,
        stop: i64,
    },
    /// Introspection report, e.g. the `memory` section.
    Info {
        section: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::SetEx { .. } => "SETEX",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Keys { .. } => "KEYS",
            Command::ZIncrBy { .. } => "ZINCRBY",
            Command::ZScore { .. } => "ZSCORE",
            Command::ZCard { .. } => "ZCARD",
            Command::ZRevRangeWithScores { .. } => "ZREVRANGE",
            Command::ZRemRangeByRank { .. } => "ZREMRANGEBYRANK",
            Command::Info { .. } => "INFO",
        }
    }
}

/// A reply to one [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Ok,
    Int(i64),
    Float(f64),
    Bulk(String),
    Array(Vec<String>),
    Scored(Vec<(String, f64)>),
}

impl Reply {
    pub fn into_bulk(self) -> Option<String> {
        match self {
            Reply::Bulk(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Reply::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Reply::Float(value) => Some(*value),
            Reply::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<String>> {
        match self {
            Reply::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_scored(self) -> Option<Vec<(String, f64)>> {
        match self {
            Reply::Scored(values) => Some(values),
            _ => None,
        }
    }
}
