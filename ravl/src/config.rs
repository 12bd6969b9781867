//! Runtime settings for the validation loop.
//!
//! Fixed at process start and shared read-only by every turn. `from_env` reads the
//! variables below; missing ones fall back to defaults, unparsable ones are errors.
//!
//! | Variable             | Field              | Default                  |
//! |----------------------|--------------------|--------------------------|
//! | `RETRIEVER_K`        | `retriever_k`      | 5                        |
//! | `MAX_CHAT_HISTORY`   | `max_chat_history` | 6                        |
//! | `MAX_REVISION_COUNT` | `max_revisions`    | 2                        |
//! | `CALL_TIMEOUT_SECS`  | `call_timeout`     | 60                       |
//! | `OPENAI_MODEL`       | `chat_model`       | `gpt-4o-mini`            |
//! | `EMBEDDING_MODEL`    | `embedding_model`  | `text-embedding-3-small` |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?} as {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{key} must be at least {min}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
    },
}

/// Settings consumed by `RavlRunner` and the CLI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RavlConfig {
    /// Passages requested per retrieval.
    pub retriever_k: usize,
    /// History entries shown to the rewrite and draft stages.
    pub max_chat_history: usize,
    /// Revision cap; the critic runs at most `max_revisions + 1` times per turn.
    pub max_revisions: u32,
    /// Bound on each stage, including its external call.
    pub call_timeout: Duration,
    pub chat_model: String,
    pub embedding_model: String,
}

impl Default for RavlConfig {
    fn default() -> Self {
        Self {
            retriever_k: 5,
            max_chat_history: 6,
            max_revisions: 2,
            call_timeout: Duration::from_secs(60),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
            expected,
        }),
    }
}

impl RavlConfig {
    /// Builds config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let retriever_k = parse_var(&lookup, "RETRIEVER_K", "a positive integer", defaults.retriever_k)?;
        if retriever_k == 0 {
            return Err(ConfigError::OutOfRange {
                key: "RETRIEVER_K",
                value: 0,
                min: 1,
            });
        }
        let max_chat_history = parse_var(
            &lookup,
            "MAX_CHAT_HISTORY",
            "a non-negative integer",
            defaults.max_chat_history,
        )?;
        let max_revisions = parse_var(
            &lookup,
            "MAX_REVISION_COUNT",
            "a non-negative integer",
            defaults.max_revisions,
        )?;
        let timeout_secs = parse_var(
            &lookup,
            "CALL_TIMEOUT_SECS",
            "a positive integer (seconds)",
            defaults.call_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                key: "CALL_TIMEOUT_SECS",
                value: 0,
                min: 1,
            });
        }
        Ok(Self {
            retriever_k,
            max_chat_history,
            max_revisions,
            call_timeout: Duration::from_secs(timeout_secs),
            chat_model: lookup("OPENAI_MODEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.chat_model),
            embedding_model: lookup("EMBEDDING_MODEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.embedding_model),
        })
    }
}
