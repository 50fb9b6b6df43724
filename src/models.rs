//! Core data types that flow through the sync pipeline.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One comment inside a mirrored issue thread, as fetched from the remote API.
///
/// Comments are immutable once fetched and arrive newest-first. Missing wire
/// fields are substituted with placeholders during deserialization rather
/// than failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub body: String,
    /// ISO-8601 creation timestamp as served by the API, kept verbatim.
    pub created_at: String,
    pub url: String,
}

/// Wire shape of one element of the issue-comments response.
#[derive(Debug, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub login: Option<String>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            author: raw
                .user
                .and_then(|u| u.login)
                .unwrap_or_else(|| "unknown".to_string()),
            body: raw.body.unwrap_or_default(),
            created_at: raw.created_at.unwrap_or_default(),
            url: raw.html_url.unwrap_or_default(),
        }
    }
}

/// Persisted sync bookkeeping: issue number → last successful sync time.
pub type SyncState = BTreeMap<u64, DateTime<Utc>>;

/// How one issue thread resolved within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadOutcome {
    /// A document was rendered and written for this thread.
    Written { comments: usize },
    /// The thread yielded zero comments (empty or failed fetch); no write.
    Skipped,
    /// The write stage failed. Later threads are unaffected.
    Failed(String),
}

/// Result of one external indexer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexerOutcome {
    Succeeded { stdout: String, stderr: String },
    /// Nonzero exit, or the executable could not be spawned at all.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The wall-clock cap expired; the child was killed and reaped.
    TimedOut,
    /// Indexing was not attempted (nothing written, or disabled by config).
    Skipped { reason: String },
}

/// Aggregated result of one full sync cycle.
#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    /// Per-thread outcomes in configured order, paired with the issue number.
    pub threads: Vec<(u64, ThreadOutcome)>,
    pub indexer: IndexerOutcome,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.threads
            .iter()
            .filter(|(_, o)| matches!(o, ThreadOutcome::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.threads
            .iter()
            .filter(|(_, o)| matches!(o, ThreadOutcome::Skipped))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.threads
            .iter()
            .filter(|(_, o)| matches!(o, ThreadOutcome::Failed(_)))
            .count()
    }
}
