//! Commit records produced by the git layer and consumed by the classifier.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Changed paths and line totals of one commit against its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// New-side paths in diff order. Deletions appear as `/dev/null`.
    pub changed_files: Vec<String>,
    /// Lines added over all hunks of all files.
    pub total_additions: u64,
    /// Lines deleted over all hunks of all files.
    pub total_deletions: u64,
}

impl ChangeSummary {
    /// Number of changed paths (duplicates included).
    pub fn file_count(&self) -> usize {
        self.changed_files.len()
    }

    /// Whether the diff touched nothing.
    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty()
    }
}

/// A single-parent commit with its change summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit SHA.
    pub id: String,
    /// The only parent's SHA.
    pub parent_id: String,
    /// Full commit message.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Author timestamp (seconds since the Unix epoch).
    pub timestamp: i64,
    /// Changes against the parent.
    pub changes: ChangeSummary,
}

impl CommitRecord {
    /// Author date rendered as RFC 3339 in UTC.
    pub fn date(&self) -> String {
        Utc.timestamp_opt(self.timestamp, 0)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}
