//! Commit-level decision combining the file and message heuristics.

use serde::{Deserialize, Serialize};

use super::file::FileClassifier;
use super::message::matches_refactor_intent;
use crate::core::{ChangeSummary, CommitRecord};

/// Outcome of classifying one single-parent commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Message and file signals both fired; the commit belongs in the refactor report.
    pub qualifies_as_refactor_commit: bool,
    /// Every changed file is a canonical test file (vacuously true when none changed).
    pub is_test_only_change: bool,
}

impl Classification {
    /// Whether the commit belongs in the test-only report.
    ///
    /// The test-only report is a subset of the refactor report.
    pub fn emits_test_only(&self) -> bool {
        self.qualifies_as_refactor_commit && self.is_test_only_change
    }
}

/// Classifies commits as test refactoring candidates.
#[derive(Debug, Clone, Default)]
pub struct CommitClassifier {
    files: FileClassifier,
}

impl CommitClassifier {
    /// Create a classifier using the given file heuristics.
    pub fn new(files: FileClassifier) -> Self {
        Self { files }
    }

    /// File heuristics in use.
    pub fn files(&self) -> &FileClassifier {
        &self.files
    }

    /// Classify a commit, or `None` when it does not have exactly one parent.
    pub fn classify_commit(&self, parent_count: usize, record: &CommitRecord) -> Option<Classification> {
        (parent_count == 1).then(|| self.classify(&record.message, &record.changes))
    }

    /// Classify a message and change summary.
    pub fn classify(&self, message: &str, changes: &ChangeSummary) -> Classification {
        let files = &changes.changed_files;

        let file_signal = files.iter().any(|f| self.files.is_canonical_test_file(f))
            || files.iter().any(|f| self.files.is_test_named_file(f));
        let message_signal = matches_refactor_intent(message);

        Classification {
            qualifies_as_refactor_commit: file_signal && message_signal,
            is_test_only_change: files.iter().all(|f| self.files.is_canonical_test_file(f)),
        }
    }
}
