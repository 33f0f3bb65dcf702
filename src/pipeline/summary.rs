//! Per-repository outcomes and run-level aggregates.

use serde::Serialize;

/// How far processing of a repository got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum RepositoryStatus {
    /// The whole history was walked.
    Completed,
    /// The repository could not be opened or cloned.
    AcquisitionFailed(String),
    /// The history walk failed part-way; remaining commits were abandoned.
    WalkFailed(String),
}

/// Result of mining one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryOutcome {
    /// `owner/name`.
    pub repository: String,
    /// Repository URL.
    pub url: String,
    /// Final status.
    #[serde(flatten)]
    pub status: RepositoryStatus,
    /// Commits yielded by the walk.
    pub commits_scanned: usize,
    /// Root and merge commits skipped before classification.
    pub commits_skipped: usize,
    /// Commits dropped because their diff failed.
    pub diff_failures: usize,
    /// Rows that could not be written.
    pub write_failures: usize,
    /// Commits in the refactor report.
    pub refactor_commits: usize,
    /// Commits in the test-only report.
    pub test_only_commits: usize,
    /// Change sizes of the test-only commits.
    #[serde(skip)]
    pub test_only_changes: Vec<ChangeSize>,
}

impl RepositoryOutcome {
    /// Fresh outcome for a repository about to be processed.
    pub fn new(repository: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            url: url.into(),
            status: RepositoryStatus::Completed,
            commits_scanned: 0,
            commits_skipped: 0,
            diff_failures: 0,
            write_failures: 0,
            refactor_commits: 0,
            test_only_commits: 0,
            test_only_changes: Vec::new(),
        }
    }
}

/// Size of one test-only commit, as written to the test-only report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeSize {
    pub changed_files: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// Max, min, mean and median of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub max: u64,
    pub min: u64,
    pub mean: f64,
    pub median: f64,
}

impl Distribution {
    /// Describe a sample; `None` when it is empty.
    pub fn of(values: &[u64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let n = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
        };

        Some(Self {
            max: sorted[n - 1],
            min: sorted[0],
            mean: sum as f64 / n as f64,
            median,
        })
    }
}

/// Descriptive statistics over the test-only report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestOnlyStatistics {
    pub changed_files_count: Distribution,
    pub total_addition_lines: Distribution,
    pub total_deletions_lines: Distribution,
}

impl TestOnlyStatistics {
    /// Statistics over the given change sizes; `None` when there are none.
    pub fn of(changes: &[ChangeSize]) -> Option<Self> {
        let files: Vec<u64> = changes.iter().map(|c| c.changed_files).collect();
        let additions: Vec<u64> = changes.iter().map(|c| c.additions).collect();
        let deletions: Vec<u64> = changes.iter().map(|c| c.deletions).collect();
        Some(Self {
            changed_files_count: Distribution::of(&files)?,
            total_addition_lines: Distribution::of(&additions)?,
            total_deletions_lines: Distribution::of(&deletions)?,
        })
    }
}

/// Aggregate of a whole collection run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub repositories_processed: usize,
    pub commits_scanned: usize,
    pub refactor_commits: usize,
    pub test_only_commits: usize,
    /// URLs of repositories that could not be opened or cloned.
    pub repository_errors: Vec<String>,
    /// URLs of repositories whose history walk failed.
    pub walk_errors: Vec<String>,
    /// Test-only change statistics, absent when the test-only report is empty.
    pub test_only_statistics: Option<TestOnlyStatistics>,
    /// Per-repository counts.
    pub repositories: Vec<RepositoryOutcome>,
    /// Set when the reports could not be flushed at the end of the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
}

impl RunSummary {
    /// Aggregate repository outcomes in processing order.
    pub fn from_outcomes(outcomes: Vec<RepositoryOutcome>) -> Self {
        let mut repository_errors = Vec::new();
        let mut walk_errors = Vec::new();
        let mut sizes = Vec::new();

        for outcome in &outcomes {
            match outcome.status {
                RepositoryStatus::AcquisitionFailed(_) => repository_errors.push(outcome.url.clone()),
                RepositoryStatus::WalkFailed(_) => walk_errors.push(outcome.url.clone()),
                RepositoryStatus::Completed => {}
            }
            sizes.extend_from_slice(&outcome.test_only_changes);
        }

        Self {
            repositories_processed: outcomes.len(),
            commits_scanned: outcomes.iter().map(|o| o.commits_scanned).sum(),
            refactor_commits: outcomes.iter().map(|o| o.refactor_commits).sum(),
            test_only_commits: outcomes.iter().map(|o| o.test_only_commits).sum(),
            repository_errors,
            walk_errors,
            test_only_statistics: TestOnlyStatistics::of(&sizes),
            repositories: outcomes,
            report_error: None,
        }
    }
}
