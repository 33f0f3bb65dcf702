//! Collection pipeline: project list → repositories → commits → reports.
//!
//! Repositories are processed one at a time and commits newest first. Each
//! repository yields a [`RepositoryOutcome`]; a failure in one repository
//! never stops the others.

mod projects;
mod summary;

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::classify::{Classification, CommitClassifier};
use crate::config::Config;
use crate::core::{CommitRecord, RepositoryProgress, Result};
use crate::git::{self, GitRepo, RepositoryLocation};
use crate::report::{self, ReportPaths, ReportWriter};

pub use projects::{parse_project_list, read_project_list, HEADER_CELL};
pub use summary::{
    ChangeSize, Distribution, RepositoryOutcome, RepositoryStatus, RunSummary, TestOnlyStatistics,
};

/// Mines repositories for test refactoring commits.
pub struct Collector {
    config: Config,
    classifier: CommitClassifier,
}

impl Collector {
    /// Create a collector from configuration.
    pub fn new(config: Config) -> Self {
        let classifier = CommitClassifier::new(config.file_classifier());
        Self { config, classifier }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every project in order, emitting into `reports`.
    pub fn run<W: Write>(
        &self,
        projects: &[String],
        reports: &mut ReportWriter<W>,
        progress: &RepositoryProgress,
    ) -> RunSummary {
        let mut outcomes = Vec::with_capacity(projects.len());
        for project in projects {
            progress.start_repository(project);
            let outcome = self.process_repository(project, reports, progress);
            tracing::info!(
                "Processed repository: {} ({} commits, {} refactor, {} test-only)",
                project,
                outcome.commits_scanned,
                outcome.refactor_commits,
                outcome.test_only_commits
            );
            progress.finish_repository();
            outcomes.push(outcome);
        }
        progress.finish();
        RunSummary::from_outcomes(outcomes)
    }

    /// Acquire and mine one repository.
    pub fn process_repository<W: Write>(
        &self,
        project: &str,
        reports: &mut ReportWriter<W>,
        progress: &RepositoryProgress,
    ) -> RepositoryOutcome {
        let location = match RepositoryLocation::resolve(
            project,
            &self.config.remote_base_url,
            &self.config.repos_dir,
        ) {
            Ok(location) => location,
            Err(e) => {
                let url = format!("{}/{}", self.config.remote_base_url.trim_end_matches('/'), project);
                tracing::error!("Error processing repository: {e}");
                let mut outcome = RepositoryOutcome::new(project, url);
                outcome.status = RepositoryStatus::AcquisitionFailed(e.to_string());
                return outcome;
            }
        };

        let mut outcome = RepositoryOutcome::new(&location.name, &location.url);
        let repo = match git::open_or_clone(&location) {
            Ok(repo) => repo,
            Err(e) => {
                tracing::error!("Error processing repository: {e}");
                outcome.status = RepositoryStatus::AcquisitionFailed(e.to_string());
                return outcome;
            }
        };

        if let Err(e) = self.mine(&repo, &location, reports, &mut outcome, progress) {
            tracing::error!("Error processing commits of {}: {e}", location.name);
            outcome.status = RepositoryStatus::WalkFailed(e.to_string());
        }
        outcome
    }

    /// Walk, summarize, classify and emit. Only walk errors escape.
    fn mine<W: Write>(
        &self,
        repo: &GitRepo,
        location: &RepositoryLocation,
        reports: &mut ReportWriter<W>,
        outcome: &mut RepositoryOutcome,
        progress: &RepositoryProgress,
    ) -> Result<()> {
        for walked in repo.walk()? {
            let walked = walked?;
            outcome.commits_scanned += 1;
            progress.commits_seen(&location.name, outcome.commits_scanned);

            let record = match repo.commit_record(&walked) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    outcome.commits_skipped += 1;
                    continue;
                }
                Err(e) if e.is_commit_local() => {
                    tracing::warn!("Error getting changed files: {e}");
                    outcome.diff_failures += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let Some(classification) = self
                .classifier
                .classify_commit(walked.parent_ids.len(), &record)
            else {
                outcome.commits_skipped += 1;
                continue;
            };

            let emission = reports.emit(location, &record, classification);
            if emission.refactor_written {
                outcome.refactor_commits += 1;
            }
            if emission.test_only_written {
                outcome.test_only_commits += 1;
                outcome.test_only_changes.push(ChangeSize {
                    changed_files: record.changes.file_count() as u64,
                    additions: record.changes.total_additions,
                    deletions: record.changes.total_deletions,
                });
            }
            for e in &emission.errors {
                tracing::warn!("Error writing commit {} to report: {e}", record.id);
                outcome.write_failures += 1;
            }
            tracing::debug!("{}: processed ({})", location.name, record.id);
        }
        Ok(())
    }
}

/// Run a full collection: read the project list, write both reports and the
/// error lists, and return the run summary.
///
/// Only an unreadable project list or a report that cannot be created aborts
/// the run. A failed final flush is logged and kept in the summary.
pub fn collect(config: Config, input: &Path, paths: &ReportPaths) -> Result<RunSummary> {
    let projects = read_project_list(input)?;
    tracing::info!("Mining {} repositories from {}", projects.len(), input.display());

    let reports = ReportWriter::create(paths)?;
    collect_into(config, &projects, reports, paths)
}

/// Mine `projects` into already created reports, then write the error lists.
pub fn collect_into<W: Write>(
    config: Config,
    projects: &[String],
    mut reports: ReportWriter<W>,
    paths: &ReportPaths,
) -> Result<RunSummary> {
    let progress = RepositoryProgress::new(projects.len());
    let collector = Collector::new(config);
    let mut summary = collector.run(projects, &mut reports, &progress);
    if let Err(e) = reports.finish() {
        tracing::error!("Reports may be incomplete: {e}");
        summary.report_error = Some(e.to_string());
    }

    report::write_error_list(&paths.repository_errors, &summary.repository_errors)?;
    if let Some(path) = &paths.walk_errors {
        report::write_error_list(path, &summary.walk_errors)?;
    }

    Ok(summary)
}

/// One classified commit of a scanned repository.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    pub commit_id: String,
    pub commit_date: String,
    pub commit_author: String,
    /// First line of the message.
    pub subject: String,
    pub changed_files: usize,
    pub additions: u64,
    pub deletions: u64,
    pub test_only: bool,
}

impl ScanEntry {
    fn new(record: &CommitRecord, classification: Classification) -> Self {
        Self {
            commit_id: record.id.clone(),
            commit_date: record.date(),
            commit_author: record.author.clone(),
            subject: record.message.lines().next().unwrap_or_default().to_string(),
            changed_files: record.changes.file_count(),
            additions: record.changes.total_additions,
            deletions: record.changes.total_deletions,
            test_only: classification.emits_test_only(),
        }
    }
}

/// Qualifying commits of one local repository, without writing reports.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub repository: String,
    pub commits_scanned: usize,
    pub diff_failures: usize,
    pub commits: Vec<ScanEntry>,
}

/// Classify every commit of an already opened repository.
///
/// Diff failures skip the commit; walk failures are returned.
pub fn scan(repo: &GitRepo, classifier: &CommitClassifier) -> Result<ScanReport> {
    let mut report = ScanReport {
        repository: repo.root().display().to_string(),
        commits_scanned: 0,
        diff_failures: 0,
        commits: Vec::new(),
    };

    for walked in repo.walk()? {
        let walked = walked?;
        report.commits_scanned += 1;

        let record = match repo.commit_record(&walked) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) if e.is_commit_local() => {
                tracing::warn!("Error getting changed files: {e}");
                report.diff_failures += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        if let Some(classification) = classifier.classify_commit(walked.parent_ids.len(), &record) {
            if classification.qualifies_as_refactor_commit {
                report.commits.push(ScanEntry::new(&record, classification));
            }
        }
    }
    Ok(report)
}
