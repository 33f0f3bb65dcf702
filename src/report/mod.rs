//! Report emission: the refactor commit report, the test-only report and
//! the repository error list, plus sampling of the test-only report.
//!
//! Both reports are truncated and given their header when the writer is
//! created, then appended to once per qualifying commit.

pub mod rows;
pub mod sample;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::classify::Classification;
use crate::core::{CommitRecord, Error, Result};
use crate::git::RepositoryLocation;

pub use rows::{REFACTOR_HEADER, TEST_ONLY_HEADER};
pub use sample::{sample_report, SampleRequest, SampleSummary, DEFAULT_SAMPLE_SIZE};

/// File locations of one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// All qualifying commits.
    pub refactor_commits: PathBuf,
    /// Qualifying commits touching only canonical test files.
    pub test_only_commits: PathBuf,
    /// URLs of repositories that could not be opened or cloned.
    pub repository_errors: PathBuf,
    /// URLs of repositories whose history walk failed, when persisted.
    pub walk_errors: Option<PathBuf>,
}

impl ReportPaths {
    /// Derive report names from the input list's file name.
    ///
    /// `projects.csv` yields `refactor_commits_projects.csv`,
    /// `refactor_commit_only_modified_test_files_projects.csv` and
    /// `repository_projects.csv`.
    pub fn derive(input: &Path, output_dir: &Path, error_dir: &Path, walk_errors: bool) -> Self {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "projects.csv".to_string());

        Self {
            refactor_commits: output_dir.join(format!("refactor_commits_{file_name}")),
            test_only_commits: output_dir
                .join(format!("refactor_commit_only_modified_test_files_{file_name}")),
            repository_errors: error_dir.join(format!("repository_{file_name}")),
            walk_errors: walk_errors.then(|| error_dir.join(format!("commit_{file_name}"))),
        }
    }
}

/// Appends classified commits to the two reports.
pub struct ReportWriter<W: Write> {
    refactor: W,
    test_only: W,
    refactor_rows: usize,
    test_only_rows: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (truncate) both report files and write their headers.
    pub fn create(paths: &ReportPaths) -> Result<Self> {
        let open = |path: &Path| -> Result<BufWriter<File>> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(path).map_err(|e| {
                Error::ReportWrite(format!("cannot create {}: {e}", path.display()))
            })?;
            Ok(BufWriter::new(file))
        };

        Self::new(open(&paths.refactor_commits)?, open(&paths.test_only_commits)?)
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap two destinations and write their headers.
    pub fn new(mut refactor: W, mut test_only: W) -> Result<Self> {
        write_line(&mut refactor, &rows::header_line(&REFACTOR_HEADER))?;
        write_line(&mut test_only, &rows::header_line(&TEST_ONLY_HEADER))?;
        Ok(Self {
            refactor,
            test_only,
            refactor_rows: 0,
            test_only_rows: 0,
        })
    }

    /// Emit a commit according to its classification.
    ///
    /// Each report is written independently and the outcome says which rows
    /// landed. The test-only row is skipped when the refactor row could not
    /// be written, so the test-only report stays a subset of the refactor
    /// report.
    pub fn emit(
        &mut self,
        location: &RepositoryLocation,
        record: &CommitRecord,
        classification: Classification,
    ) -> Emission {
        let mut emission = Emission::default();
        if !classification.qualifies_as_refactor_commit {
            return emission;
        }

        match write_line(&mut self.refactor, &rows::refactor_row(location, record)) {
            Ok(()) => {
                self.refactor_rows += 1;
                emission.refactor_written = true;
            }
            Err(e) => {
                emission.errors.push(e);
                return emission;
            }
        }

        if classification.emits_test_only() {
            match write_line(&mut self.test_only, &rows::test_only_row(location, record)) {
                Ok(()) => {
                    self.test_only_rows += 1;
                    emission.test_only_written = true;
                }
                Err(e) => emission.errors.push(e),
            }
        }
        emission
    }

    /// Rows written to the refactor report (headers excluded).
    pub fn refactor_rows(&self) -> usize {
        self.refactor_rows
    }

    /// Rows written to the test-only report (headers excluded).
    pub fn test_only_rows(&self) -> usize {
        self.test_only_rows
    }

    /// Flush both destinations and hand them back.
    ///
    /// Both flushes are attempted; the first failure is returned.
    pub fn finish(mut self) -> Result<(W, W)> {
        let refactor = flush(&mut self.refactor, "refactor report");
        let test_only = flush(&mut self.test_only, "test-only report");
        refactor.and(test_only)?;
        Ok((self.refactor, self.test_only))
    }
}

/// Rows written by one [`ReportWriter::emit`] call.
#[derive(Debug, Default)]
pub struct Emission {
    pub refactor_written: bool,
    pub test_only_written: bool,
    /// Write failures, at most one per report.
    pub errors: Vec<Error>,
}

fn flush<W: Write>(writer: &mut W, name: &str) -> Result<()> {
    writer
        .flush()
        .map_err(|e| Error::ReportWrite(format!("flushing the {name} failed: {e}")))
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writeln!(writer, "{line}").map_err(|e| Error::ReportWrite(e.to_string()))
}

/// Write one URL per line, truncating the file.
pub fn write_error_list(path: &Path, urls: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for url in urls {
        writeln!(writer, "{url}")?;
    }
    writer.flush()?;
    Ok(())
}
