//! Random sampling of the test-only report for manual review.
//!
//! The sample keeps the report's header and its rows in file order. The
//! NDJSON variant lists `{sha, owner, repository}` per sampled commit.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::rows::{header_line, TEST_ONLY_HEADER};
use crate::core::{Error, Result};

/// Rows drawn when no size is given.
pub const DEFAULT_SAMPLE_SIZE: usize = 370;

const NAME_COLUMN: usize = 0;
const COMMIT_COLUMN: usize = 2;

/// Rows of a test-only report, header excluded.
#[derive(Debug, Clone)]
pub struct TestOnlyRows {
    path: PathBuf,
    rows: Vec<String>,
}

impl TestOnlyRows {
    /// Read a test-only report. The header must match the report layout.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Input {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Parse report content; `path` is only used in errors.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let mut lines = content.lines();
        let header = lines.next().unwrap_or_default().trim_start_matches('\u{feff}');
        if header.trim_end() != header_line(&TEST_ONLY_HEADER) {
            return Err(Error::Input {
                path: path.to_path_buf(),
                message: format!("not a test-only report (header `{header}`)"),
            });
        }

        let rows = lines
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Draw `size` distinct rows with a seeded generator, keeping file order.
    ///
    /// Asking for at least as many rows as the report has returns them all.
    pub fn sample(&self, size: usize, seed: u64) -> Vec<&str> {
        if size >= self.rows.len() {
            return self.rows.iter().map(String::as_str).collect();
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = rand::seq::index::sample(&mut rng, self.rows.len(), size).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| self.rows[i].as_str()).collect()
    }

    /// Commit identity of one row.
    pub fn commit_of(&self, row: &str) -> Result<SampledCommit> {
        let cells: Vec<&str> = row.split(',').collect();
        let malformed = |what: &str| Error::Input {
            path: self.path.clone(),
            message: format!("{what} in row `{row}`"),
        };

        let name = cells.get(NAME_COLUMN).copied().unwrap_or_default();
        let sha = cells
            .get(COMMIT_COLUMN)
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| malformed("missing commit id"))?;
        let (owner, repository) = name
            .split_once('/')
            .ok_or_else(|| malformed("repository name without owner"))?;

        Ok(SampledCommit {
            sha: sha.to_string(),
            owner: owner.to_string(),
            repository: repository.to_string(),
        })
    }
}

/// One NDJSON line of the sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampledCommit {
    pub sha: String,
    pub owner: String,
    pub repository: String,
}

/// Where a sample is written and how it is drawn.
#[derive(Debug, Clone)]
pub struct SampleRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ndjson: Option<PathBuf>,
    pub size: usize,
    /// Fixed seed; a fresh one is drawn and reported when absent.
    pub seed: Option<u64>,
}

impl SampleRequest {
    /// Default sample location: `sampling_<input name>` in `output_dir`.
    pub fn default_output(input: &Path, output_dir: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "test_only_commits.csv".to_string());
        output_dir.join(format!("sampling_{file_name}"))
    }
}

/// Result of a sampling run.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSummary {
    pub input: String,
    pub rows_available: usize,
    pub rows_sampled: usize,
    /// Seed that reproduces this sample.
    pub seed: u64,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndjson: Option<String>,
}

/// Sample a test-only report into a CSV file and, optionally, NDJSON.
pub fn sample_report(request: &SampleRequest) -> Result<SampleSummary> {
    let report = TestOnlyRows::read(&request.input)?;
    let seed = request.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let rows = report.sample(request.size, seed);
    tracing::info!(
        "Sampled {} of {} rows from {} (seed {seed})",
        rows.len(),
        report.len(),
        request.input.display()
    );
    if rows.len() < request.size {
        tracing::warn!(
            "{} has only {} rows, fewer than the requested {}",
            request.input.display(),
            report.len(),
            request.size
        );
    }

    // Resolve every row before writing anything.
    let commits = match &request.ndjson {
        Some(_) => rows
            .iter()
            .map(|row| report.commit_of(row))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let mut csv = create(&request.output)?;
    writeln!(csv, "{}", header_line(&TEST_ONLY_HEADER))?;
    for row in &rows {
        writeln!(csv, "{row}")?;
    }
    csv.flush()?;

    if let Some(path) = &request.ndjson {
        let mut ndjson = create(path)?;
        for commit in &commits {
            serde_json::to_writer(&mut ndjson, commit)?;
            writeln!(ndjson)?;
        }
        ndjson.flush()?;
    }

    Ok(SampleSummary {
        input: request.input.display().to_string(),
        rows_available: report.len(),
        rows_sampled: rows.len(),
        seed,
        output: request.output.display().to_string(),
        ndjson: request.ndjson.as_ref().map(|p| p.display().to_string()),
    })
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .map_err(|e| Error::ReportWrite(format!("cannot create {}: {e}", path.display())))?;
    Ok(BufWriter::new(file))
}
