//! Error types for the refminer library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using refminer's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mining repositories.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file (project list or report) could not be read.
    #[error("Cannot read input {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// Git operation error.
    #[error("Git error: {0}")]
    Git(String),

    /// The repository could not be opened or cloned.
    #[error("Repository acquisition failed for {url}: {message}")]
    RepositoryAcquisition { url: String, message: String },

    /// History traversal failed after the repository was opened.
    #[error("Commit walk failed: {0}")]
    CommitWalk(String),

    /// The tree diff of a single commit could not be computed.
    #[error("Diff computation failed for {commit}: {message}")]
    DiffComputation { commit: String, message: String },

    /// A record could not be appended to a report.
    #[error("Report write failed: {0}")]
    ReportWrite(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create a repository acquisition error.
    pub fn acquisition(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RepositoryAcquisition {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new git error.
    pub fn git(message: impl Into<String>) -> Self {
        Self::Git(message.into())
    }

    /// Create a commit walk error.
    pub fn walk(message: impl Into<String>) -> Self {
        Self::CommitWalk(message.into())
    }

    /// Create a diff computation error for the given commit.
    pub fn diff(commit: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::DiffComputation {
            commit: commit.to_string(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error only affects a single commit.
    pub fn is_commit_local(&self) -> bool {
        matches!(self, Self::DiffComputation { .. })
    }
}
