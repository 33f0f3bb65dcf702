//! Refminer - mines git histories for commits that refactor test code.
//!
//! For every repository in a project list, refminer walks the full commit
//! history, summarizes each commit's diff against its single parent, and
//! keeps the commits whose message announces a test refactoring and which
//! touch at least one test file. Qualifying commits go to a refactor report;
//! those that modify only canonical test files also go to a test-only report.
//!
//! # Example
//!
//! ```no_run
//! use refminer::classify::CommitClassifier;
//! use refminer::config::Config;
//! use refminer::git::GitRepo;
//!
//! let config = Config::default();
//! let classifier = CommitClassifier::new(config.file_classifier());
//! let repo = GitRepo::open(".").unwrap();
//! let report = refminer::pipeline::scan(&repo, &classifier).unwrap();
//! println!("{} refactor commits", report.commits.len());
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod git;
pub mod output;
pub mod pipeline;
pub mod report;

pub use classify::{Classification, CommitClassifier, FileClassifier};
pub use core::{ChangeSummary, CommitRecord, Error, Result};
