//! Git operations for mining commit history.

pub mod diff;
mod remote;
mod walk;

use std::path::{Path, PathBuf};

use gix::{ObjectId, Repository};

use crate::core::{ChangeSummary, CommitRecord, Error, Result};

pub use diff::DEV_NULL;
pub use remote::{clone, open_or_clone, RepositoryLocation};
pub use walk::{CommitWalk, WalkedCommit};

/// Git repository wrapper for mining operations.
pub struct GitRepo {
    /// The gix repository handle.
    repo: Repository,
    /// Path the repository was opened from.
    root: PathBuf,
}

impl GitRepo {
    /// Open a git repository at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo =
            gix::open(path).map_err(|e| Error::git(format!("Failed to open repository: {e}")))?;

        Ok(Self {
            repo,
            root: path.to_path_buf(),
        })
    }

    /// Get the repository root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the HEAD commit SHA.
    pub fn head_sha(&self) -> Result<String> {
        let head = self
            .repo
            .head_id()
            .map_err(|e| Error::walk(format!("Failed to get HEAD: {e}")))?;
        Ok(head.to_string())
    }

    /// Walk the history reachable from HEAD, newest first.
    pub fn walk(&self) -> Result<CommitWalk<'_>> {
        walk::walk_head(&self.repo)
    }

    /// Load a walked commit's record; `None` for root and merge commits.
    pub fn commit_record(&self, walked: &WalkedCommit) -> Result<Option<CommitRecord>> {
        walk::commit_record(&self.repo, walked)
    }

    /// Summarize the changes between two commits.
    pub fn summarize(&self, parent: &str, commit: &str) -> Result<ChangeSummary> {
        let parent = self.resolve(parent)?;
        let commit = self.resolve(commit)?;
        diff::summarize(&self.repo, parent, commit)
    }

    /// Resolve a revision spec (SHA, branch, `HEAD~1`, ...) to a commit id.
    pub fn resolve(&self, spec: &str) -> Result<ObjectId> {
        let id = self
            .repo
            .rev_parse_single(spec)
            .map_err(|e| Error::InvalidArgument(format!("cannot resolve revision '{spec}': {e}")))?;
        Ok(id.detach())
    }
}
