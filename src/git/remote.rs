//! Repository acquisition: reuse a local copy or clone it.

use std::path::{Path, PathBuf};

use crate::core::{Error, Result};

use super::GitRepo;

/// Where a project lives remotely and locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    /// Project identifier, `owner/name`.
    pub name: String,
    /// Browsable repository URL, e.g. `https://github.com/owner/name`.
    pub url: String,
    /// Local working copy directory.
    pub dir: PathBuf,
}

impl RepositoryLocation {
    /// Resolve a project identifier against a remote base URL and a local root.
    pub fn resolve(name: &str, base_url: &str, repos_dir: &Path) -> Result<Self> {
        let name = name.trim();
        let valid = name
            .split_once('/')
            .is_some_and(|(owner, repo)| !owner.is_empty() && !repo.is_empty());
        if !valid || name.contains("://") || name.contains("..") {
            return Err(Error::InvalidArgument(format!(
                "expected an <owner>/<name> project identifier, got '{name}'"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            url: format!("{}/{name}", base_url.trim_end_matches('/')),
            dir: repos_dir.join(name),
        })
    }

    /// URL used for cloning.
    pub fn clone_url(&self) -> String {
        format!("{}.git", self.url)
    }

    /// Browsable URL of a commit.
    pub fn commit_url(&self, commit_id: &str) -> String {
        format!("{}/commit/{commit_id}", self.url)
    }
}

/// Open the local copy, cloning it first when the directory is absent.
pub fn open_or_clone(location: &RepositoryLocation) -> Result<GitRepo> {
    if location.dir.exists() {
        tracing::debug!("Opening existing copy of {} at {}", location.name, location.dir.display());
        return GitRepo::open(&location.dir)
            .map_err(|e| Error::acquisition(&location.url, e.to_string()));
    }

    clone(&location.clone_url(), &location.dir)
        .map_err(|e| Error::acquisition(&location.url, e.to_string()))?;
    GitRepo::open(&location.dir).map_err(|e| Error::acquisition(&location.url, e.to_string()))
}

/// Clone a remote repository into `target` (objects and refs only, no checkout).
pub fn clone(url: &str, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Cloning {url} into {}", target.display());
    let mut prepare = gix::prepare_clone(url, target)
        .map_err(|e| Error::acquisition(url, format!("failed to prepare clone: {e}")))?;

    let result = prepare.fetch_only(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED);
    if let Err(e) = result {
        // A half-written clone would be mistaken for a local copy next time.
        drop(prepare);
        std::fs::remove_dir_all(target).ok();
        return Err(Error::acquisition(url, format!("failed to clone: {e}")));
    }

    Ok(())
}
