//! Commit history traversal.

use bstr::ByteSlice;
use gix::revision::walk::Sorting;
use gix::traverse::commit::simple::CommitTimeOrder;
use gix::{ObjectId, Repository};

use super::diff;
use crate::core::{CommitRecord, Error, Result};

/// A commit reached by the history walk, before any object lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedCommit {
    /// Commit id.
    pub id: ObjectId,
    /// Parent ids in commit order.
    pub parent_ids: Vec<ObjectId>,
}

impl WalkedCommit {
    /// The parent of a non-merge, non-root commit.
    pub fn single_parent(&self) -> Option<ObjectId> {
        match self.parent_ids.as_slice() {
            [parent] => Some(*parent),
            _ => None,
        }
    }
}

/// Iterator over the commits reachable from HEAD, newest first.
pub struct CommitWalk<'repo> {
    inner: gix::revision::Walk<'repo>,
}

impl Iterator for CommitWalk<'_> {
    type Item = Result<WalkedCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(
            item.map(|info| WalkedCommit {
                id: info.id,
                parent_ids: info.parent_ids.iter().copied().collect(),
            })
            .map_err(|e| Error::walk(format!("history traversal failed: {e}"))),
        )
    }
}

/// Start walking the history reachable from HEAD in commit-time order.
pub fn walk_head(repo: &Repository) -> Result<CommitWalk<'_>> {
    let head = repo
        .head_id()
        .map_err(|e| Error::walk(format!("cannot resolve HEAD: {e}")))?;

    let inner = repo
        .rev_walk([head.detach()])
        .sorting(Sorting::ByCommitTime(CommitTimeOrder::NewestFirst))
        .all()
        .map_err(|e| Error::walk(format!("cannot start history walk: {e}")))?;

    Ok(CommitWalk { inner })
}

/// Load the record of a walked commit.
///
/// Returns `Ok(None)` for root and merge commits without touching their trees.
/// Metadata failures are walk errors; diff failures are commit-local.
pub fn commit_record(repo: &Repository, walked: &WalkedCommit) -> Result<Option<CommitRecord>> {
    let Some(parent) = walked.single_parent() else {
        return Ok(None);
    };

    let commit = repo
        .find_commit(walked.id)
        .map_err(|e| Error::walk(format!("cannot load commit {}: {e}", walked.id)))?;
    let message = commit
        .message_raw()
        .map_err(|e| Error::walk(format!("cannot decode message of {}: {e}", walked.id)))?
        .to_str_lossy()
        .into_owned();
    let author = commit
        .author()
        .map_err(|e| Error::walk(format!("cannot decode author of {}: {e}", walked.id)))?;

    let changes = diff::summarize(repo, parent, walked.id)?;

    Ok(Some(CommitRecord {
        id: walked.id.to_string(),
        parent_id: parent.to_string(),
        message,
        author: author.name.to_string(),
        timestamp: author.seconds(),
        changes,
    }))
}
