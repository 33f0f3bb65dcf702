//! Tree-to-tree diff statistics.

use std::ops::Range;

use gix::diff::blob::{diff, intern::InternedInput, Algorithm};
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::{ObjectId, Repository};

use crate::core::{ChangeSummary, Error, Result};

/// New-side path reported for deleted files.
pub const DEV_NULL: &str = "/dev/null";

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8000;

/// Summarize the changes between a parent commit and a commit.
pub fn summarize(repo: &Repository, parent: ObjectId, commit: ObjectId) -> Result<ChangeSummary> {
    let old_tree = commit_tree(repo, parent, commit)?;
    let new_tree = commit_tree(repo, commit, commit)?;

    let mut options = gix::diff::Options::default();
    options.track_path();
    options.with_rewrites(None);

    let changes = repo
        .diff_tree_to_tree(&old_tree, &new_tree, options)
        .map_err(|e| Error::diff(commit, format!("tree diff failed: {e}")))?;

    let mut summary = ChangeSummary::default();
    for entry in changes.into_iter().flat_map(FileEntry::from_change) {
        let old = blob_content(repo, entry.old, commit)?;
        let new = blob_content(repo, entry.new, commit)?;
        let (additions, deletions) = line_counts(&old, &new);

        summary.changed_files.push(entry.path);
        summary.total_additions += additions;
        summary.total_deletions += deletions;
    }

    Ok(summary)
}

/// Resolve the tree of `id`; failures are attributed to the commit being summarized.
fn commit_tree(repo: &Repository, id: ObjectId, summarized: ObjectId) -> Result<gix::Tree<'_>> {
    repo.find_commit(id)
        .map_err(|e| Error::diff(summarized, format!("cannot find commit {id}: {e}")))?
        .tree()
        .map_err(|e| Error::diff(summarized, format!("cannot resolve tree of {id}: {e}")))
}

/// One changed leaf entry: its reported path and the blob on each side.
#[derive(Debug)]
struct FileEntry {
    path: String,
    old: Option<(ObjectId, EntryMode)>,
    new: Option<(ObjectId, EntryMode)>,
}

impl FileEntry {
    fn added(path: String, id: ObjectId, mode: EntryMode) -> Self {
        Self {
            path,
            old: None,
            new: Some((id, mode)),
        }
    }

    fn deleted(id: ObjectId, mode: EntryMode) -> Self {
        Self {
            path: DEV_NULL.to_string(),
            old: Some((id, mode)),
            new: None,
        }
    }

    /// Flatten a tree change into leaf entries.
    ///
    /// A change between entry kinds (file, symlink, submodule, directory)
    /// becomes a deletion followed by an addition; directory sides are dropped.
    fn from_change(change: ChangeDetached) -> Vec<Self> {
        let (path, old, new) = match change {
            ChangeDetached::Addition {
                location,
                entry_mode,
                id,
                ..
            } => (location.to_string(), None, Some((id, entry_mode))),
            ChangeDetached::Deletion { entry_mode, id, .. } => {
                (DEV_NULL.to_string(), Some((id, entry_mode)), None)
            }
            ChangeDetached::Modification {
                location,
                previous_entry_mode,
                previous_id,
                entry_mode,
                id,
                ..
            } => (
                location.to_string(),
                Some((previous_id, previous_entry_mode)),
                Some((id, entry_mode)),
            ),
            ChangeDetached::Rewrite {
                source_entry_mode,
                source_id,
                entry_mode,
                id,
                location,
                ..
            } => (
                location.to_string(),
                Some((source_id, source_entry_mode)),
                Some((id, entry_mode)),
            ),
        };

        match (old, new) {
            (Some((old_id, old_mode)), Some((new_id, new_mode)))
                if EntryKind::of(old_mode) != EntryKind::of(new_mode) =>
            {
                let mut entries = Vec::with_capacity(2);
                if !old_mode.is_tree() {
                    entries.push(Self::deleted(old_id, old_mode));
                }
                if !new_mode.is_tree() {
                    entries.push(Self::added(path, new_id, new_mode));
                }
                entries
            }
            (old, new) => {
                let is_tree = |side: &Option<(ObjectId, EntryMode)>| {
                    side.is_some_and(|(_, mode)| mode.is_tree())
                };
                if is_tree(&old) || is_tree(&new) {
                    return Vec::new();
                }
                vec![Self { path, old, new }]
            }
        }
    }
}

/// Entry kinds whose changes are never diffed against each other.
/// Regular and executable files share a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Symlink,
    Submodule,
    Directory,
}

impl EntryKind {
    fn of(mode: EntryMode) -> Self {
        if mode.is_tree() {
            Self::Directory
        } else if mode.is_link() {
            Self::Symlink
        } else if mode.is_commit() {
            Self::Submodule
        } else {
            Self::File
        }
    }
}

/// Read a blob, treating absent sides and submodule links as empty.
fn blob_content(
    repo: &Repository,
    side: Option<(ObjectId, EntryMode)>,
    commit: ObjectId,
) -> Result<Vec<u8>> {
    match side {
        Some((id, mode)) if !mode.is_commit() => {
            let mut blob = repo
                .find_blob(id)
                .map_err(|e| Error::diff(commit, format!("cannot read blob {id}: {e}")))?;
            Ok(std::mem::take(&mut blob.data))
        }
        _ => Ok(Vec::new()),
    }
}

/// Added and deleted line counts over all hunks of a line diff.
///
/// Binary content yields no hunks.
pub fn line_counts(old: &[u8], new: &[u8]) -> (u64, u64) {
    if is_binary(old) || is_binary(new) {
        return (0, 0);
    }

    let input = InternedInput::new(old, new);
    let mut additions = 0u64;
    let mut deletions = 0u64;
    diff(
        Algorithm::Histogram,
        &input,
        |before: Range<u32>, after: Range<u32>| {
            deletions += u64::from(before.end - before.start);
            additions += u64::from(after.end - after.start);
        },
    );
    (additions, deletions)
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}
