use std::collections::BTreeMap;

use tracing::trace;

use crate::entry::FileInfo;

/// Conflict detected while inserting a manifest entry.
///
/// The upstream tool silently produced broken trees for these manifests; the
/// parser now rejects them instead (see the crate-level invariants).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InsertConflict {
    /// The inserted path was already established as a directory.
    ReplacesDirectory {
        /// The conflicting path.
        path: String,
    },
    /// An ancestor of the inserted path is a non-directory entry.
    NonDirectoryAncestor {
        /// The conflicting ancestor path.
        path: String,
    },
}

/// Ordered map from relative path to the entry expected there.
///
/// Keys are `/`-separated relative paths. The map is ordered so that a
/// directory always sorts before its children; the creation phase iterates in
/// that order and never has to create a child before its parent.
#[derive(Clone, Debug, Default)]
pub struct DesiredState {
    entries: BTreeMap<String, FileInfo>,
}

impl DesiredState {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a manifest entry and synthesizes its missing ancestors as
    /// directories.
    ///
    /// A path that repeats an earlier non-directory leaf replaces it (last
    /// line wins, as upstream). Synthesis walks toward the root and stops at
    /// the first ancestor already present; encountering a non-directory
    /// ancestor, or replacing an established directory with a non-directory,
    /// is reported as an [`InsertConflict`].
    pub fn insert(&mut self, path: &str, info: FileInfo) -> Result<(), InsertConflict> {
        if let Some(existing) = self.entries.get(path) {
            if existing.kind().is_directory() && !info.kind().is_directory() {
                return Err(InsertConflict::ReplacesDirectory {
                    path: path.to_string(),
                });
            }
        }
        self.entries.insert(path.to_string(), info);

        let mut ancestor = path;
        while let Some(cut) = ancestor.rfind('/') {
            ancestor = &ancestor[..cut];
            match self.entries.get(ancestor) {
                None => {
                    trace!(path = ancestor, "synthesizing parent directory");
                    self.entries
                        .insert(ancestor.to_string(), FileInfo::directory());
                }
                Some(existing) if existing.kind().is_directory() => break,
                Some(_) => {
                    return Err(InsertConflict::NonDirectoryAncestor {
                        path: ancestor.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Forces `path` to be treated as a regular file, bypassing conflict
    /// checks.
    ///
    /// Used for the in-progress archive file so the prune pass never deletes
    /// it out from under the parser.
    pub fn force_regular(&mut self, path: &str) {
        self.entries.insert(path.to_string(), FileInfo::regular());
    }

    /// Looks up the expected entry at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileInfo> {
        self.entries.get(path)
    }

    /// Removes and returns the entry at `path`.
    pub fn remove(&mut self, path: &str) -> Option<FileInfo> {
        self.entries.remove(path)
    }

    /// Removes and returns all remaining entries, in lexicographic order.
    pub fn drain(&mut self) -> BTreeMap<String, FileInfo> {
        std::mem::take(&mut self.entries)
    }

    /// Returns the number of entries currently expected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether every expected entry has been accounted for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the expected entries in lexicographic path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileInfo)> {
        self.entries.iter().map(|(path, info)| (path.as_str(), info))
    }
}
