use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use runfiles_core::FileKind;
use runfiles_fsops::{Filesystem, TRASH_DIR_NAME};
use runfiles_manifest::{DesiredState, FileInfo};
use tracing::debug;

use crate::error::EngineError;
use crate::options::ReconcileOptions;
use crate::summary::ReconcileSummary;

/// Physical realization chosen for a desired link entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LinkAlgorithm {
    Symlink,
    Hardlink,
    Junction,
}

/// Reconciles the tree under `base` against `state`.
///
/// Runs the prune phase followed by the create phase. On success `state` has
/// been fully drained: every desired entry was either verified in place or
/// created.
///
/// # Errors
///
/// Any filesystem failure aborts the run with an [`EngineError`]; the tree
/// is left partially reconciled and a rerun with the same manifest recovers.
pub fn reconcile<F: Filesystem>(
    base: &Path,
    state: &mut DesiredState,
    filesystem: &F,
    options: ReconcileOptions,
) -> Result<ReconcileSummary, EngineError> {
    let mut summary = ReconcileSummary::default();
    scan_and_prune(base, "", state, filesystem, options, &mut summary)?;
    create_files(base, state, filesystem, options, &mut summary)?;
    debug!(
        kept = summary.entries_kept(),
        deleted = summary.entries_deleted(),
        created = summary.entries_created(),
        "reconciled runfiles tree"
    );
    Ok(summary)
}

fn scan_and_prune<F: Filesystem>(
    base: &Path,
    prefix: &str,
    state: &mut DesiredState,
    filesystem: &F,
    options: ReconcileOptions,
    summary: &mut ReconcileSummary,
) -> Result<(), EngineError> {
    let dir = if prefix.is_empty() {
        base.to_path_buf()
    } else {
        base.join(prefix)
    };
    filesystem
        .ensure_tree_perms(&dir)
        .map_err(|source| EngineError::Permissions {
            path: dir.clone(),
            source,
        })?;
    let children = filesystem
        .read_dir_sorted(&dir)
        .map_err(|source| EngineError::ReadDir {
            path: dir.clone(),
            source,
        })?;

    for child in children {
        if prefix.is_empty() && child.name.as_os_str() == OsStr::new(TRASH_DIR_NAME) {
            continue;
        }
        let path = dir.join(&child.name);

        // A name that is not UTF-8 cannot appear in a manifest, so the entry
        // is extraneous by construction.
        let Some(name) = child.name.to_str() else {
            debug!(path = %path.display(), "pruning entry with undecodable name");
            del_tree(base, &path, child.kind, filesystem)?;
            summary.record_deleted();
            continue;
        };
        let relative = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };

        let already_correct = match state.get(&relative) {
            None => false,
            Some(expected) => entry_matches(&path, child.kind, expected, filesystem, options)?,
        };

        if already_correct {
            state.remove(&relative);
            summary.record_kept();
            if child.kind == FileKind::Directory {
                scan_and_prune(base, &relative, state, filesystem, options, summary)?;
            }
        } else {
            debug!(path = %path.display(), kind = %child.kind, "pruning entry");
            del_tree(base, &path, child.kind, filesystem)?;
            summary.record_deleted();
        }
    }
    Ok(())
}

/// Decides whether an existing entry already satisfies its desired
/// counterpart.
///
/// Default mode compares kinds and verbatim link text. Windows-compatible
/// mode delegates link entries to the adapter's identity check, since the
/// materialized form (hardlink or junction) does not preserve the manifest's
/// target text.
fn entry_matches<F: Filesystem>(
    path: &Path,
    actual_kind: FileKind,
    expected: &FileInfo,
    filesystem: &F,
    options: ReconcileOptions,
) -> Result<bool, EngineError> {
    if options.windows_compatible_enabled() {
        return match expected.kind() {
            FileKind::Symlink => filesystem
                .link_matches(
                    path,
                    expected.link_target().unwrap_or_default(),
                    options.hardlink_policy(),
                )
                .map_err(|source| EngineError::Inspect {
                    path: path.to_path_buf(),
                    source,
                }),
            kind => Ok(kind == actual_kind),
        };
    }

    if expected.kind() != actual_kind {
        return Ok(false);
    }
    if actual_kind == FileKind::Symlink {
        let actual = filesystem
            .read_link(path)
            .map_err(|source| EngineError::ReadLink {
                path: path.to_path_buf(),
                source,
            })?;
        let expected_target = expected.link_target().unwrap_or_default();
        return Ok(actual.as_os_str() == OsStr::new(expected_target));
    }
    Ok(true)
}

/// Recursively deletes the entry at `path`.
///
/// Directories get their permissions repaired first so their contents can be
/// enumerated and removed. Symlinks are unlinked, never followed. When a
/// non-directory cannot be unlinked and the adapter offers the trash
/// fallback, the entry is moved aside instead.
fn del_tree<F: Filesystem>(
    base: &Path,
    path: &Path,
    kind: FileKind,
    filesystem: &F,
) -> Result<(), EngineError> {
    if kind != FileKind::Directory {
        return remove_entry(base, path, filesystem);
    }

    filesystem
        .ensure_tree_perms(path)
        .map_err(|source| EngineError::Permissions {
            path: path.to_path_buf(),
            source,
        })?;
    let children = filesystem
        .read_dir_sorted(path)
        .map_err(|source| EngineError::ReadDir {
            path: path.to_path_buf(),
            source,
        })?;
    for child in children {
        del_tree(base, &path.join(&child.name), child.kind, filesystem)?;
    }
    filesystem
        .remove_dir(path)
        .map_err(|source| EngineError::RemoveDir {
            path: path.to_path_buf(),
            source,
        })
}

fn remove_entry<F: Filesystem>(
    base: &Path,
    path: &Path,
    filesystem: &F,
) -> Result<(), EngineError> {
    match filesystem.unlink(path) {
        Ok(()) => Ok(()),
        Err(source) if filesystem.supports_trash() => {
            debug!(path = %path.display(), error = %source, "unlink refused, trying trash");
            filesystem
                .trash(base, path)
                .map_err(|source| EngineError::Trash {
                    path: path.to_path_buf(),
                    source,
                })
        }
        Err(source) => Err(EngineError::Unlink {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create_files<F: Filesystem>(
    base: &Path,
    state: &mut DesiredState,
    filesystem: &F,
    options: ReconcileOptions,
    summary: &mut ReconcileSummary,
) -> Result<(), EngineError> {
    for (relative, info) in state.drain() {
        let path = base.join(&relative);
        match info.kind() {
            FileKind::Directory => {
                filesystem
                    .make_dir(&path)
                    .map_err(|source| EngineError::CreateDir {
                        path: path.clone(),
                        source,
                    })?;
            }
            FileKind::Regular => {
                filesystem
                    .create_empty_file(&path)
                    .map_err(|source| EngineError::CreateFile {
                        path: path.clone(),
                        source,
                    })?;
            }
            FileKind::Symlink => {
                let target = info.link_target().unwrap_or_default();
                create_link(&path, target, filesystem, options)?;
            }
        }
        summary.record_created();
    }
    Ok(())
}

fn create_link<F: Filesystem>(
    path: &Path,
    target: &str,
    filesystem: &F,
    options: ReconcileOptions,
) -> Result<(), EngineError> {
    let algorithm = if options.windows_compatible_enabled() {
        let is_dir = filesystem
            .target_is_dir(target)
            .map_err(|source| EngineError::TargetStat {
                path: PathBuf::from(target),
                source,
            })?;
        if is_dir {
            LinkAlgorithm::Junction
        } else {
            LinkAlgorithm::Hardlink
        }
    } else {
        LinkAlgorithm::Symlink
    };

    debug!(path = %path.display(), target, ?algorithm, "creating link");
    let result = match algorithm {
        LinkAlgorithm::Symlink => filesystem.make_symlink(target, path),
        LinkAlgorithm::Hardlink => filesystem.make_hardlink(target, path),
        LinkAlgorithm::Junction => filesystem.make_junction(target, path),
    };
    result.map_err(|source| EngineError::Link {
        link: path.to_path_buf(),
        target: target.to_string(),
        source,
    })
}
