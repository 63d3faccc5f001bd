#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `runfiles_fsops` isolates every filesystem primitive the reconciler needs
//! behind the [`Filesystem`] trait: lstat-based classification, raw link
//! reading, sorted directory listing, permission repair, exclusive file
//! creation, the three physical link flavors, deletion, rename, and the
//! link-equivalence queries whose semantics differ between the default and
//! windows-compatible operating modes.
//!
//! [`LocalFilesystem`] is the real implementation. Platform differences live
//! entirely inside it: junctions are realized as directory symlinks (the
//! upstream tool emulates them with `symlink(2)` as well), permission repair
//! is a no-op where POSIX modes do not exist, and the busy-file trash
//! fallback advertises itself only on hosts that need it.
//!
//! # Design
//!
//! - The reconciler consumes the trait, never the concrete type, so tests can
//!   inject fake adapters and exercise both operating modes on any host.
//! - Primitives return plain [`io::Result`](std::io::Result); the reconciler
//!   attaches the operation and path context when it wraps failures.
//! - Target strings are never rewritten on the way to the filesystem. The
//!   windows-family separator and drive-letter normalization is confined to
//!   the equivalence queries.
//!
//! # Examples
//!
//! ```
//! use runfiles_core::FileKind;
//! use runfiles_fsops::{Filesystem, LocalFilesystem};
//!
//! let temp = tempfile::tempdir()?;
//! let fs = LocalFilesystem::new();
//! let dir = temp.path().join("sub");
//! fs.ensure_dir(&dir)?;
//! fs.ensure_dir(&dir)?; // idempotent
//! assert_eq!(fs.entry_kind(&dir)?, FileKind::Directory);
//! # Ok::<(), std::io::Error>(())
//! ```

mod adapter;
mod local;
mod targets;

pub use adapter::{DirEntryInfo, Filesystem, HardlinkCheck};
pub use local::LocalFilesystem;
pub use targets::windows_targets_equal;

/// Name of the output-local directory busy files are moved into when they
/// cannot be unlinked directly.
pub const TRASH_DIR_NAME: &str = "bazel-trash";
