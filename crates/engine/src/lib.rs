#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `runfiles_engine` reconciles an output directory against a
//! [`DesiredState`](runfiles_manifest::DesiredState) in two phases:
//!
//! 1. **Scan and prune** walks the existing tree depth-first. Entries that
//!    already satisfy their desired counterpart are kept (and drained from
//!    the map); everything else — extraneous entries, kind mismatches, links
//!    with the wrong target — is deleted recursively.
//! 2. **Create** drains whatever remains of the map in lexicographic path
//!    order, which puts every directory before its children, and creates
//!    directories, empty regular files, and links.
//!
//! The physical realization of a desired link depends on the operating mode:
//! the default mode creates POSIX symlinks carrying the verbatim target
//! text, while windows-compatible mode stats the target and creates a
//! directory junction for directories and a hard link otherwise. The
//! matching rule follows the mode for the same reason: a tree built from
//! hardlinks would never converge under verbatim text comparison.
//!
//! # Design
//!
//! - All filesystem access goes through the
//!   [`Filesystem`](runfiles_fsops::Filesystem) capability so both operating
//!   modes are testable on any host.
//! - The walk never changes the process working directory; paths are joined
//!   onto the output base throughout.
//! - Failures abort the run with an [`EngineError`] naming the operation and
//!   path. There is no rollback: phase one is idempotent, so rerunning the
//!   tool recovers from any partial state.
//!
//! # Invariants
//!
//! - After a successful run the desired-state map is empty: every entry was
//!   either verified in place or created.
//! - The tool's own bookkeeping inside the output base (`bazel-trash/`) is
//!   never treated as extraneous.
//! - Deletion never follows symlinks; a link to a directory is unlinked, not
//!   recursed into.
//!
//! # Examples
//!
//! ```
//! use runfiles_engine::{reconcile, ReconcileOptions};
//! use runfiles_fsops::LocalFilesystem;
//! use runfiles_manifest::{parse_manifest, ManifestOptions};
//!
//! let temp = tempfile::tempdir()?;
//! let manifest = b"pkg/empty \n";
//! let mut archive = Vec::new();
//! let mut state = parse_manifest(&mut &manifest[..], &mut archive, ManifestOptions::default())?;
//!
//! let summary = reconcile(
//!     temp.path(),
//!     &mut state,
//!     &LocalFilesystem::new(),
//!     ReconcileOptions::default(),
//! )?;
//!
//! assert!(state.is_empty());
//! assert_eq!(summary.entries_created(), 2); // pkg/ and pkg/empty
//! assert!(temp.path().join("pkg/empty").is_file());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod options;
mod reconcile;
mod summary;

pub use error::EngineError;
pub use options::ReconcileOptions;
pub use reconcile::reconcile;
pub use summary::ReconcileSummary;
