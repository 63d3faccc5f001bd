#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `runfiles_manifest` reads a textual runfiles manifest into the
//! [`DesiredState`] map the reconciler works from. Each manifest line names a
//! relative path and an optional link target; empty targets request empty
//! regular files, everything else requests a link. Parent directories are
//! synthesized implicitly so the reconciler never has to reason about missing
//! ancestors.
//!
//! While parsing, every raw input line (metadata lines included) is streamed
//! verbatim into a caller-provided archive writer. The driver points that
//! writer at `MANIFEST.tmp` inside the output base so the archived manifest is
//! byte-identical to the input once it is renamed into place.
//!
//! # Design
//!
//! - [`ManifestOptions`] configures the two parsing switches,
//!   `allow_relative` and `use_metadata`, as a const builder.
//! - [`parse_manifest`] drives the line loop against any
//!   [`BufRead`](std::io::BufRead) input and any [`Write`](std::io::Write)
//!   archive, keeping the parser fully testable in memory.
//! - [`DesiredState`] is an ordered map keyed by `/`-separated relative path.
//!   Lexicographic ordering over the keys guarantees that a directory sorts
//!   before everything beneath it, which the creation phase relies on.
//! - [`ManifestError`] carries the 1-indexed line number and the offending
//!   line text for every malformed input, matching the diagnostics of the
//!   upstream tool.
//!
//! # Invariants
//!
//! - For every inserted path `a/b/c`, the map also holds `a` and `a/b` as
//!   directories. Ancestor synthesis stops at the first ancestor already
//!   present, which is sound because a manifest that would demote a directory
//!   to a non-directory is rejected outright.
//! - Link targets are stored verbatim. No separator, case, or realpath
//!   normalization happens at parse time.
//! - The archive writer receives exactly the bytes read from the input, in
//!   order, regardless of which lines are semantic.
//!
//! # Examples
//!
//! ```
//! use runfiles_core::FileKind;
//! use runfiles_manifest::{parse_manifest, ManifestOptions};
//!
//! let input = b"pkg/data/hosts /etc/hosts\npkg/empty \n";
//! let mut archive = Vec::new();
//! let state = parse_manifest(&mut &input[..], &mut archive, ManifestOptions::default())?;
//!
//! assert_eq!(archive, input);
//! assert_eq!(state.get("pkg").map(|info| info.kind()), Some(FileKind::Directory));
//! assert_eq!(state.get("pkg/data/hosts").and_then(|info| info.link_target()), Some("/etc/hosts"));
//! assert_eq!(state.get("pkg/empty").map(|info| info.kind()), Some(FileKind::Regular));
//! # Ok::<(), runfiles_manifest::ManifestError>(())
//! ```

mod entry;
mod error;
mod parse;
mod state;

pub use entry::FileInfo;
pub use error::ManifestError;
pub use parse::{parse_manifest, ManifestOptions};
pub use state::{DesiredState, InsertConflict};
