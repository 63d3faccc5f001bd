#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `runfiles_core` holds the vocabulary shared by every layer of the
//! `build-runfiles` workspace: the logical [`FileKind`] classification used by
//! both the manifest parser and the filesystem adapter, the immutable
//! [`DiagnosticContext`] that prefixes every diagnostic line written to
//! standard error, and small path helpers used by the driver.
//!
//! # Design
//!
//! - [`FileKind`] is deliberately *logical*: a manifest entry classified as
//!   [`FileKind::Symlink`] may be realized on disk as a POSIX symlink, a hard
//!   link, or a directory junction depending on the operating mode. The
//!   reconciler owns that mapping; this crate only names the categories.
//! - [`DiagnosticContext`] replaces the mutable process-wide globals the
//!   upstream tool used for its error prefix. It is constructed once by the
//!   driver and borrowed wherever a failure needs to be rendered.
//! - Operating-system error codes are appended as `: <text> [<errno>]` by
//!   walking an error's source chain for the underlying [`io::Error`](std::io::Error),
//!   so error types never have to embed their own errno formatting.
//!
//! # Examples
//!
//! ```
//! use runfiles_core::DiagnosticContext;
//! use std::io;
//! use std::path::Path;
//!
//! let context = DiagnosticContext::new(
//!     "build-runfiles",
//!     Path::new("input.manifest"),
//!     Path::new("out/runfiles"),
//! );
//! let error = io::Error::from_raw_os_error(2);
//! let line = context.render(&error);
//! assert!(line.starts_with("build-runfiles (args input.manifest out/runfiles): "));
//! assert!(line.ends_with("[2]"));
//! ```

mod diag;
mod file_kind;
mod paths;

pub use diag::DiagnosticContext;
pub use file_kind::FileKind;
pub use paths::absolutize;
