#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `runfiles_cli` is the thin command-line frontend for `build-runfiles`. It
//! recognises the three mode switches (`--allow_relative`, `--use_metadata`,
//! `--windows_compatible`) and the two positional arguments `INPUT` and
//! `RUNFILES`, then drives the parse → prune → create → commit sequence
//! against the output base.
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function accepts
//! an iterator of arguments together with handles for standard output and
//! error, so binaries and tests share the same parsing and dispatch logic
//! and nothing in the library ever touches the real process streams or exits
//! on its own. [`exit_code_from`] converts the returned status into a
//! [`std::process::ExitCode`] for `main`.
//!
//! # Invariants
//!
//! - `run` never panics; every failure surfaces as a non-zero status with a
//!   diagnostic on the error handle.
//! - Diagnostics carry the uniform
//!   `<argv0> (args <INPUT> <RUNFILES>): <message>` prefix, with the OS
//!   error text and errno appended when a syscall failed.
//! - The archived manifest at `RUNFILES/MANIFEST` is only ever replaced via
//!   an atomic rename; observers see the old content or the new content,
//!   never a torn write.
//!
//! # Examples
//!
//! ```
//! use runfiles_cli::run;
//!
//! let temp = tempfile::tempdir().unwrap();
//! let manifest = temp.path().join("input.manifest");
//! std::fs::write(&manifest, b"").unwrap();
//! let base = temp.path().join("runfiles");
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = run(
//!     ["build-runfiles", manifest.to_str().unwrap(), base.to_str().unwrap()],
//!     &mut stdout,
//!     &mut stderr,
//! );
//!
//! assert_eq!(status, 0);
//! assert!(base.join("MANIFEST").is_file());
//! ```

mod command;
mod driver;

pub use driver::{ARCHIVE_NAME, ARCHIVE_TMP_NAME};

use std::ffi::OsString;
use std::io::Write;

use runfiles_core::DiagnosticContext;

use crate::driver::{execute, ParsedArgs};

/// Parses `arguments` (including the program name) and performs the
/// reconciliation, writing diagnostics to `stderr`.
///
/// Returns the process status: `0` on success, `1` for argument, parse, and
/// filesystem failures. Help and version requests render to `stdout` and
/// succeed.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let arguments: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    let program = arguments
        .first()
        .map_or_else(|| "build-runfiles".to_string(), |arg| arg.to_string_lossy().into_owned());

    let matches = match command::clap_command().try_get_matches_from(&arguments) {
        Ok(matches) => matches,
        Err(error) => {
            return match error.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    let _ = write!(stdout, "{error}");
                    0
                }
                _ => {
                    let _ = write!(stderr, "{error}");
                    1
                }
            };
        }
    };
    let args = ParsedArgs::from_matches(&matches);

    let context = DiagnosticContext::new(program, &args.input, &args.runfiles);
    match execute(&args) {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(stderr, "{}", context.render(&error));
            1
        }
    }
}

/// Converts a status returned by [`run`] into a process exit code, clamping
/// out-of-range values.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = u8::try_from(status.clamp(0, i32::from(u8::MAX))).unwrap_or(u8::MAX);
    std::process::ExitCode::from(clamped)
}
