use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

/// Immutable context that prefixes every user-facing diagnostic.
///
/// The upstream tool stashed the program name and both positional arguments in
/// file-scope globals so its exit macros could produce a uniform prefix. The
/// same prefix is produced here from a value constructed once by the driver:
///
/// ```text
/// <argv0> (args <INPUT> <RUNFILES>): <message>[: <os error text> [<errno>]]
/// ```
#[derive(Clone, Debug)]
pub struct DiagnosticContext {
    program: String,
    input: PathBuf,
    output_base: PathBuf,
}

impl DiagnosticContext {
    /// Creates a context from the invoked program name and both positional
    /// arguments, exactly as they appeared on the command line.
    #[must_use]
    pub fn new(program: impl Into<String>, input: &Path, output_base: &Path) -> Self {
        Self {
            program: program.into(),
            input: input.to_path_buf(),
            output_base: output_base.to_path_buf(),
        }
    }

    /// Renders `error` as a full diagnostic line (without the trailing
    /// newline).
    ///
    /// When the error's source chain bottoms out in an operating-system
    /// failure, the OS error text and errno are appended in the
    /// `: <text> [<errno>]` form used by upstream.
    #[must_use]
    pub fn render(&self, error: &(dyn Error + 'static)) -> String {
        let mut line = format!(
            "{} (args {} {}): {}",
            self.program,
            self.input.display(),
            self.output_base.display(),
            error
        );
        if let Some((text, code)) = os_error_of(error) {
            line.push_str(": ");
            line.push_str(&text);
            line.push_str(&format!(" [{code}]"));
        }
        line
    }
}

/// Walks an error's source chain looking for an [`io::Error`] that carries a
/// raw operating-system code, returning its description and errno.
///
/// The description is the OS error text alone; the `(os error N)` suffix the
/// standard library appends is stripped because the errno is rendered
/// separately in brackets.
fn os_error_of(error: &(dyn Error + 'static)) -> Option<(String, i32)> {
    let mut current: Option<&(dyn Error + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<io::Error>() {
            if let Some(code) = io_error.raw_os_error() {
                return Some((strip_os_error_suffix(&io_error.to_string()), code));
            }
        }
        current = err.source();
    }
    None
}

fn strip_os_error_suffix(text: &str) -> String {
    match text.rfind(" (os error ") {
        Some(index) => text[..index].to_string(),
        None => text.to_string(),
    }
}
