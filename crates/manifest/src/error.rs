use std::io;

use thiserror::Error;

/// Error raised while reading or interpreting a runfiles manifest.
///
/// Every malformed-line variant records the 1-indexed line number and the
/// offending text (without its newline), reproducing the diagnostics of the
/// upstream tool.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The line was empty or not terminated by a newline.
    #[error("missing terminator at line {line}: '{text}'")]
    MissingTerminator {
        /// 1-indexed line number.
        line: usize,
        /// Offending line text.
        text: String,
    },

    /// The relative path began with `/`.
    #[error("paths must not be absolute: line {line}: '{text}'")]
    AbsolutePath {
        /// 1-indexed line number.
        line: usize,
        /// Offending line text.
        text: String,
    },

    /// The line contained no space separating the path from its target.
    #[error("missing field delimiter at line {line}: '{text}'")]
    MissingDelimiter {
        /// 1-indexed line number.
        line: usize,
        /// Offending line text.
        text: String,
    },

    /// The line contained more than one space.
    #[error("link or target filename contains space on line {line}: '{text}'")]
    SpaceInFilename {
        /// 1-indexed line number.
        line: usize,
        /// Offending line text.
        text: String,
    },

    /// A relative target was supplied without `allow_relative`.
    #[error("expected absolute path at line {line}: '{text}'")]
    ExpectedAbsolute {
        /// 1-indexed line number.
        line: usize,
        /// Offending line text.
        text: String,
    },

    /// The relative path before the delimiter was empty.
    #[error("empty link path at line {line}: '{text}'")]
    EmptyLink {
        /// 1-indexed line number.
        line: usize,
        /// Offending line text.
        text: String,
    },

    /// A semantic line was not valid UTF-8.
    #[error("invalid UTF-8 at line {line}")]
    InvalidUtf8 {
        /// 1-indexed line number.
        line: usize,
    },

    /// The line names a path that earlier lines established as a directory.
    #[error("'{path}' would no longer be a directory: line {line}: '{text}'")]
    DirectoryConflict {
        /// 1-indexed line number.
        line: usize,
        /// Path that earlier lines made a directory.
        path: String,
        /// Offending line text.
        text: String,
    },

    /// The line requires an ancestor that earlier lines established as a
    /// non-directory.
    #[error("ancestor '{path}' is not a directory: line {line}: '{text}'")]
    NonDirectoryAncestor {
        /// 1-indexed line number.
        line: usize,
        /// Ancestor path that is not a directory.
        path: String,
        /// Offending line text.
        text: String,
    },

    /// Reading from the manifest input failed.
    #[error("reading manifest input")]
    Read {
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Copying a line into the archive stream failed.
    #[error("copying manifest to archive")]
    Archive {
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

impl ManifestError {
    /// Returns the 1-indexed manifest line the error refers to, when the
    /// failure is tied to a specific line.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::MissingTerminator { line, .. }
            | Self::AbsolutePath { line, .. }
            | Self::MissingDelimiter { line, .. }
            | Self::SpaceInFilename { line, .. }
            | Self::ExpectedAbsolute { line, .. }
            | Self::EmptyLink { line, .. }
            | Self::InvalidUtf8 { line }
            | Self::DirectoryConflict { line, .. }
            | Self::NonDirectoryAncestor { line, .. } => Some(*line),
            Self::Read { .. } | Self::Archive { .. } => None,
        }
    }
}
