use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure raised while reconciling the output tree.
///
/// Each variant names the filesystem operation and the path it was applied
/// to, in the phrasing of the upstream tool's diagnostics. The underlying
/// [`io::Error`] is preserved as the source so the driver can append the
/// OS error text and errno.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Repairing directory permissions failed.
    #[error("chmod '{path}'")]
    Permissions {
        /// Directory whose permissions could not be repaired.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Reading a directory's contents failed.
    #[error("reading directory '{path}'")]
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Inspecting an existing entry failed.
    #[error("lstating file '{path}'")]
    Inspect {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Reading an existing symlink's target failed.
    #[error("reading symlink '{path}'")]
    ReadLink {
        /// Symlink whose target could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Removing a non-directory entry failed.
    #[error("unlinking '{path}'")]
    Unlink {
        /// Entry that could not be removed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// The busy-file trash fallback failed as well.
    #[error("moving '{path}' to trash")]
    Trash {
        /// Entry that could not be trashed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Removing an emptied directory failed.
    #[error("rmdir '{path}'")]
    RemoveDir {
        /// Directory that could not be removed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Creating a directory failed (including unexpected pre-existence).
    #[error("mkdir '{path}'")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Creating an empty regular file failed (including unexpected
    /// pre-existence, which indicates a pruning bug).
    #[error("creating empty file '{path}'")]
    CreateFile {
        /// File that could not be created.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Stating a link target to select the physical link flavor failed.
    #[error("stating file '{path}'")]
    TargetStat {
        /// Target path that could not be stated.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },

    /// Creating a link failed.
    #[error("symlinking '{link}' -> '{target}'")]
    Link {
        /// Link path that could not be created.
        link: PathBuf,
        /// Target the link was meant to carry.
        target: String,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}
