use std::ffi::OsString;
use std::io;
use std::path::Path;

use runfiles_core::FileKind;

/// Equivalence semantics for deciding whether an existing hardlink already
/// satisfies a desired link entry.
///
/// The upstream check enumerated every name of the on-disk file and compared
/// each against the desired target, but never concluded a match; both
/// plausible readings of the intended semantics are exposed here so callers
/// choose explicitly.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum HardlinkCheck {
    /// The on-disk entry and the desired target resolve to the same
    /// device/inode pair. The weak reading, and the only one implementable on
    /// every host.
    #[default]
    SameInode,
    /// Additionally requires the desired target to resolve at its literal
    /// (normalized) name, i.e. the target is one of the file's names. On Unix
    /// this coincides with [`SameInode`](Self::SameInode): a successful `stat`
    /// of the target at the same inode *is* the target being one of the
    /// file's names.
    TargetName,
}

/// A directory child observed during traversal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirEntryInfo {
    /// The child's name within its directory.
    pub name: OsString,
    /// Classification of the child, without following links.
    pub kind: FileKind,
}

/// Narrow filesystem capability consumed by the reconciler.
///
/// Every operation either succeeds or fails with the underlying
/// [`io::Error`]; callers attach the operation and path context. Fake
/// implementations back the engine's windows-compatible test coverage on
/// hosts without native support.
pub trait Filesystem {
    /// Classifies the entry at `path` without following links.
    fn entry_kind(&self, path: &Path) -> io::Result<FileKind>;

    /// Reads a symlink's stored target, byte for byte.
    fn read_link(&self, path: &Path) -> io::Result<OsString>;

    /// Creates a directory if it does not already exist (0777 before umask).
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Creates a directory that must not already exist (0777 before umask).
    fn make_dir(&self, path: &Path) -> io::Result<()>;

    /// Ensures the directory at `path` carries owner read/write/execute
    /// bits, preserving every other permission bit.
    fn ensure_tree_perms(&self, path: &Path) -> io::Result<()>;

    /// Lists a directory's children with their kinds, sorted by name.
    /// `.` and `..` are never included.
    fn read_dir_sorted(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Exclusively creates an empty file with mode 0555. Pre-existence is an
    /// error.
    fn create_empty_file(&self, path: &Path) -> io::Result<()>;

    /// Creates a symlink at `link` whose stored text is `target`, verbatim.
    fn make_symlink(&self, target: &str, link: &Path) -> io::Result<()>;

    /// Creates a hard link at `link` to the file named by `target`.
    fn make_hardlink(&self, target: &str, link: &Path) -> io::Result<()>;

    /// Creates a directory junction at `link` redirecting to `target`.
    fn make_junction(&self, target: &str, link: &Path) -> io::Result<()>;

    /// Reports whether `target` names a directory, following links.
    fn target_is_dir(&self, target: &str) -> io::Result<bool>;

    /// Removes the non-directory entry at `path`.
    fn unlink(&self, path: &Path) -> io::Result<()>;

    /// Removes the empty directory at `path`.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Atomically renames `from` to `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Windows-family equivalence: reports whether the existing entry at
    /// `path` already satisfies a desired link to `target`.
    ///
    /// Junctions and directory links compare stored targets after separator
    /// normalization with a case-insensitive drive letter; hardlinks compare
    /// by identity per `check`.
    fn link_matches(&self, path: &Path, target: &str, check: HardlinkCheck) -> io::Result<bool>;

    /// Reports whether [`trash`](Self::trash) is available as an unlink
    /// fallback. When false, unlink failures are final.
    fn supports_trash(&self) -> bool {
        false
    }

    /// Moves `path` into the trash directory under `base` with a unique
    /// name, as a fallback for entries the kernel refuses to unlink.
    fn trash(&self, base: &Path, path: &Path) -> io::Result<()> {
        let _ = (base, path);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "trash fallback is not available on this platform",
        ))
    }
}
