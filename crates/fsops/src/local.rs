use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use runfiles_core::FileKind;
use tracing::debug;

use crate::adapter::{DirEntryInfo, Filesystem, HardlinkCheck};
use crate::targets::windows_targets_equal;
use crate::TRASH_DIR_NAME;

const TRASH_ATTEMPTS: u32 = 3;

/// The real [`Filesystem`] implementation backed by the host OS.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn classify(file_type: fs::FileType) -> FileKind {
    if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_symlink() {
        FileKind::Symlink
    } else {
        FileKind::Regular
    }
}

impl Filesystem for LocalFilesystem {
    fn entry_kind(&self, path: &Path) -> io::Result<FileKind> {
        fs::symlink_metadata(path).map(|metadata| classify(metadata.file_type()))
    }

    fn read_link(&self, path: &Path) -> io::Result<OsString> {
        fs::read_link(path).map(|target| target.into_os_string())
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        match fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(error) => Err(error),
        }
    }

    fn make_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    #[cfg(unix)]
    fn ensure_tree_perms(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        const REQUIRED: u32 = 0o700;
        const ALL_PERMS: u32 = 0o7777;

        let metadata = fs::symlink_metadata(path)?;
        let mode = metadata.permissions().mode();
        if mode & REQUIRED != REQUIRED {
            let new_mode = (mode | REQUIRED) & ALL_PERMS;
            debug!(path = %path.display(), new_mode, "repairing directory permissions");
            rustix::fs::chmod(path, rustix::fs::Mode::from_bits_truncate(new_mode))
                .map_err(io::Error::from)?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn ensure_tree_perms(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn read_dir_sorted(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // DirEntry::file_type falls back to an lstat when the directory
            // stream cannot classify the entry itself.
            let kind = classify(entry.file_type()?);
            entries.push(DirEntryInfo {
                name: entry.file_name(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn create_empty_file(&self, path: &Path) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o555);
        }
        options.open(path).map(|_| ())
    }

    #[cfg(unix)]
    fn make_symlink(&self, target: &str, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    fn make_symlink(&self, target: &str, link: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_file(target, link)
    }

    fn make_hardlink(&self, target: &str, link: &Path) -> io::Result<()> {
        fs::hard_link(target, link)
    }

    #[cfg(unix)]
    fn make_junction(&self, target: &str, link: &Path) -> io::Result<()> {
        // Junctions only exist on NTFS; POSIX hosts emulate them with a
        // directory-targeted symlink, as upstream does.
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    fn make_junction(&self, target: &str, link: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_dir(target, link)
    }

    fn target_is_dir(&self, target: &str) -> io::Result<bool> {
        fs::metadata(target).map(|metadata| metadata.is_dir())
    }

    fn unlink(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn link_matches(&self, path: &Path, target: &str, check: HardlinkCheck) -> io::Result<bool> {
        let metadata = fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            // Directory junctions (and their POSIX emulation) carry the
            // target as stored text.
            let actual = fs::read_link(path)?;
            return Ok(windows_targets_equal(actual.as_os_str(), target));
        }
        if file_type.is_dir() {
            return Ok(false);
        }
        hardlink_matches(&metadata, target, check)
    }

    #[cfg(windows)]
    fn supports_trash(&self) -> bool {
        true
    }

    fn trash(&self, base: &Path, path: &Path) -> io::Result<()> {
        let trash_dir = base.join(TRASH_DIR_NAME);
        self.ensure_dir(&trash_dir)?;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let pid = std::process::id();
        for attempt in 0..TRASH_ATTEMPTS {
            let candidate = trash_dir.join(format!("{millis}-{pid}-{attempt}"));
            match fs::rename(path, &candidate) {
                Ok(()) => {
                    debug!(path = %path.display(), trash = %candidate.display(), "trashed busy entry");
                    return Ok(());
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(error) => return Err(error),
            }
        }
        Err(io::Error::other(format!(
            "trash name collision after {TRASH_ATTEMPTS} attempts for '{}'",
            path.display()
        )))
    }
}

/// Identity check for an existing non-directory entry against a desired
/// hardlink target.
///
/// On Unix both [`HardlinkCheck`] policies reduce to device/inode equality:
/// when `stat(target)` succeeds and reports the same inode as the entry, the
/// target is by definition one of the file's names. A missing or
/// non-regular target means the entry is stale.
#[cfg(unix)]
fn hardlink_matches(
    metadata: &fs::Metadata,
    target: &str,
    check: HardlinkCheck,
) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let target_metadata = match fs::metadata(target) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(error),
    };
    if !target_metadata.is_file() {
        return Ok(false);
    }
    let same = metadata.dev() == target_metadata.dev() && metadata.ino() == target_metadata.ino();
    Ok(match check {
        HardlinkCheck::SameInode | HardlinkCheck::TargetName => same,
    })
}

/// Native Windows would need `FindFirstFileNameW` to enumerate hardlink
/// names; without it, existing hardlinks are reported stale and recreated,
/// which matches the upstream check (it never concludes a match either).
#[cfg(not(unix))]
fn hardlink_matches(
    _metadata: &fs::Metadata,
    _target: &str,
    _check: HardlinkCheck,
) -> io::Result<bool> {
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> LocalFilesystem {
        LocalFilesystem::new()
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("sub");
        adapter().ensure_dir(&dir).expect("create");
        adapter().ensure_dir(&dir).expect("recreate");
        assert!(dir.is_dir());
    }

    #[test]
    fn read_dir_sorted_orders_by_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("b.txt"), b"").expect("b");
        fs::write(temp.path().join("a.txt"), b"").expect("a");
        fs::create_dir(temp.path().join("c")).expect("c");

        let entries = adapter().read_dir_sorted(temp.path()).expect("read dir");
        let names: Vec<&OsString> = entries.iter().map(|entry| &entry.name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
        assert_eq!(entries[2].kind, FileKind::Directory);
        assert_eq!(entries[0].kind, FileKind::Regular);
    }

    #[test]
    fn create_empty_file_refuses_to_overwrite() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("touched");
        adapter().create_empty_file(&path).expect("create");
        let error = adapter()
            .create_empty_file(&path)
            .expect_err("exclusive create");
        assert_eq!(error.kind(), io::ErrorKind::AlreadyExists);
    }

    #[cfg(unix)]
    #[test]
    fn create_empty_file_uses_restricted_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("touched");
        adapter().create_empty_file(&path).expect("create");
        let mode = fs::metadata(&path).expect("stat").permissions().mode();
        assert_eq!(mode & 0o777, 0o555);
    }

    #[cfg(unix)]
    #[test]
    fn ensure_tree_perms_adds_owner_bits_and_keeps_others() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("locked");
        fs::create_dir(&dir).expect("create");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o570)).expect("lock down");

        adapter().ensure_tree_perms(&dir).expect("repair");
        let mode = fs::metadata(&dir).expect("stat").permissions().mode();
        assert_eq!(mode & 0o700, 0o700);
        assert_eq!(mode & 0o070, 0o070);
    }

    #[cfg(unix)]
    #[test]
    fn entry_kind_does_not_follow_symlinks() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("real");
        fs::create_dir(&dir).expect("create dir");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&dir, &link).expect("symlink");

        assert_eq!(adapter().entry_kind(&link).expect("kind"), FileKind::Symlink);
        assert_eq!(adapter().entry_kind(&dir).expect("kind"), FileKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn link_matches_accepts_a_hardlink_to_the_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("target");
        fs::write(&target, b"payload").expect("target");
        let link = temp.path().join("link");
        fs::hard_link(&target, &link).expect("hardlink");

        let target_text = target.to_str().expect("utf8");
        for check in [HardlinkCheck::SameInode, HardlinkCheck::TargetName] {
            assert!(adapter()
                .link_matches(&link, target_text, check)
                .expect("match"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn link_matches_rejects_an_unrelated_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("target");
        fs::write(&target, b"payload").expect("target");
        let other = temp.path().join("other");
        fs::write(&other, b"payload").expect("other");

        let target_text = target.to_str().expect("utf8");
        assert!(!adapter()
            .link_matches(&other, target_text, HardlinkCheck::SameInode)
            .expect("no match"));
    }

    #[cfg(unix)]
    #[test]
    fn link_matches_rejects_a_missing_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let entry = temp.path().join("entry");
        fs::write(&entry, b"payload").expect("entry");

        assert!(!adapter()
            .link_matches(&entry, "/definitely/not/here", HardlinkCheck::SameInode)
            .expect("no match"));
    }

    #[cfg(unix)]
    #[test]
    fn link_matches_compares_junction_text_with_normalization() {
        let temp = tempfile::tempdir().expect("tempdir");
        let link = temp.path().join("jlink");
        std::os::unix::fs::symlink("C:/Windows", &link).expect("symlink");

        assert!(adapter()
            .link_matches(&link, "C:\\Windows", HardlinkCheck::SameInode)
            .expect("junction match"));
        assert!(!adapter()
            .link_matches(&link, "C:\\Windows\\System32", HardlinkCheck::SameInode)
            .expect("junction mismatch"));
    }

    #[test]
    fn trash_moves_entries_into_the_trash_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let victim = temp.path().join("victim");
        fs::write(&victim, b"payload").expect("victim");

        adapter().trash(temp.path(), &victim).expect("trash");
        assert!(!victim.exists());

        let trash_dir = temp.path().join(TRASH_DIR_NAME);
        let children = fs::read_dir(&trash_dir).expect("trash dir").count();
        assert_eq!(children, 1);
    }
}
