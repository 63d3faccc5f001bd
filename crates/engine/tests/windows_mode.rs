//! Windows-compatible mode coverage.
//!
//! The mode changes two things: desired links materialize as hardlinks or
//! directory junctions instead of symlinks, and existing entries match by
//! identity instead of stored text. Junctions are emulated with directory
//! symlinks on POSIX hosts, so most of this runs against the real adapter;
//! the busy-file trash fallback is exercised through an injected adapter
//! that refuses unlinks the way a Windows kernel does for open files.

#![cfg(unix)]

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use runfiles_core::FileKind;
use runfiles_engine::{reconcile, ReconcileOptions, ReconcileSummary};
use runfiles_fsops::{
    DirEntryInfo, Filesystem, HardlinkCheck, LocalFilesystem, TRASH_DIR_NAME,
};
use runfiles_manifest::{DesiredState, FileInfo};

fn windows_options() -> ReconcileOptions {
    ReconcileOptions::new().windows_compatible(true)
}

fn state_with_link(name: &str, target: &Path) -> DesiredState {
    let mut state = DesiredState::new();
    state
        .insert(name, FileInfo::symlink(target.to_str().expect("utf8 target")))
        .expect("insert");
    state
}

fn run_windows(base: &Path, mut state: DesiredState) -> ReconcileSummary {
    let summary = reconcile(base, &mut state, &LocalFilesystem::new(), windows_options())
        .expect("reconcile succeeds");
    assert!(state.is_empty());
    summary
}

#[test]
fn file_target_becomes_a_hardlink() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("payload");
    fs::write(&target, b"data").expect("target");
    let base = temp.path().join("out");
    fs::create_dir(&base).expect("base");

    run_windows(&base, state_with_link("lnk", &target));

    let link_metadata = base.join("lnk").symlink_metadata().expect("lstat");
    assert!(link_metadata.file_type().is_file());
    let target_metadata = fs::metadata(&target).expect("stat target");
    assert_eq!(link_metadata.ino(), target_metadata.ino());
    assert_eq!(target_metadata.nlink(), 2);
}

#[test]
fn directory_target_becomes_a_junction() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("tree");
    fs::create_dir(&target).expect("target dir");
    let base = temp.path().join("out");
    fs::create_dir(&base).expect("base");

    run_windows(&base, state_with_link("dlink", &target));

    let metadata = base.join("dlink").symlink_metadata().expect("lstat");
    assert!(metadata.file_type().is_symlink());
    assert_eq!(fs::read_link(base.join("dlink")).expect("readlink"), target);
}

#[test]
fn rerun_keeps_existing_hardlinks() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("payload");
    fs::write(&target, b"data").expect("target");
    let base = temp.path().join("out");
    fs::create_dir(&base).expect("base");

    run_windows(&base, state_with_link("lnk", &target));
    let second = run_windows(&base, state_with_link("lnk", &target));

    assert_eq!(second.entries_kept(), 1);
    assert_eq!(second.entries_created(), 0);
    assert_eq!(fs::metadata(&target).expect("stat").nlink(), 2);
}

#[test]
fn rerun_keeps_existing_junctions() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("tree");
    fs::create_dir(&target).expect("target dir");
    let base = temp.path().join("out");
    fs::create_dir(&base).expect("base");

    run_windows(&base, state_with_link("dlink", &target));
    let second = run_windows(&base, state_with_link("dlink", &target));

    assert_eq!(second.entries_kept(), 1);
    assert_eq!(second.entries_deleted(), 0);
}

#[test]
fn hardlink_to_a_different_file_is_replaced() {
    let temp = tempfile::tempdir().expect("tempdir");
    let old_target = temp.path().join("old");
    let new_target = temp.path().join("new");
    fs::write(&old_target, b"old").expect("old target");
    fs::write(&new_target, b"new").expect("new target");
    let base = temp.path().join("out");
    fs::create_dir(&base).expect("base");

    run_windows(&base, state_with_link("lnk", &old_target));
    let second = run_windows(&base, state_with_link("lnk", &new_target));

    assert_eq!(second.entries_deleted(), 1);
    assert_eq!(second.entries_created(), 1);
    let link_metadata = fs::metadata(base.join("lnk")).expect("stat");
    assert_eq!(
        link_metadata.ino(),
        fs::metadata(&new_target).expect("stat new").ino()
    );
}

#[test]
fn both_hardlink_policies_accept_a_fresh_link() {
    for check in [HardlinkCheck::SameInode, HardlinkCheck::TargetName] {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("payload");
        fs::write(&target, b"data").expect("target");
        let base = temp.path().join("out");
        fs::create_dir(&base).expect("base");

        run_windows(&base, state_with_link("lnk", &target));

        let mut state = state_with_link("lnk", &target);
        let summary = reconcile(
            &base,
            &mut state,
            &LocalFilesystem::new(),
            windows_options().hardlink_check(check),
        )
        .expect("reconcile");
        assert_eq!(summary.entries_kept(), 1, "policy {check:?} keeps the link");
    }
}

#[test]
fn trash_directory_is_never_pruned() {
    let temp = tempfile::tempdir().expect("tempdir");
    let trash = temp.path().join(TRASH_DIR_NAME);
    fs::create_dir(&trash).expect("trash dir");
    fs::write(trash.join("123-999-0"), b"parked").expect("parked entry");

    let summary = run_windows(temp.path(), DesiredState::new());

    assert!(trash.join("123-999-0").is_file());
    assert_eq!(summary.entries_deleted(), 0);
}

/// Adapter that refuses to unlink a designated name, the way Windows does
/// for files something still holds open, while advertising the trash
/// fallback.
struct BusyFilesystem {
    inner: LocalFilesystem,
    busy_name: OsString,
}

impl BusyFilesystem {
    fn new(busy_name: &str) -> Self {
        Self {
            inner: LocalFilesystem::new(),
            busy_name: OsString::from(busy_name),
        }
    }
}

impl Filesystem for BusyFilesystem {
    fn entry_kind(&self, path: &Path) -> io::Result<FileKind> {
        self.inner.entry_kind(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<OsString> {
        self.inner.read_link(path)
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.ensure_dir(path)
    }

    fn make_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.make_dir(path)
    }

    fn ensure_tree_perms(&self, path: &Path) -> io::Result<()> {
        self.inner.ensure_tree_perms(path)
    }

    fn read_dir_sorted(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        self.inner.read_dir_sorted(path)
    }

    fn create_empty_file(&self, path: &Path) -> io::Result<()> {
        self.inner.create_empty_file(path)
    }

    fn make_symlink(&self, target: &str, link: &Path) -> io::Result<()> {
        self.inner.make_symlink(target, link)
    }

    fn make_hardlink(&self, target: &str, link: &Path) -> io::Result<()> {
        self.inner.make_hardlink(target, link)
    }

    fn make_junction(&self, target: &str, link: &Path) -> io::Result<()> {
        self.inner.make_junction(target, link)
    }

    fn target_is_dir(&self, target: &str) -> io::Result<bool> {
        self.inner.target_is_dir(target)
    }

    fn unlink(&self, path: &Path) -> io::Result<()> {
        if path.file_name() == Some(self.busy_name.as_os_str()) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "sharing violation",
            ));
        }
        self.inner.unlink(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.inner.rename(from, to)
    }

    fn link_matches(&self, path: &Path, target: &str, check: HardlinkCheck) -> io::Result<bool> {
        self.inner.link_matches(path, target, check)
    }

    fn supports_trash(&self) -> bool {
        true
    }

    fn trash(&self, base: &Path, path: &Path) -> io::Result<()> {
        self.inner.trash(base, path)
    }
}

#[test]
fn busy_entries_are_trashed_instead_of_failing() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("busy.dll"), b"loaded").expect("busy file");
    fs::write(temp.path().join("calm.txt"), b"junk").expect("calm file");

    let filesystem = BusyFilesystem::new("busy.dll");
    let mut state = DesiredState::new();
    let summary = reconcile(temp.path(), &mut state, &filesystem, windows_options())
        .expect("reconcile succeeds via trash");

    assert_eq!(summary.entries_deleted(), 2);
    assert!(!temp.path().join("busy.dll").exists());
    assert!(!temp.path().join("calm.txt").exists());

    let trash = temp.path().join(TRASH_DIR_NAME);
    let parked: Vec<_> = fs::read_dir(&trash)
        .expect("trash dir")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(parked.len(), 1);
    assert_ne!(parked[0].as_os_str(), OsStr::new("busy.dll"));
}
