use runfiles_core::FileKind;

/// Expected shape of a single runfiles tree entry.
///
/// Mirrors the pair the manifest encodes per line: a [`FileKind`] and, for
/// links only, the verbatim target text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileInfo {
    kind: FileKind,
    link_target: Option<String>,
}

impl FileInfo {
    /// An empty regular file entry.
    #[must_use]
    pub const fn regular() -> Self {
        Self {
            kind: FileKind::Regular,
            link_target: None,
        }
    }

    /// A directory entry, explicit or synthesized.
    #[must_use]
    pub const fn directory() -> Self {
        Self {
            kind: FileKind::Directory,
            link_target: None,
        }
    }

    /// A link entry pointing at `target`, stored verbatim.
    #[must_use]
    pub fn symlink(target: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Symlink,
            link_target: Some(target.into()),
        }
    }

    /// Returns the logical kind of the entry.
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        self.kind
    }

    /// Returns the stored link target for [`FileKind::Symlink`] entries.
    #[must_use]
    pub fn link_target(&self) -> Option<&str> {
        self.link_target.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::FileInfo;
    use runfiles_core::FileKind;

    #[test]
    fn constructors_set_expected_kinds() {
        assert_eq!(FileInfo::regular().kind(), FileKind::Regular);
        assert_eq!(FileInfo::directory().kind(), FileKind::Directory);
        assert_eq!(FileInfo::symlink("/etc/hosts").kind(), FileKind::Symlink);
    }

    #[test]
    fn only_symlinks_carry_targets() {
        assert_eq!(FileInfo::regular().link_target(), None);
        assert_eq!(FileInfo::directory().link_target(), None);
        assert_eq!(
            FileInfo::symlink("/etc/hosts").link_target(),
            Some("/etc/hosts")
        );
    }

    #[test]
    fn targets_are_stored_verbatim() {
        let info = FileInfo::symlink("C:/Windows\\System32");
        assert_eq!(info.link_target(), Some("C:/Windows\\System32"));
    }
}
