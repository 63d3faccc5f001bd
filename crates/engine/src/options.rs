use runfiles_fsops::HardlinkCheck;

/// Operating-mode switches for [`reconcile`](crate::reconcile).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileOptions {
    windows_compatible: bool,
    hardlink_check: HardlinkCheck,
}

impl ReconcileOptions {
    /// Creates the default configuration: POSIX symlinks, verbatim target
    /// matching.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            windows_compatible: false,
            hardlink_check: HardlinkCheck::SameInode,
        }
    }

    /// Selects windows-compatible link materialization.
    ///
    /// Desired links become directory junctions (directory targets) or hard
    /// links (everything else) instead of symlinks, and existing entries are
    /// matched by identity rather than by stored target text.
    #[must_use]
    pub const fn windows_compatible(mut self, enabled: bool) -> Self {
        self.windows_compatible = enabled;
        self
    }

    /// Chooses the hardlink equivalence semantics used in
    /// windows-compatible mode.
    #[must_use]
    pub const fn hardlink_check(mut self, check: HardlinkCheck) -> Self {
        self.hardlink_check = check;
        self
    }

    /// Reports whether windows-compatible materialization is selected.
    #[must_use]
    pub const fn windows_compatible_enabled(&self) -> bool {
        self.windows_compatible
    }

    /// Returns the configured hardlink equivalence semantics.
    #[must_use]
    pub const fn hardlink_policy(&self) -> HardlinkCheck {
        self.hardlink_check
    }
}
