/// Counters describing what a reconciliation run did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileSummary {
    kept: u64,
    deleted: u64,
    created: u64,
}

impl ReconcileSummary {
    /// Number of existing entries that already matched and were kept.
    #[must_use]
    pub const fn entries_kept(&self) -> u64 {
        self.kept
    }

    /// Number of entries pruned from the output tree. Each recursive
    /// deletion of a directory counts once.
    #[must_use]
    pub const fn entries_deleted(&self) -> u64 {
        self.deleted
    }

    /// Number of entries created during the second phase.
    #[must_use]
    pub const fn entries_created(&self) -> u64 {
        self.created
    }

    pub(crate) fn record_kept(&mut self) {
        self.kept = self.kept.saturating_add(1);
    }

    pub(crate) fn record_deleted(&mut self) {
        self.deleted = self.deleted.saturating_add(1);
    }

    pub(crate) fn record_created(&mut self) {
        self.created = self.created.saturating_add(1);
    }
}
