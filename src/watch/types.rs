/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }

    /// Whether this change should trigger a rebuild.
    ///
    /// A removed source has nothing left to compile.
    pub(super) fn triggers_rebuild(self) -> bool {
        !matches!(self, Self::Removed)
    }
}
