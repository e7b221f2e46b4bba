//! Header tracking state machine.

use crate::ast::Declaration;

/// Whether a traversal is still inside the file header.
///
/// Starts in [`HeaderState::CollectingHeader`] and moves to
/// [`HeaderState::PastHeader`] on the first non-comment declaration. The
/// transition is irreversible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderState {
    /// Only comments have been seen so far.
    #[default]
    CollectingHeader,
    /// A non-comment declaration has been seen.
    PastHeader,
}

impl HeaderState {
    /// Returns the state after observing `declaration`.
    #[must_use]
    pub fn advance(self, declaration: &Declaration) -> Self {
        match (self, declaration) {
            (Self::CollectingHeader, Declaration::Comment(_)) => Self::CollectingHeader,
            _ => Self::PastHeader,
        }
    }

    /// Returns true while only comments have been seen.
    #[must_use]
    pub fn is_collecting(self) -> bool {
        self == Self::CollectingHeader
    }
}
