//! Stack of board snapshots backing undo.

use unblock_jam_core::Level;

/// Prior board snapshots, most recent last.
#[derive(Clone, Debug, Default)]
pub(crate) struct MoveHistory {
    snapshots: Vec<Level>,
}

impl MoveHistory {
    /// Creates an empty history.
    pub(crate) fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    /// Stores the snapshot that preceded an accepted move.
    pub(crate) fn record(&mut self, previous: Level) {
        self.snapshots.push(previous);
    }

    /// Removes and returns the most recent snapshot.
    pub(crate) fn pop(&mut self) -> Option<Level> {
        self.snapshots.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
