//! Linear undo/redo history of grid snapshots.
//!
//! Snapshots are copied in on commit and never handed out mutably, so edits
//! to the live grid cannot reach back into history. Committing after an undo
//! drops every snapshot past the current position.

use thiserror::Error;

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Undo at the oldest snapshot, or redo at the newest.
    #[error("cannot {action}: at position {index} of {len} in history")]
    OutOfRange { action: &'static str, index: usize, len: usize },
}

/// Ordered grid snapshots plus the index of the current one.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Grid>,
    index: usize,
    max_entries: Option<usize>,
}

impl History {
    /// Start a history holding only `initial`.
    pub fn new(initial: Grid) -> Self {
        Self::with_limit(initial, None)
    }

    /// Like [`History::new`], keeping at most `max_entries` snapshots (oldest dropped first).
    pub fn with_limit(initial: Grid, max_entries: Option<usize>) -> Self {
        Self { snapshots: vec![initial], index: 0, max_entries: max_entries.map(|m| m.max(1)) }
    }

    /// Throw away all snapshots and start over from `grid`.
    pub fn reset(&mut self, grid: Grid) {
        self.snapshots.clear();
        self.snapshots.push(grid);
        self.index = 0;
    }

    /// Record a copy of `grid` as the newest snapshot.
    pub fn commit(&mut self, grid: &Grid) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(grid.clone());

        if let Some(max) = self.max_entries {
            let excess = self.snapshots.len().saturating_sub(max);
            if excess > 0 {
                self.snapshots.drain(..excess);
            }
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot and return it.
    pub fn undo(&mut self) -> Result<&Grid, HistoryError> {
        if !self.can_undo() {
            return Err(self.out_of_range("undo"));
        }
        self.index -= 1;
        Ok(&self.snapshots[self.index])
    }

    /// Step forward one snapshot and return it.
    pub fn redo(&mut self) -> Result<&Grid, HistoryError> {
        if !self.can_redo() {
            return Err(self.out_of_range("redo"));
        }
        self.index += 1;
        Ok(&self.snapshots[self.index])
    }

    fn out_of_range(&self, action: &'static str) -> HistoryError {
        HistoryError::OutOfRange { action, index: self.index, len: self.snapshots.len() }
    }

    pub fn current(&self) -> &Grid {
        &self.snapshots[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn snapshots(&self) -> &[Grid] {
        &self.snapshots
    }
}
