//! Linear undo/redo over whole-grid snapshots.

use std::collections::VecDeque;

use dental_planner_core::Grid;

/// Two unbounded stacks of grid snapshots.
///
/// Snapshots are cheap because [`Grid`] clones share every untouched tile.
#[derive(Clone, Debug, Default)]
pub struct History {
    past: Vec<Grid>,
    future: VecDeque<Grid>,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the grid as it stood before a logical edit and forgets every
    /// undone snapshot.
    pub fn record_before_edit(&mut self, current: &Grid) {
        self.past.push(current.clone());
        self.future.clear();
    }

    /// Steps back one edit, returning the grid to install.
    ///
    /// Returns `None` and leaves both stacks untouched when there is nothing
    /// to undo.
    pub fn undo(&mut self, current: &Grid) -> Option<Grid> {
        let previous = self.past.pop()?;
        self.future.push_front(current.clone());
        Some(previous)
    }

    /// Re-applies the most recently undone edit, returning the grid to install.
    pub fn redo(&mut self, current: &Grid) -> Option<Grid> {
        let next = self.future.pop_front()?;
        self.past.push(current.clone());
        Some(next)
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Reports whether an undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Reports whether a redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of snapshots available to undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of snapshots available to redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_planner_core::{CellCoord, RoomType};

    fn edited(grid: &Grid, column: u32) -> Grid {
        let mut next = grid.clone();
        next.tile_mut(CellCoord::new(column, 0))
            .expect("cell inside grid")
            .room_type = RoomType::Storage;
        next
    }

    #[test]
    fn undo_and_redo_are_no_ops_when_empty() {
        let mut history = History::new();
        let grid = Grid::new(3);
        assert_eq!(history.undo(&grid), None);
        assert_eq!(history.redo(&grid), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut history = History::new();
        let original = Grid::new(3);
        history.record_before_edit(&original);
        let after = edited(&original, 0);

        let restored = history.undo(&after).expect("one edit recorded");
        assert_eq!(restored, original);
        assert_eq!(history.redo(&restored), Some(after));
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn new_edit_after_undo_clears_future() {
        let mut history = History::new();
        let original = Grid::new(3);
        history.record_before_edit(&original);
        let first = edited(&original, 0);
        let restored = history.undo(&first).expect("one edit recorded");
        assert!(history.can_redo());

        history.record_before_edit(&restored);
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn clear_drops_both_stacks() {
        let mut history = History::new();
        let grid = Grid::new(2);
        history.record_before_edit(&grid);
        let _ = history.undo(&edited(&grid, 1));
        history.record_before_edit(&grid);
        history.clear();
        assert_eq!((history.undo_depth(), history.redo_depth()), (0, 0));
    }
}
