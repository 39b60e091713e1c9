//! Undo history: a LIFO of grid snapshots.

use crate::engine::Grid;

/// Snapshots taken before each accepted move.
///
/// `Grid` is `Copy`, so every entry is an independent value and later
/// changes to the live grid never reach the stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<Grid>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a copy of `grid` on top.
    pub fn push(&mut self, grid: Grid) {
        self.stack.push(grid);
    }

    /// Remove and return the most recent snapshot, or `None` when empty.
    pub fn pop(&mut self) -> Option<Grid> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<&Grid> {
        self.stack.last()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Move;

    #[test]
    fn pop_on_empty_is_none() {
        let mut h = History::new();
        assert!(h.is_empty());
        assert_eq!(h.pop(), None);
        assert_eq!(h.len(), 0);
    }

    #[test]
    fn lifo_order() {
        let a = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let b = Grid::from_rows([[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut h = History::new();
        h.push(a);
        h.push(b);
        assert_eq!(h.len(), 2);
        assert_eq!(h.peek(), Some(&b));
        assert_eq!(h.pop(), Some(b));
        assert_eq!(h.pop(), Some(a));
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn snapshot_is_independent_of_live_grid() {
        let mut live = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = live;
        let mut h = History::new();
        h.push(live);
        live = live.shift(Move::Left).0;
        live.set(3, 3, 2);
        assert_ne!(live, before);
        assert_eq!(h.pop(), Some(before));
    }
}
