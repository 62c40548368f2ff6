//! Flat per-state tables.
//!
//! Every agent table is a dense `NUM_STATES × width` buffer. A cell lives at
//! `state.index() * width + column`, where the column is an own action
//! (`width = 5`), a joint action `5 * own + opponent` (`width = 25`) or `0` for
//! scalar tables.

use crate::environment::{Action, State, NUM_ACTIONS, NUM_STATES};

/// Column of the joint action `(own, opponent)` in a joint-indexed table.
pub fn joint_index(action: Action, opponent_action: Action) -> usize {
    NUM_ACTIONS * action.index() + opponent_action.index()
}

/// Dense table of `width` values per state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    width: usize,
    cells: Vec<f64>,
}

impl ValueTable {
    /// Allocates a table with every cell set to `init`.
    pub fn new(width: usize, init: f64) -> Self {
        Self {
            width,
            cells: vec![init; NUM_STATES * width],
        }
    }

    /// Number of columns per state.
    pub fn width(&self) -> usize {
        self.width
    }

    fn offset(&self, state: State, column: usize) -> usize {
        assert!(
            column < self.width,
            "column {} out of range for table of width {}",
            column,
            self.width
        );
        state.index() * self.width + column
    }

    /// All columns for `state`.
    pub fn row(&self, state: State) -> &[f64] {
        let start = state.index() * self.width;
        &self.cells[start..start + self.width]
    }

    /// Reads one cell.
    pub fn get(&self, state: State, column: usize) -> f64 {
        self.cells[self.offset(state, column)]
    }

    /// Writes one cell.
    pub fn set(&mut self, state: State, column: usize, value: f64) {
        let offset = self.offset(state, column);
        self.cells[offset] = value;
    }

    /// Overwrites all columns for `state`.
    pub fn set_row(&mut self, state: State, values: &[f64]) {
        assert_eq!(values.len(), self.width, "row length must match table width");
        let start = state.index() * self.width;
        self.cells[start..start + self.width].copy_from_slice(values);
    }

    /// Largest value stored for `state`.
    pub fn row_max(&self, state: State) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(a: usize, b: usize, p: usize) -> State {
        State::from_indices(a, b, p).unwrap()
    }

    #[test]
    fn new_table_is_filled() {
        let table = ValueTable::new(25, 1.0);
        assert_eq!(table.width(), 25);
        assert!(table.row(state(2, 1, 0)).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn rows_do_not_overlap() {
        let mut table = ValueTable::new(5, 0.0);
        let s = state(2, 1, 0);
        let t = state(2, 1, 1);
        table.set_row(s, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(table.get(s, 4), 5.0);
        assert!(table.row(t).iter().all(|&v| v == 0.0));
        assert_eq!(table.row_max(s), 5.0);
    }

    #[test]
    fn joint_index_is_row_major() {
        assert_eq!(joint_index(Action::North, Action::North), 0);
        assert_eq!(joint_index(Action::South, Action::Stick), 9);
        assert_eq!(joint_index(Action::Stick, Action::East), 22);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn column_overflow_fails_fast() {
        let table = ValueTable::new(5, 0.0);
        table.get(state(0, 1, 0), 5);
    }
}
