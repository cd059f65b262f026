//! Seating grid
//!
//! An owned rows × cols array of [`SeatState`] in row-major order. The
//! engine holds two of these (current and next generation) and swaps them
//! by value; there is no in-place mutation during a generation.
//!
//! # Critical Invariants
//!
//! 1. Dimensions are fixed for the lifetime of the grid
//! 2. `clear()` resets every cell to `Healthy`; the separation mask must be
//!    re-applied afterwards (resets drop the unavailable marking)

use crate::models::seat::SeatState;
use serde::{Deserialize, Serialize};

/// Fixed-size 2D seat-state array
///
/// # Example
///
/// ```rust
/// use venue_contagion_core_rs::{SeatState, SeatingGrid};
///
/// let mut grid = SeatingGrid::new(10, 20);
/// assert_eq!(grid.capacity(), 200);
///
/// grid.set(0, 0, SeatState::Infected);
/// assert_eq!(grid.get(0, 0), SeatState::Infected);
/// assert_eq!(grid.count(SeatState::Infected), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingGrid {
    rows: usize,
    cols: usize,
    /// Row-major cell storage, `rows * cols` entries
    cells: Vec<SeatState>,
}

impl SeatingGrid {
    /// Create a grid with every seat `Healthy`
    ///
    /// # Panics
    /// Panics if either dimension is zero (rejected earlier by config
    /// validation when constructed through the engine).
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be positive");
        Self {
            rows,
            cols,
            cells: vec![SeatState::Healthy; rows * cols],
        }
    }

    /// Rebuild a grid from wire codes, `None` if any code is unknown or
    /// the cell count does not match the dimensions
    pub fn from_codes(rows: usize, cols: usize, codes: &[i8]) -> Option<Self> {
        if rows == 0 || cols == 0 || codes.len() != rows * cols {
            return None;
        }
        let cells = codes
            .iter()
            .map(|&c| SeatState::from_code(c))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { rows, cols, cells })
    }

    /// Number of seat rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of seat columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of seats (before any separation policy)
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Get the state of seat (row, col)
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> SeatState {
        assert!(row < self.rows && col < self.cols, "seat out of bounds");
        self.cells[row * self.cols + col]
    }

    /// Get the state of a seat addressed with signed offsets
    ///
    /// Returns `None` out of bounds. Neighborhood scans use this so that
    /// edge seats simply see fewer neighbors (no wraparound).
    pub fn get_signed(&self, row: isize, col: isize) -> Option<SeatState> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Set the state of seat (row, col)
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, state: SeatState) {
        assert!(row < self.rows && col < self.cols, "seat out of bounds");
        self.cells[row * self.cols + col] = state;
    }

    /// Reset every seat to `Healthy`
    ///
    /// Callers must re-apply the separation policy afterwards; the reset
    /// clears the unavailable marking along with everything else.
    pub fn clear(&mut self) {
        self.cells.fill(SeatState::Healthy);
    }

    /// Count seats currently in `state`
    pub fn count(&self, state: SeatState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Iterate over all seats as (row, col, state)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, SeatState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &state)| (i / self.cols, i % self.cols, state))
    }

    /// Flat row-major wire codes (checkpoint encoding)
    pub fn codes(&self) -> Vec<i8> {
        self.cells.iter().map(|c| c.code()).collect()
    }

    /// Rectangular wire-code dump for the presentation layer
    pub fn to_codes(&self) -> Vec<Vec<i8>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.get(r, c).code()).collect())
            .collect()
    }
}
