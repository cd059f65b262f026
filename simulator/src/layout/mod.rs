//! Seating layout modifiers
//!
//! A separation policy removes a fixed, position-dependent subset of seats
//! from use to increase physical distancing. Applying a policy marks that
//! subset `Unavailable` and leaves every other seat untouched, so existing
//! occupancy state survives the application. Application is idempotent.
//!
//! The policy must be re-applied after every full grid reset: `clear()`
//! drops the unavailable marking along with all other state.

use crate::models::grid::SeatingGrid;
use crate::models::seat::SeatState;
use serde::{Deserialize, Serialize};

/// Seat-separation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparationPolicy {
    /// All seats usable
    #[default]
    None,

    /// Checkerboard separation: seats where row and column share parity
    /// are removed, halving usable capacity
    Half,

    /// Extreme separation: even rows keep only columns divisible by 4,
    /// odd rows keep only columns ≡ 2 (mod 4), leaving a quarter of
    /// capacity usable
    Quarter,
}

impl SeparationPolicy {
    /// Whether this policy removes seat (row, col) from use
    pub fn removes(self, row: usize, col: usize) -> bool {
        match self {
            SeparationPolicy::None => false,
            SeparationPolicy::Half => {
                (col % 2 == 0 && row % 2 == 0) || (col % 2 == 1 && row % 2 == 1)
            }
            SeparationPolicy::Quarter => {
                if row % 2 == 0 {
                    col % 4 != 0
                } else {
                    col % 4 != 2
                }
            }
        }
    }

    /// Mark every seat this policy removes as `Unavailable`
    ///
    /// Other seats keep their current state. Applying twice yields the
    /// same grid as applying once.
    pub fn apply(self, grid: &mut SeatingGrid) {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                if self.removes(row, col) {
                    grid.set(row, col, SeatState::Unavailable);
                }
            }
        }
    }

    /// Number of usable seats in a rows × cols venue under this policy
    pub fn effective_capacity(self, rows: usize, cols: usize) -> usize {
        let mut capacity = 0;
        for row in 0..rows {
            for col in 0..cols {
                if !self.removes(row, col) {
                    capacity += 1;
                }
            }
        }
        capacity
    }
}
