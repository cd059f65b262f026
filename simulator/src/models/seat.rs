//! Seat state model
//!
//! Each grid cell holds one `SeatState`. The infection lifecycle is
//! monotonic: `Infected` and `NewlyInfected` are absorbing, a seat never
//! reverts to `Healthy` once infectious. The unavailable pair is the one
//! reversible edge: an unavailable seat is an exposure sensor, not an
//! occupant, and is re-evaluated every generation.
//!
//! States carry stable i8 wire codes for the grid dumps consumed by the
//! presentation layer.

use serde::{Deserialize, Serialize};

/// State of a single seat in the venue grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatState {
    /// Seat removed from use by the active separation policy
    Unavailable,

    /// Unavailable seat whose position has accumulated enough airborne
    /// dose to register as exposed (bookkeeping only, never an occupant)
    UnavailableExposed,

    /// Occupied by a susceptible person
    Healthy,

    /// Occupied by a person infectious from the start of the run
    Infected,

    /// Occupied by a person who became infectious during the run
    NewlyInfected,
}

impl SeatState {
    /// Stable wire code for grid dumps
    ///
    /// `Unavailable = -1`, `UnavailableExposed = -2`, `Healthy = 0`,
    /// `Infected = 1`, `NewlyInfected = 2`.
    pub const fn code(self) -> i8 {
        match self {
            SeatState::Unavailable => -1,
            SeatState::UnavailableExposed => -2,
            SeatState::Healthy => 0,
            SeatState::Infected => 1,
            SeatState::NewlyInfected => 2,
        }
    }

    /// Decode a wire code, `None` for unknown codes
    pub fn from_code(code: i8) -> Option<SeatState> {
        match code {
            -1 => Some(SeatState::Unavailable),
            -2 => Some(SeatState::UnavailableExposed),
            0 => Some(SeatState::Healthy),
            1 => Some(SeatState::Infected),
            2 => Some(SeatState::NewlyInfected),
            _ => None,
        }
    }

    /// Seat holds an infectious occupant (absorbing states)
    pub const fn is_infectious(self) -> bool {
        matches!(self, SeatState::Infected | SeatState::NewlyInfected)
    }

    /// Seat is removed from use by the separation policy
    pub const fn is_unavailable(self) -> bool {
        matches!(self, SeatState::Unavailable | SeatState::UnavailableExposed)
    }

    /// Seat holds a person
    pub const fn is_occupied(self) -> bool {
        !self.is_unavailable()
    }
}

impl Default for SeatState {
    fn default() -> Self {
        SeatState::Healthy
    }
}
