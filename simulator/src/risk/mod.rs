//! Infection risk model
//!
//! Converts a seat's neighborhood exposure into an infection probability
//! using an exponential viral-dose curve (a Wells-Riley style heuristic),
//! applies the mitigation factors, and decides the seat's next state from
//! a uniform draw in [0, 100).
//!
//! # Critical Invariants
//!
//! 1. `Infected` and `NewlyInfected` are absorbing: the model returns them
//!    unchanged without consuming a random draw
//! 2. A seat with no infectious neighbors keeps its state without
//!    consuming a random draw
//! 3. Mitigation factors only ever scale risk down
//!
//! The draw-consumption rules matter for determinism: a checkpointed run
//! replays exactly because the number of draws per generation is a pure
//! function of the grid.

use crate::models::grid::SeatingGrid;
use crate::models::seat::SeatState;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Airborne dose emitted toward one neighbor seat per generation of
/// shared occupancy (quanta)
const DOSE_PER_NEIGHBOR_GENERATION: f64 = 20.0;

/// Probability that a single quantum of dose infects a susceptible person
const INFECTION_PROB_PER_QUANTUM: f64 = 0.0022;

/// Combined blocking/filtering efficiency of a standard mask (0.4 × 0.7)
const STANDARD_MASK_FACTOR: f64 = 0.28;

/// Transmission factor through an effective respirator
const RESPIRATOR_FACTOR: f64 = 0.01;

/// Chebyshev radius of the extended scan for seed-infected seats
const SCAN_RADIUS: isize = 4;

/// Ring indices below this value pass the transmission-range gate
const DISTANCE_GATE: usize = 5;

// ============================================================================
// Mitigation
// ============================================================================

/// Mask policy worn by every occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskPolicy {
    /// No face covering
    #[default]
    None,

    /// Standard surgical/cloth mask
    Standard,

    /// Effective, fitted respirator
    Respirator,
}

impl MaskPolicy {
    /// Multiplicative risk factor for this mask policy
    pub fn factor(self) -> f64 {
        match self {
            MaskPolicy::None => 1.0,
            MaskPolicy::Standard => STANDARD_MASK_FACTOR,
            MaskPolicy::Respirator => RESPIRATOR_FACTOR,
        }
    }
}

/// Errors from mitigation parameter construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RiskError {
    /// Ventilation levels run from 1 (baseline) to 4 (maximal airflow)
    #[error("ventilation level {0} outside supported range 1..=4")]
    VentilationOutOfRange(u8),
}

/// Venue ventilation level, range-checked to 1..=4
///
/// # Example
/// ```
/// use venue_contagion_core_rs::Ventilation;
///
/// let vent = Ventilation::new(3).unwrap();
/// assert_eq!(vent.level(), 3);
/// assert!(Ventilation::new(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Ventilation(u8);

impl Ventilation {
    /// Construct a range-checked ventilation level
    pub fn new(level: u8) -> Result<Self, RiskError> {
        if (1..=4).contains(&level) {
            Ok(Self(level))
        } else {
            Err(RiskError::VentilationOutOfRange(level))
        }
    }

    /// The configured level, 1..=4
    pub fn level(self) -> u8 {
        self.0
    }

    /// Multiplicative risk factor for this ventilation level
    pub fn factor(self) -> f64 {
        match self.0 {
            1 => 1.0,
            2 => 0.4,
            3 => 0.2,
            _ => 0.1,
        }
    }
}

impl Default for Ventilation {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Ventilation {
    type Error = RiskError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Ventilation::new(level)
    }
}

impl From<Ventilation> for u8 {
    fn from(vent: Ventilation) -> u8 {
        vent.level()
    }
}

/// Active mitigation measures, applied multiplicatively to raw risk
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mitigation {
    /// Mask policy for all occupants
    pub mask: MaskPolicy,

    /// Venue ventilation level
    pub ventilation: Ventilation,
}

impl Mitigation {
    /// Combined multiplicative risk factor, in (0, 1]
    pub fn factor(&self) -> f64 {
        self.mask.factor() * self.ventilation.factor()
    }
}

// ============================================================================
// Neighborhood scans
// ============================================================================

/// Infectious-neighbor counts for one seat's Moore neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborTally {
    /// Adjacent seats holding a seed-infected occupant
    pub infected: usize,

    /// Adjacent seats holding a newly infected occupant, plus adjacent
    /// unavailable seats that registered ambient exposure
    pub newly_infected: usize,
}

impl NeighborTally {
    /// No infectious neighbors at all
    pub fn is_empty(&self) -> bool {
        self.infected == 0 && self.newly_infected == 0
    }
}

/// Count infectious seats in the 8-connected neighborhood of (row, col)
///
/// Out-of-bounds neighbors are skipped; there is no wraparound.
pub fn tally_neighbors(grid: &SeatingGrid, row: usize, col: usize) -> NeighborTally {
    let mut tally = NeighborTally::default();
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            match grid.get_signed(row as isize + dr, col as isize + dc) {
                Some(SeatState::Infected) => tally.infected += 1,
                Some(SeatState::NewlyInfected) | Some(SeatState::UnavailableExposed) => {
                    tally.newly_infected += 1
                }
                _ => {}
            }
        }
    }
    tally
}

/// Largest ring index at which a seed-infected seat sits near (row, col)
///
/// Scans the 9×9 box around the seat (clipped to the grid, excluding the
/// center). A seat at Chebyshev distance d contributes ring index d, so the
/// outermost scanned ring yields 4 and immediate neighbors yield 1. Returns
/// 0 when no `Infected` seat is in range.
pub fn infected_ring_index(grid: &SeatingGrid, row: usize, col: usize) -> usize {
    let mut best = 0usize;
    for dr in -SCAN_RADIUS..=SCAN_RADIUS {
        for dc in -SCAN_RADIUS..=SCAN_RADIUS {
            if dr == 0 && dc == 0 {
                continue;
            }
            if grid.get_signed(row as isize + dr, col as isize + dc) == Some(SeatState::Infected) {
                let ring = dr.abs().max(dc.abs()) as usize;
                best = best.max(ring);
            }
        }
    }
    best
}

// ============================================================================
// Risk computation and transition
// ============================================================================

/// Probability, in percent, that a susceptible occupant becomes infectious
/// this generation
///
/// Seed-infected neighbors dominate: when any are adjacent, the dose is
/// 20 quanta per infected neighbor per generation of shared occupancy.
/// Otherwise newly infected neighbors contribute at half dose and the
/// resulting risk is halved again (people infected mid-run shed less).
/// Mitigation factors scale the result multiplicatively.
///
/// Returns 0 for an empty tally; callers with an empty tally should skip
/// sampling entirely (invariant 2 of the module docs).
pub fn infection_risk(tally: &NeighborTally, generation: usize, mitigation: &Mitigation) -> f64 {
    if tally.is_empty() {
        return 0.0;
    }

    let raw = if tally.infected > 0 {
        let dose = DOSE_PER_NEIGHBOR_GENERATION * generation as f64 * tally.infected as f64;
        (1.0 - (1.0 - INFECTION_PROB_PER_QUANTUM).powf(dose)) * 100.0
    } else {
        let dose =
            DOSE_PER_NEIGHBOR_GENERATION * generation as f64 * (tally.newly_infected as f64 / 2.0);
        (1.0 - (1.0 - INFECTION_PROB_PER_QUANTUM).powf(dose)) / 2.0 * 100.0
    };

    raw * mitigation.factor()
}

/// Next state of a seat given its neighborhood and a drawn variate
///
/// `draw` is the uniform [0, 100) variate; the seat flips when the draw
/// falls below the computed risk. Occupied seats additionally require a
/// seed-infected seat within transmission range: ring index 5 or more is a
/// hard cutoff, not a probability scaler. A ring index of 0 (no seed
/// infection inside the scan box) is clamped to 1 and therefore passes the
/// gate; changing that clamp alters spread dynamics at clipped grid edges,
/// so it stays.
pub fn next_state(
    current: SeatState,
    tally: &NeighborTally,
    ring_index: usize,
    generation: usize,
    mitigation: &Mitigation,
    draw: f64,
) -> SeatState {
    if current.is_infectious() {
        return current;
    }
    if tally.is_empty() {
        return current;
    }

    let risk = infection_risk(tally, generation, mitigation);

    if current.is_unavailable() {
        // Exposure sensor: registers ambient dose, never becomes an occupant
        // infection. Re-evaluated from scratch every generation.
        if draw < risk {
            SeatState::UnavailableExposed
        } else {
            SeatState::Unavailable
        }
    } else {
        let distance = ring_index.max(1);
        if draw < risk && distance < DISTANCE_GATE {
            SeatState::NewlyInfected
        } else {
            SeatState::Healthy
        }
    }
}

/// Sample the next state of a seat, drawing from `rng` only when the model
/// actually needs a variate
///
/// Absorbing seats and seats with no infectious neighbors return unchanged
/// without advancing the RNG, keeping replay deterministic.
pub fn sample_next_state(
    current: SeatState,
    tally: &NeighborTally,
    ring_index: usize,
    generation: usize,
    mitigation: &Mitigation,
    rng: &mut RngManager,
) -> SeatState {
    if current.is_infectious() || tally.is_empty() {
        return current;
    }
    let draw = rng.percent();
    next_state(current, tally, ring_index, generation, mitigation, draw)
}
