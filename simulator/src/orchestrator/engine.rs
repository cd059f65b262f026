//! Simulation engine
//!
//! Main generation loop integrating all components:
//! - Seat seeding (rejection-sampled placement of initial infections)
//! - Neighborhood scans (Moore tally + extended ring scan)
//! - Risk evaluation (dose-response model with mitigation factors)
//! - Event logging (complete run history)
//!
//! # Architecture
//!
//! Each generation runs as a synchronous cellular update:
//!
//! ```text
//! For each generation g:
//! 1. For every seat in raster order, read the CURRENT grid:
//!    a. Tally infectious Moore neighbors
//!    b. If the tally is empty, carry the seat forward (unavailable
//!       seats fall back to the re-stamped separation mask)
//!    c. Otherwise scan for the infected ring index and sample the
//!       risk model, writing the outcome to the NEXT grid
//! 2. Swap grids; clear and re-stamp the scratch buffer
//! 3. Record summary counts and advance the clock
//! ```
//!
//! No seat ever observes a partially updated generation: reads go to the
//! pre-generation grid only, writes to the next grid only.
//!
//! # Example
//!
//! ```rust
//! use venue_contagion_core_rs::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     rng_seed: 12345,
//!     ..SimulationConfig::default()
//! };
//!
//! let mut sim = Simulation::new(config).unwrap();
//! let report = sim.run();
//! assert_eq!(report.generations.len(), 20);
//! ```

use crate::core::clock::GenerationClock;
use crate::layout::SeparationPolicy;
use crate::models::event::{Event, EventLog};
use crate::models::grid::SeatingGrid;
use crate::models::seat::SeatState;
use crate::risk::{self, MaskPolicy, Mitigation, Ventilation};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Configuration
// ============================================================================

/// Complete simulation configuration
///
/// Immutable for the run; the engine takes it by value at construction and
/// never mutates it. The upstream configuration layer is responsible for
/// parsing and range checks (ventilation is already a validated type); the
/// engine re-validates the structural preconditions it depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of seat rows in the venue
    pub rows: usize,

    /// Number of seat columns in the venue
    pub cols: usize,

    /// Seats seeded `Infected` before the first generation
    pub initial_infected: usize,

    /// Seat-separation policy reducing usable capacity
    pub separation: SeparationPolicy,

    /// Mask policy worn by all occupants
    pub mask: MaskPolicy,

    /// Venue ventilation level (1..=4)
    pub ventilation: Ventilation,

    /// Number of generations the run executes
    pub generations: usize,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 20,
            initial_infected: 10,
            separation: SeparationPolicy::None,
            mask: MaskPolicy::None,
            ventilation: Ventilation::default(),
            generations: 20,
            rng_seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Usable seats after the separation policy removes its subset
    pub fn effective_capacity(&self) -> usize {
        self.separation.effective_capacity(self.rows, self.cols)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Summary of a single generation
///
/// Exposed once per generation to the presentation layer: the full grid as
/// integer-coded states plus the scalar spread counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generation number (1-based)
    pub generation: usize,

    /// Seats in `Infected` state after this generation
    pub infected: usize,

    /// Seats in `NewlyInfected` state after this generation
    pub newly_infected: usize,

    /// Unavailable seats currently registering ambient exposure
    pub exposed_unavailable: usize,

    /// Rectangular wire-code dump of the grid after this generation
    pub seat_codes: Vec<Vec<i8>>,
}

/// Complete run output: one result per executed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier for this run
    pub run_id: Uuid,

    /// Per-generation summaries in execution order
    pub generations: Vec<GenerationResult>,

    /// Seed-infected seats at the end of the run
    pub final_infected: usize,

    /// Seats infected during the run, at the end of the run
    pub final_newly_infected: usize,
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// More seed infections requested than the separation policy leaves
    /// seats for; surfaced before any generation runs
    #[error("initial infected count {infected} exceeds effective capacity {capacity}")]
    CapacityExceeded { capacity: usize, infected: usize },

    /// Snapshot integrity violation
    #[error("state validation failed: {0}")]
    StateValidation(String),

    /// Snapshot was taken under a different configuration
    #[error("snapshot config hash does not match active config")]
    SnapshotMismatch,

    /// Serialization failure while hashing or snapshotting
    #[error("serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Simulation
// ============================================================================

/// Main engine owning all run state
///
/// # Determinism
///
/// All randomness flows through the seeded xorshift64* RNG; absorbing and
/// neighbor-free seats never consume a draw. Same seed + same config ⇒
/// identical per-generation results.
#[derive(Debug)]
pub struct Simulation {
    /// Immutable run configuration
    config: SimulationConfig,

    /// Current-generation grid (reads)
    grid: SeatingGrid,

    /// Next-generation scratch grid (writes), kept cleared and re-stamped
    /// with the separation mask between generations
    next: SeatingGrid,

    /// Generation counter, 1-based
    clock: GenerationClock,

    /// Deterministic RNG
    rng: RngManager,

    /// Audit log of seedings, infections, and generation summaries
    event_log: EventLog,

    /// Unique identifier for this run
    run_id: Uuid,
}

impl Simulation {
    /// Create a new simulation from configuration
    ///
    /// Validates the configuration, stamps the separation mask, and seeds
    /// the initial infections by drawing uniform seats and retrying on
    /// anything not currently `Healthy`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use venue_contagion_core_rs::{SeatState, Simulation, SimulationConfig};
    ///
    /// let sim = Simulation::new(SimulationConfig::default()).unwrap();
    /// assert_eq!(sim.grid().count(SeatState::Infected), 10);
    /// ```
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let mut grid = SeatingGrid::new(config.rows, config.cols);
        config.separation.apply(&mut grid);

        // The scratch buffer starts from the same stamped-empty layout.
        let next = grid.clone();

        let mut rng = RngManager::new(config.rng_seed);
        let mut event_log = EventLog::new();

        // Rejection-sampled seeding: terminates because validation
        // guarantees at least `initial_infected` healthy seats exist.
        let mut remaining = config.initial_infected;
        while remaining > 0 {
            let row = rng.range(0, config.rows);
            let col = rng.range(0, config.cols);
            if grid.get(row, col) == SeatState::Healthy {
                grid.set(row, col, SeatState::Infected);
                event_log.log(Event::SeedPlaced {
                    generation: 0,
                    row,
                    col,
                });
                remaining -= 1;
            }
        }

        let clock = GenerationClock::new(config.generations);

        Ok(Self {
            config,
            grid,
            next,
            clock,
            rng,
            event_log,
            run_id: Uuid::new_v4(),
        })
    }

    /// Validate configuration
    pub(crate) fn validate_config(config: &SimulationConfig) -> Result<(), SimulationError> {
        if config.rows == 0 || config.cols == 0 {
            return Err(SimulationError::InvalidConfig(
                "grid dimensions must be positive".to_string(),
            ));
        }

        if config.generations == 0 {
            return Err(SimulationError::InvalidConfig(
                "generations must be > 0".to_string(),
            ));
        }

        if config.initial_infected == 0 {
            return Err(SimulationError::InvalidConfig(
                "initial infected count must be > 0".to_string(),
            ));
        }

        let capacity = config.effective_capacity();
        if config.initial_infected > capacity {
            return Err(SimulationError::CapacityExceeded {
                capacity,
                infected: config.initial_infected,
            });
        }

        Ok(())
    }

    /// Rebuild an engine from checkpointed parts (restore path)
    pub(crate) fn from_restored(
        config: SimulationConfig,
        grid: SeatingGrid,
        clock: GenerationClock,
        rng: RngManager,
    ) -> Self {
        let mut next = SeatingGrid::new(config.rows, config.cols);
        config.separation.apply(&mut next);

        Self {
            config,
            grid,
            next,
            clock,
            rng,
            event_log: EventLog::new(),
            run_id: Uuid::new_v4(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the run configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the current-generation grid
    pub fn grid(&self) -> &SeatingGrid {
        &self.grid
    }

    /// Get the current generation number (1-based; the generation the
    /// next `step()` call will execute)
    pub fn current_generation(&self) -> usize {
        self.clock.current_generation()
    }

    /// Whether every configured generation has run
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    /// Get the event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Get the RNG state (checkpointing)
    pub(crate) fn rng_state(&self) -> u64 {
        self.rng.state()
    }

    /// Get this run's unique identifier
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    // ========================================================================
    // Generation Loop
    // ========================================================================

    /// Execute one generation transition
    ///
    /// Reads only the pre-generation grid and writes only the scratch
    /// grid, then promotes the scratch grid wholesale, so the update is
    /// synchronous even though the scan is a sequential raster pass.
    pub fn step(&mut self) -> GenerationResult {
        let generation = self.clock.current_generation();
        let mitigation = Mitigation {
            mask: self.config.mask,
            ventilation: self.config.ventilation,
        };

        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let current = self.grid.get(row, col);
                let tally = risk::tally_neighbors(&self.grid, row, col);

                let next = if tally.is_empty() {
                    // Neighbor-free unavailable seats fall back to the
                    // plain mask; any prior exposure mark expires here.
                    if current.is_unavailable() {
                        SeatState::Unavailable
                    } else {
                        current
                    }
                } else {
                    let ring = risk::infected_ring_index(&self.grid, row, col);
                    risk::sample_next_state(
                        current,
                        &tally,
                        ring,
                        generation,
                        &mitigation,
                        &mut self.rng,
                    )
                };

                if current == SeatState::Healthy && next == SeatState::NewlyInfected {
                    self.event_log.log(Event::SeatInfected {
                        generation,
                        row,
                        col,
                    });
                } else if current == SeatState::Unavailable
                    && next == SeatState::UnavailableExposed
                {
                    self.event_log.log(Event::ExposureRegistered {
                        generation,
                        row,
                        col,
                    });
                }

                self.next.set(row, col, next);
            }
        }

        // Promote the computed generation, then clear and re-stamp the
        // scratch buffer so the unavailable mask never drifts seat by seat.
        std::mem::swap(&mut self.grid, &mut self.next);
        self.next.clear();
        self.config.separation.apply(&mut self.next);

        let infected = self.grid.count(SeatState::Infected);
        let newly_infected = self.grid.count(SeatState::NewlyInfected);
        let exposed_unavailable = self.grid.count(SeatState::UnavailableExposed);

        self.event_log.log(Event::GenerationCompleted {
            generation,
            infected,
            newly_infected,
            exposed_unavailable,
        });

        self.clock.advance();

        GenerationResult {
            generation,
            infected,
            newly_infected,
            exposed_unavailable,
            seat_codes: self.grid.to_codes(),
        }
    }

    /// Run every remaining generation and collect the report
    ///
    /// # Example
    ///
    /// ```rust
    /// use venue_contagion_core_rs::{Simulation, SimulationConfig};
    ///
    /// let mut sim = Simulation::new(SimulationConfig {
    ///     generations: 5,
    ///     ..SimulationConfig::default()
    /// })
    /// .unwrap();
    ///
    /// let report = sim.run();
    /// assert_eq!(report.generations.len(), 5);
    /// assert!(sim.is_finished());
    /// ```
    pub fn run(&mut self) -> RunReport {
        let mut generations = Vec::with_capacity(self.clock.total_generations());
        while !self.clock.is_finished() {
            generations.push(self.step());
        }

        RunReport {
            run_id: self.run_id,
            generations,
            final_infected: self.grid.count(SeatState::Infected),
            final_newly_infected: self.grid.count(SeatState::NewlyInfected),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> SimulationConfig {
        SimulationConfig {
            rng_seed: 12345,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(create_test_config()).unwrap();

        assert_eq!(sim.current_generation(), 1);
        assert!(!sim.is_finished());
        assert_eq!(sim.grid().count(SeatState::Infected), 10);
        assert_eq!(sim.grid().count(SeatState::NewlyInfected), 0);
        // One SeedPlaced event per seed infection.
        assert_eq!(sim.event_log().len(), 10);
    }

    #[test]
    fn test_seeds_avoid_unavailable_seats() {
        let config = SimulationConfig {
            separation: SeparationPolicy::Half,
            ..create_test_config()
        };
        let sim = Simulation::new(config).unwrap();

        for (row, col, state) in sim.grid().iter() {
            if state == SeatState::Infected {
                assert!(
                    !SeparationPolicy::Half.removes(row, col),
                    "seed landed on removed seat ({}, {})",
                    row,
                    col
                );
            }
        }
    }

    #[test]
    fn test_validate_config_zero_generations() {
        let config = SimulationConfig {
            generations: 0,
            ..create_test_config()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_config_zero_infected() {
        let config = SimulationConfig {
            initial_infected: 0,
            ..create_test_config()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_config_zero_dimensions() {
        let config = SimulationConfig {
            rows: 0,
            ..create_test_config()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_capacity_exceeded_fails_fast() {
        let config = SimulationConfig {
            separation: SeparationPolicy::Half,
            initial_infected: 150,
            ..create_test_config()
        };
        assert_eq!(
            Simulation::new(config).unwrap_err(),
            SimulationError::CapacityExceeded {
                capacity: 100,
                infected: 150,
            }
        );
    }

    #[test]
    fn test_step_advances_clock() {
        let mut sim = Simulation::new(create_test_config()).unwrap();
        let result = sim.step();

        assert_eq!(result.generation, 1);
        assert_eq!(sim.current_generation(), 2);
    }

    #[test]
    fn test_step_result_counts_match_grid() {
        let mut sim = Simulation::new(create_test_config()).unwrap();
        let result = sim.step();

        assert_eq!(result.infected, sim.grid().count(SeatState::Infected));
        assert_eq!(
            result.newly_infected,
            sim.grid().count(SeatState::NewlyInfected)
        );
        assert_eq!(result.seat_codes.len(), 10);
        assert_eq!(result.seat_codes[0].len(), 20);
    }

    #[test]
    fn test_seed_count_is_stable_across_run() {
        let mut sim = Simulation::new(create_test_config()).unwrap();
        let report = sim.run();

        for result in &report.generations {
            assert_eq!(result.infected, 10, "seed infections are absorbing");
        }
        assert_eq!(report.final_infected, 10);
    }

    #[test]
    fn test_run_is_deterministic_for_same_seed() {
        let mut a = Simulation::new(create_test_config()).unwrap();
        let mut b = Simulation::new(create_test_config()).unwrap();

        assert_eq!(a.run().generations, b.run().generations);
    }
}
