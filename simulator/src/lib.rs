//! Venue Contagion Simulator Core - Rust Engine
//!
//! Discrete-time, discrete-space stochastic simulation of airborne disease
//! transmission among the seated occupants of a fixed-capacity venue.
//!
//! # Architecture
//!
//! - **core**: generation time management
//! - **models**: domain types (seat states, seating grid, event log)
//! - **layout**: seat-separation policies (checkerboard masks)
//! - **risk**: dose-response infection model and neighborhood scans
//! - **orchestrator**: generation loop, run driver, checkpointing
//! - **rng**: deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Grid updates are synchronous: every seat reads the pre-generation
//!    grid and writes a disjoint cell of the next grid
//! 2. All randomness is deterministic (seeded RNG); seats that do not
//!    sample do not consume draws
//! 3. `Infected` and `NewlyInfected` are absorbing for the whole run

// Module declarations
pub mod core;
pub mod layout;
pub mod models;
pub mod orchestrator;
pub mod risk;
pub mod rng;

// Re-exports for convenience
pub use crate::core::clock::GenerationClock;
pub use layout::SeparationPolicy;
pub use models::{
    event::{Event, EventLog},
    grid::SeatingGrid,
    seat::SeatState,
};
pub use orchestrator::{
    compute_config_hash, validate_snapshot, GenerationResult, RunReport, Simulation,
    SimulationConfig, SimulationError, StateSnapshot,
};
pub use risk::{
    infected_ring_index, infection_risk, next_state, sample_next_state, tally_neighbors,
    MaskPolicy, Mitigation, NeighborTally, RiskError, Ventilation,
};
pub use rng::RngManager;
