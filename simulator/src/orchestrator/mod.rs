//! Simulation orchestration
//!
//! The engine owns the current/next grid pair, the generation clock, and
//! the RNG, and advances the whole venue one generation at a time. The
//! checkpoint module serializes engine state for pause/resume.

pub mod checkpoint;
pub mod engine;

pub use checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
pub use engine::{
    GenerationResult, RunReport, Simulation, SimulationConfig, SimulationError,
};
