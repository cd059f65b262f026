//! Checkpoint - Save/Load Simulation State
//!
//! Enables serialization and deserialization of engine state for
//! pause/resume.
//!
//! # Critical Invariants
//!
//! - **Determinism**: restoring a snapshot and stepping produces exactly
//!   the generations the original engine would have produced
//! - **Config Matching**: a snapshot can only be restored under the
//!   configuration it was taken with (verified by hash)
//! - **Cell Integrity**: the cell dump must match the recorded dimensions
//!   and decode to known seat states

use crate::core::clock::GenerationClock;
use crate::models::grid::SeatingGrid;
use crate::orchestrator::engine::{Simulation, SimulationConfig, SimulationError};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structure
// ============================================================================

/// Complete engine state snapshot
///
/// Captures everything needed to resume a run mid-flight. The event log is
/// not checkpointed; a restored engine starts a fresh log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Generation the next `step()` call will execute (1-based)
    pub generation: usize,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// Grid row count
    pub rows: usize,

    /// Grid column count
    pub cols: usize,

    /// Flat row-major wire codes for every seat
    pub cells: Vec<i8>,

    /// SHA-256 hash of the originating config (for validation)
    pub config_hash: String,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA-256 hash of a config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on map iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::Serialization(format!("config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for a canonical representation.
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical_value = canonicalize(value);

    let json = serde_json::to_string(&canonical_value).map_err(|e| {
        SimulationError::Serialization(format!("config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(format!("{:x}", result))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Checks dimensional consistency and that every cell code decodes to a
/// known seat state.
pub fn validate_snapshot(snapshot: &StateSnapshot) -> Result<(), SimulationError> {
    if snapshot.rows == 0 || snapshot.cols == 0 {
        return Err(SimulationError::StateValidation(
            "snapshot grid dimensions must be positive".to_string(),
        ));
    }

    if snapshot.generation == 0 {
        return Err(SimulationError::StateValidation(
            "snapshot generation counter must be 1-based".to_string(),
        ));
    }

    if snapshot.cells.len() != snapshot.rows * snapshot.cols {
        return Err(SimulationError::StateValidation(format!(
            "snapshot has {} cells for a {}x{} grid",
            snapshot.cells.len(),
            snapshot.rows,
            snapshot.cols
        )));
    }

    if let Some(&bad) = snapshot
        .cells
        .iter()
        .find(|&&c| crate::models::seat::SeatState::from_code(c).is_none())
    {
        return Err(SimulationError::StateValidation(format!(
            "snapshot contains unknown seat code {}",
            bad
        )));
    }

    Ok(())
}

// ============================================================================
// Engine integration
// ============================================================================

impl Simulation {
    /// Capture the engine state for later restore
    pub fn save_snapshot(&self) -> Result<StateSnapshot, SimulationError> {
        Ok(StateSnapshot {
            generation: self.current_generation(),
            rng_state: self.rng_state(),
            rows: self.grid().rows(),
            cols: self.grid().cols(),
            cells: self.grid().codes(),
            config_hash: compute_config_hash(self.config())?,
        })
    }

    /// Rebuild an engine from a snapshot taken under `config`
    ///
    /// Fails if the snapshot was taken under a different configuration,
    /// or if its contents do not pass integrity validation. The restored
    /// engine continues the original draw sequence exactly.
    pub fn restore(
        config: SimulationConfig,
        snapshot: &StateSnapshot,
    ) -> Result<Simulation, SimulationError> {
        Simulation::validate_config(&config)?;

        let expected_hash = compute_config_hash(&config)?;
        if expected_hash != snapshot.config_hash {
            return Err(SimulationError::SnapshotMismatch);
        }

        validate_snapshot(snapshot)?;

        if snapshot.rows != config.rows || snapshot.cols != config.cols {
            return Err(SimulationError::StateValidation(format!(
                "snapshot dimensions {}x{} do not match config {}x{}",
                snapshot.rows, snapshot.cols, config.rows, config.cols
            )));
        }

        if snapshot.generation > config.generations + 1 {
            return Err(SimulationError::StateValidation(format!(
                "snapshot generation {} beyond configured run of {}",
                snapshot.generation, config.generations
            )));
        }

        let grid = SeatingGrid::from_codes(snapshot.rows, snapshot.cols, &snapshot.cells)
            .ok_or_else(|| {
                SimulationError::StateValidation("snapshot cells failed to decode".to_string())
            })?;

        let clock = GenerationClock::resume(snapshot.generation, config.generations);
        let rng = RngManager::new(snapshot.rng_state);

        Ok(Simulation::from_restored(config, grid, clock, rng))
    }
}
