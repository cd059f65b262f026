//! Event logging for simulation replay and auditing.
//!
//! This module defines the Event enum which captures the significant state
//! changes during a run. Events enable:
//! - Debugging (which seat flipped, and when)
//! - Auditing (verify the absorption and reset invariants after the fact)
//! - Analysis (per-generation spread metrics)
//!
//! Within a generation, events are logged in raster order of the seats
//! they concern. Seed placements are logged with generation 0, before the
//! first transition runs.

use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// All events include a generation number for temporal ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A seed infection was placed during setup
    SeedPlaced { generation: usize, row: usize, col: usize },

    /// A healthy occupant became infectious this generation
    SeatInfected { generation: usize, row: usize, col: usize },

    /// An unavailable seat registered ambient exposure this generation
    ExposureRegistered { generation: usize, row: usize, col: usize },

    /// A generation finished with the given summary counts
    GenerationCompleted {
        generation: usize,
        infected: usize,
        newly_infected: usize,
        exposed_unavailable: usize,
    },
}

impl Event {
    /// Get the generation in which this event occurred (0 for setup)
    pub fn generation(&self) -> usize {
        match self {
            Event::SeedPlaced { generation, .. } => *generation,
            Event::SeatInfected { generation, .. } => *generation,
            Event::ExposureRegistered { generation, .. } => *generation,
            Event::GenerationCompleted { generation, .. } => *generation,
        }
    }
}

/// Append-only log of all events in a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of logged events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in logging order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events belonging to one generation
    pub fn events_for_generation(&self, generation: usize) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.generation() == generation)
    }
}
