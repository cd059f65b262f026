//! Integration tests for the generation engine
//!
//! Exercises the full seeding → transition → summary pipeline across
//! complete runs, including the separation-mask reset discipline and
//! end-to-end determinism.

use venue_contagion_core_rs::{
    Event, MaskPolicy, SeatState, SeparationPolicy, Simulation, SimulationConfig, Ventilation,
};

/// Default 10×20 venue with a fixed seed
fn create_test_config() -> SimulationConfig {
    SimulationConfig {
        rng_seed: 42,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_capacity_validation_runs_zero_generations() {
    let config = SimulationConfig {
        separation: SeparationPolicy::Half,
        initial_infected: 150,
        ..create_test_config()
    };

    // 10×20 halves to 100 usable seats; 150 seeds must fail fast.
    let err = Simulation::new(config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "initial infected count 150 exceeds effective capacity 100"
    );
}

#[test]
fn test_seeding_matches_configured_count() {
    for seed in [1, 7, 99, 12345] {
        let sim = Simulation::new(SimulationConfig {
            rng_seed: seed,
            ..create_test_config()
        })
        .unwrap();
        assert_eq!(sim.grid().count(SeatState::Infected), 10);
    }
}

#[test]
fn test_full_capacity_seeding_terminates() {
    // Every usable seat seeded: the rejection sampler must still finish.
    let config = SimulationConfig {
        rows: 4,
        cols: 4,
        separation: SeparationPolicy::Half,
        initial_infected: 8,
        generations: 2,
        ..create_test_config()
    };
    let sim = Simulation::new(config).unwrap();
    assert_eq!(sim.grid().count(SeatState::Infected), 8);
    assert_eq!(sim.grid().count(SeatState::Healthy), 0);
}

#[test]
fn test_infected_count_constant_across_run() {
    let mut sim = Simulation::new(create_test_config()).unwrap();
    let report = sim.run();

    assert_eq!(report.generations.len(), 20);
    for result in &report.generations {
        assert_eq!(result.infected, 10);
    }
}

#[test]
fn test_newly_infected_never_decreases() {
    let mut sim = Simulation::new(create_test_config()).unwrap();
    let report = sim.run();

    let mut previous = 0;
    for result in &report.generations {
        assert!(
            result.newly_infected >= previous,
            "newly infected dropped from {} to {} at generation {}",
            previous,
            result.newly_infected,
            result.generation
        );
        previous = result.newly_infected;
    }
}

#[test]
fn test_absorption_cell_by_cell() {
    let mut sim = Simulation::new(create_test_config()).unwrap();
    let mut previous = sim.grid().clone();

    for _ in 0..5 {
        sim.step();
        for (row, col, state) in previous.iter() {
            if state.is_infectious() {
                assert_eq!(
                    sim.grid().get(row, col),
                    state,
                    "infectious seat ({}, {}) changed state",
                    row,
                    col
                );
            }
        }
        previous = sim.grid().clone();
    }
}

#[test]
fn test_separation_mask_never_drifts() {
    let mut sim = Simulation::new(SimulationConfig {
        separation: SeparationPolicy::Half,
        ..create_test_config()
    })
    .unwrap();

    for _ in 0..20 {
        sim.step();
        for (row, col, state) in sim.grid().iter() {
            if SeparationPolicy::Half.removes(row, col) {
                assert!(
                    state.is_unavailable(),
                    "removed seat ({}, {}) became {:?}",
                    row,
                    col,
                    state
                );
            } else {
                assert!(state.is_occupied());
            }
        }
    }
}

#[test]
fn test_generation_numbers_are_sequential() {
    let mut sim = Simulation::new(SimulationConfig {
        generations: 7,
        ..create_test_config()
    })
    .unwrap();
    let report = sim.run();

    let numbers: Vec<usize> = report.generations.iter().map(|g| g.generation).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_same_seed_same_run() {
    let mut a = Simulation::new(create_test_config()).unwrap();
    let mut b = Simulation::new(create_test_config()).unwrap();

    // Run identifiers are per-engine; the simulated history is not.
    assert_ne!(a.run_id(), b.run_id());
    assert_eq!(a.run().generations, b.run().generations);
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = Simulation::new(create_test_config()).unwrap();
    let mut b = Simulation::new(SimulationConfig {
        rng_seed: 43,
        ..create_test_config()
    })
    .unwrap();

    assert_ne!(a.run().generations, b.run().generations);
}

#[test]
fn test_respirator_and_ventilation_suppress_spread() {
    let open = SimulationConfig {
        rng_seed: 7,
        ..create_test_config()
    };
    let protected = SimulationConfig {
        mask: MaskPolicy::Respirator,
        ventilation: Ventilation::new(4).unwrap(),
        ..open.clone()
    };

    let spread_open = Simulation::new(open).unwrap().run().final_newly_infected;
    let spread_protected = Simulation::new(protected)
        .unwrap()
        .run()
        .final_newly_infected;

    // Risk factor 0.001 over 20 generations: spread should collapse.
    assert!(
        spread_protected <= spread_open,
        "mitigated run spread more ({} > {})",
        spread_protected,
        spread_open
    );
}

#[test]
fn test_event_log_records_infections() {
    let mut sim = Simulation::new(create_test_config()).unwrap();
    let report = sim.run();

    let logged_infections = sim
        .event_log()
        .events()
        .iter()
        .filter(|e| matches!(e, Event::SeatInfected { .. }))
        .count();

    assert_eq!(logged_infections, report.final_newly_infected);

    let completions = sim
        .event_log()
        .events()
        .iter()
        .filter(|e| matches!(e, Event::GenerationCompleted { .. }))
        .count();
    assert_eq!(completions, 20);
}

#[test]
fn test_seat_codes_use_wire_encoding() {
    let mut sim = Simulation::new(SimulationConfig {
        separation: SeparationPolicy::Half,
        generations: 1,
        ..create_test_config()
    })
    .unwrap();
    let report = sim.run();
    let codes = &report.generations[0].seat_codes;

    assert_eq!(codes.len(), 10);
    for row in codes {
        assert_eq!(row.len(), 20);
        for &code in row {
            assert!(
                SeatState::from_code(code).is_some(),
                "unknown wire code {}",
                code
            );
        }
    }
}

#[test]
fn test_run_report_serializes() {
    let mut sim = Simulation::new(SimulationConfig {
        generations: 2,
        ..create_test_config()
    })
    .unwrap();
    let report = sim.run();

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"generations\""));
}
