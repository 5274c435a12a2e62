// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Integration tests for the simulation driver

use approx::assert_relative_eq;
use nbody_engine::config::{DEFAULT_TIME_SCALE, MAX_TIME_SCALE};
use nbody_engine::integration::VelocityVerlet;
use nbody_engine::{Body, BodyId, BodyKind, EngineError, Simulation, SimulationConfig, Vector3};

fn planet(id: &str, mass: f64, distance: f64, speed: f64) -> Body {
    Body::new(
        id,
        mass,
        1e6,
        [0.5, 0.5, 0.5],
        Vector3::new(distance, 0.0, 0.0),
        Vector3::new(0.0, speed, 0.0),
    )
    .unwrap()
    .with_kind(BodyKind::Planet {
        parent: Some(BodyId::from("sun")),
        gas_giant: false,
    })
}

fn solar_system() -> Vec<Body> {
    vec![
        Body::new("sun", 1.989e30, 6.96e8, [1.0, 0.9, 0.2], Vector3::ZERO, Vector3::ZERO)
            .unwrap()
            .with_static(true)
            .with_kind(BodyKind::Star { luminosity: 3.828e26 }),
        planet("mercury", 3.301e23, 5.79e10, 47_360.0),
        planet("venus", 4.867e24, 1.082e11, 35_020.0),
        planet("earth", 5.972e24, 1.496e11, 29_780.0),
        planet("mars", 6.39e23, 2.279e11, 24_070.0),
    ]
}

#[test]
fn test_one_day_per_second() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.add_bodies(solar_system()).unwrap();

    // 60 frames of one second each at one day per second
    for _ in 0..60 {
        assert_eq!(sim.update(1.0), 4);
    }
    assert_relative_eq!(sim.elapsed(), 60.0 * DEFAULT_TIME_SCALE);

    for body in sim.bodies() {
        assert!(body.position().is_finite());
        assert_eq!(sim.parent_of(body.id().as_str()).unwrap().is_some(), !body.is_static());
    }
    assert_eq!(sim.body("sun").unwrap().position(), Vector3::ZERO);
}

#[test]
fn test_verlet_driver_keeps_energy() {
    let config = SimulationConfig {
        time_scale: 3600.0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::with_integrator(VelocityVerlet, config).unwrap();
    sim.add_bodies(solar_system()).unwrap();
    let initial = sim.diagnostics().total_energy();

    // Thirty days of hourly steps
    for _ in 0..(30 * 24) {
        sim.update(1.0);
    }

    let diagnostics = sim.diagnostics();
    assert_relative_eq!(diagnostics.total_energy(), initial, max_relative = 1e-4);
    assert_eq!(diagnostics.tree.body_leaf_count, 5);
}

fn drifter(id: &str, mass: f64, x: f64, vy: f64) -> Body {
    Body::new(
        id,
        mass,
        1e6,
        [1.0; 3],
        Vector3::new(x, 0.0, 0.0),
        Vector3::new(0.0, vy, 0.0),
    )
    .unwrap()
}

#[test]
fn test_free_pair_conserves_momentum() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.add_body(drifter("a", 1e24, -1e8, -100.0)).unwrap();
    sim.add_body(drifter("b", 3e24, 1e8, 50.0)).unwrap();

    let before = sim.diagnostics().momentum;
    for _ in 0..100 {
        sim.step(600.0);
    }
    let after = sim.diagnostics().momentum;

    let scale = 1e24 * 100.0;
    assert!((after - before).length() < 1e-9 * scale);
}

#[test]
fn test_controls() {
    let mut sim = Simulation::new(SimulationConfig {
        start_paused: true,
        ..SimulationConfig::default()
    })
    .unwrap();
    sim.add_bodies(solar_system()).unwrap();

    assert!(sim.is_paused());
    assert_eq!(sim.update(1.0), 0);

    while sim.adjust_time_scale(10.0) {}
    assert!(sim.time_scale() <= MAX_TIME_SCALE);
    assert!(sim.time_scale() * 10.0 > MAX_TIME_SCALE);

    sim.toggle_pause();
    assert_eq!(sim.update(0.01), 4);

    assert_eq!(
        sim.add_body(planet("earth", 1.0, 1.0, 0.0)),
        Err(EngineError::DuplicateBody("earth".to_string()))
    );
    assert!(matches!(sim.remove_body("pluto"), Err(EngineError::UnknownBody(_))));

    sim.clear();
    assert_eq!(sim.body_count(), 0);
    assert_eq!(sim.update(1.0), 0);
}

#[test]
fn test_clear_drops_last_tree() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.add_body(drifter("a", 1e20, 0.0, 0.0)).unwrap();
    sim.add_body(drifter("b", 1e20, 1e4, 0.0)).unwrap();
    assert_eq!(sim.step(1.0), 2);
    assert_eq!(sim.diagnostics().tree.body_leaf_count, 2);

    sim.clear();
    assert_eq!(sim.step(1.0), 0);
    assert!(sim.stepper().tree().is_empty());
    assert_eq!(sim.stepper().tree().total_mass(), 0.0);
    assert_eq!(sim.diagnostics().tree.node_count, 0);
}
