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
//! Integration tests for stepping body collections

use approx::assert_relative_eq;
use nbody_engine::gravity::{direct_force_on, PointMass, GRAVITATIONAL_CONSTANT};
use nbody_engine::integration::VelocityVerlet;
use nbody_engine::{advance, Body, SolverConfig, Stepper, Vector3};

const SUN_MASS: f64 = 1.989e30;
const EARTH_MASS: f64 = 5.972e24;
const AU: f64 = 1.496e11;
const EARTH_SPEED: f64 = 29_780.0;

fn sun() -> Body {
    Body::new("sun", SUN_MASS, 6.96e8, [1.0, 0.9, 0.2], Vector3::ZERO, Vector3::ZERO)
        .unwrap()
        .with_static(true)
}

fn earth() -> Body {
    Body::new(
        "earth",
        EARTH_MASS,
        6.371e6,
        [0.2, 0.6, 1.0],
        Vector3::new(AU, 0.0, 0.0),
        Vector3::new(0.0, EARTH_SPEED, 0.0),
    )
    .unwrap()
}

fn body(id: &str, mass: f64, position: Vector3, velocity: Vector3) -> Body {
    Body::new(id, mass, 1.0, [1.0; 3], position, velocity).unwrap()
}

#[test]
fn test_sun_earth_single_tick() {
    let mut bodies = vec![Some(sun()), Some(earth())];
    let initial_velocity = earth().velocity();
    assert_eq!(advance(Some(&mut bodies), 1.0), 1);

    // One second of sunward acceleration; the orbital velocity is untouched
    let earth = bodies[1].as_ref().unwrap();
    let expected = GRAVITATIONAL_CONSTANT * SUN_MASS / (AU * AU);
    assert_relative_eq!(expected, 5.93e-3, max_relative = 1e-3);
    let delta_v = earth.velocity() - initial_velocity;
    assert_relative_eq!(delta_v.x, -expected, max_relative = 1e-12);
    assert_eq!(delta_v.y, 0.0);
    assert_eq!(delta_v.z, 0.0);
    assert_eq!(earth.velocity().y, EARTH_SPEED);

    // Semi-implicit Euler moves with the updated velocity
    assert_relative_eq!(earth.position().x, AU - expected, max_relative = 1e-15);
    assert_eq!(earth.position().y, EARTH_SPEED);
    assert_eq!(earth.position().z, 0.0);

    let sun = bodies[0].as_ref().unwrap();
    assert_eq!(sun.position(), Vector3::ZERO);
    assert_eq!(sun.velocity(), Vector3::ZERO);
}

#[test]
fn test_static_bodies_never_move() {
    let mut bodies = vec![
        sun(),
        body("anchor", 1e25, Vector3::new(-AU, 0.0, 0.0), Vector3::new(0.0, 5.0, 0.0))
            .with_static(true),
        earth(),
        body(
            "mars",
            6.39e23,
            Vector3::new(0.0, 1.52 * AU, 0.0),
            Vector3::new(-24_070.0, 0.0, 0.0),
        ),
    ];
    let anchors: Vec<_> = bodies[..2].to_vec();
    let mut stepper = Stepper::default();

    for _ in 0..500 {
        assert_eq!(stepper.advance_bodies(&mut bodies, 3600.0), 2);
    }

    // Position and velocity are untouched even though the anchor has velocity
    assert_eq!(&bodies[..2], &anchors[..]);
    assert_ne!(bodies[2].position(), Vector3::new(AU, 0.0, 0.0));
}

#[test]
fn test_empty_and_missing_collections() {
    assert_eq!(advance(None, 1.0), 0);

    let mut empty: Vec<Option<Body>> = Vec::new();
    assert_eq!(advance(Some(&mut empty), 1.0), 0);
    assert!(empty.is_empty());

    let mut stepper = Stepper::default();
    let mut dense: Vec<Body> = Vec::new();
    assert_eq!(stepper.advance_bodies(&mut dense, 1.0), 0);
}

#[test]
fn test_absent_entries_are_skipped() {
    let mut bodies = vec![None, Some(sun()), None, Some(earth()), None];
    assert_eq!(advance(Some(&mut bodies), 1.0), 1);

    assert!(bodies[0].is_none());
    assert!(bodies[2].is_none());
    assert!(bodies[4].is_none());
    assert!(bodies[3].as_ref().unwrap().velocity().x < 0.0);
}

#[test]
fn test_order_independent() {
    let a = body("a", 1e22, Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0));
    let b = body("b", 3e22, Vector3::new(4e6, 1e6, 0.0), Vector3::ZERO);
    let c = body("c", 2e22, Vector3::new(-2e6, 5e6, 3e6), Vector3::new(0.0, -3.0, 1.0));

    let mut forward = vec![a.clone(), b.clone(), c.clone()];
    let mut reversed = vec![c, b, a];
    Stepper::default().advance_bodies(&mut forward, 60.0);
    Stepper::default().advance_bodies(&mut reversed, 60.0);

    for (f, r) in forward.iter().zip(reversed.iter().rev()) {
        assert_eq!(f.id(), r.id());
        assert_relative_eq!(f.velocity().x, r.velocity().x, max_relative = 1e-12);
        assert_relative_eq!(f.velocity().y, r.velocity().y, max_relative = 1e-12);
        assert_relative_eq!(f.velocity().z, r.velocity().z, max_relative = 1e-12);
    }
}

#[test]
fn test_exact_theta_matches_direct_integration() {
    let config = SolverConfig::default().with_theta(0.0).unwrap();
    let mut bodies: Vec<Body> = (0..40)
        .map(|i| {
            let t = i as f64 * 0.7;
            body(
                &format!("b{}", i),
                1e20 * (1.0 + (i % 5) as f64),
                Vector3::new(t.cos() * 1e7, t.sin() * 1e7, (i as f64 - 20.0) * 1e5),
                Vector3::new(-t.sin() * 50.0, t.cos() * 50.0, 0.0),
            )
        })
        .collect();

    let points: Vec<PointMass> = bodies.iter().map(Body::point_mass).collect();
    let expected: Vec<Vector3> = (0..bodies.len())
        .map(|i| {
            let force = direct_force_on(&points, i, &config);
            bodies[i].velocity() + force * (10.0 / bodies[i].mass())
        })
        .collect();

    let mut stepper = Stepper::new(config);
    assert_eq!(stepper.advance_bodies(&mut bodies, 10.0), 40);

    for (body, velocity) in bodies.iter().zip(&expected) {
        assert!((body.velocity() - *velocity).length() <= 1e-9 * velocity.length());
    }
}

#[test]
fn test_verlet_earth_orbit_energy() {
    let mut bodies = vec![sun(), earth()];
    let energy = |bodies: &[Body]| {
        let earth = &bodies[1];
        let potential = GRAVITATIONAL_CONSTANT * SUN_MASS * EARTH_MASS / earth.position().length();
        earth.kinetic_energy() - potential
    };
    let initial = energy(&bodies);

    let mut stepper = Stepper::with_integrator(VelocityVerlet, SolverConfig::default());
    // One year in one-hour steps
    for _ in 0..(365 * 24) {
        stepper.advance_bodies(&mut bodies, 3600.0);
    }

    assert_relative_eq!(energy(&bodies), initial, max_relative = 1e-6);
    assert_relative_eq!(bodies[1].position().length(), AU, max_relative = 1e-2);
}

#[test]
fn test_non_finite_body_does_not_hang() {
    let mut bodies = vec![
        Some(body("nan", 1.0, Vector3::new(f64::NAN, 0.0, 0.0), Vector3::ZERO)),
        Some(sun()),
        Some(earth()),
    ];
    assert_eq!(advance(Some(&mut bodies), 1.0), 2);
    assert!(bodies[2].as_ref().unwrap().position().is_finite());
}
