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
//! The simulation step
//!
//! One call advances a body collection by one time step: build a fresh
//! octree from the current positions, query the net force on each movable
//! body, then integrate. The collection is mutated in place and keeps its
//! order, so slot `i` holds the same body before and after.
//!
//! # Examples
//!
//! ```
//! use nbody_engine::{Body, Stepper, Vector3};
//!
//! let sun = Body::new("sun", 1.989e30, 6.96e8, [1.0, 1.0, 0.0], Vector3::ZERO, Vector3::ZERO)
//!     .unwrap()
//!     .with_static(true);
//! let earth = Body::new(
//!     "earth",
//!     5.972e24,
//!     6.371e6,
//!     [0.0, 0.0, 1.0],
//!     Vector3::new(1.496e11, 0.0, 0.0),
//!     Vector3::new(0.0, 29_780.0, 0.0),
//! )
//! .unwrap();
//!
//! let mut bodies = vec![sun, earth];
//! let mut stepper = Stepper::default();
//! assert_eq!(stepper.advance_bodies(&mut bodies, 3600.0), 1);
//! assert!(bodies[1].velocity().x < 0.0);
//! ```

use crate::body::{Body, BodySlot};
use crate::config::SolverConfig;
use crate::integration::{Integrator, SemiImplicitEuler};
use crate::solver::ForceSolver;
use crate::tree::Octree;

/// Reusable stepper owning the tree arena and an integrator
///
/// Reusing one `Stepper` across ticks keeps the arena allocation alive; the
/// tree itself is still rebuilt from scratch on every step.
#[derive(Debug, Clone)]
pub struct Stepper<I: Integrator = SemiImplicitEuler> {
    integrator: I,
    solver: ForceSolver,
}

impl Stepper {
    /// Create a semi-implicit Euler stepper
    pub fn new(config: SolverConfig) -> Self {
        Stepper::with_integrator(SemiImplicitEuler, config)
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Stepper::new(SolverConfig::default())
    }
}

impl<I: Integrator> Stepper<I> {
    /// Create a stepper using `integrator`
    pub fn with_integrator(integrator: I, config: SolverConfig) -> Self {
        Stepper {
            integrator,
            solver: ForceSolver::new(config),
        }
    }

    /// Advance a sparse collection by `dt` seconds
    ///
    /// Empty slots are skipped and stay empty. Static bodies attract the
    /// others but are never moved. Returns the number of bodies integrated.
    pub fn advance(&mut self, bodies: &mut [Option<Body>], dt: f64) -> usize {
        self.advance_slots(bodies, dt)
    }

    /// Advance a dense collection by `dt` seconds
    pub fn advance_bodies(&mut self, bodies: &mut [Body], dt: f64) -> usize {
        self.advance_slots(bodies, dt)
    }

    /// Advance any collection of [`BodySlot`]s by `dt` seconds
    ///
    /// The tree is rebuilt even for an empty collection, so
    /// [`Stepper::tree`] never reports bodies from an earlier call.
    pub fn advance_slots<S: BodySlot>(&mut self, bodies: &mut [S], dt: f64) -> usize {
        let updated = self.integrator.integrate(bodies, dt, &mut self.solver);
        log::trace!(
            "{} step of {} s integrated {} of {} slots ({} tree nodes)",
            self.integrator.name(),
            dt,
            updated,
            bodies.len(),
            self.solver.tree().node_count()
        );
        updated
    }

    /// The integrator in use
    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Solver parameters
    pub fn config(&self) -> &SolverConfig {
        self.solver.config()
    }

    /// Replace the solver parameters; applies from the next step
    pub fn set_config(&mut self, config: SolverConfig) {
        self.solver.set_config(config);
    }

    /// Tree built during the most recent step
    ///
    /// Empty before the first step and after a step over an empty
    /// collection.
    pub fn tree(&self) -> &Octree {
        self.solver.tree()
    }
}

/// Advance `bodies` by one step with default parameters
///
/// A missing collection is a no-op and returns 0.
pub fn advance(bodies: Option<&mut [Option<Body>]>, dt: f64) -> usize {
    match bodies {
        Some(bodies) => Stepper::default().advance(bodies, dt),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::VelocityVerlet;
    use crate::vector::Vector3;

    fn body(id: &str, mass: f64, position: Vector3) -> Body {
        Body::new(id, mass, 1.0, [1.0; 3], position, Vector3::ZERO).unwrap()
    }

    #[test]
    fn test_missing_collection_is_noop() {
        assert_eq!(advance(None, 1.0), 0);
    }

    #[test]
    fn test_empty_collection_is_noop() {
        let mut stepper = Stepper::default();
        let mut bodies: Vec<Option<Body>> = Vec::new();
        assert_eq!(stepper.advance(&mut bodies, 1.0), 0);
        assert!(stepper.tree().is_empty());
    }

    #[test]
    fn test_empty_step_clears_previous_tree() {
        let mut stepper = Stepper::default();
        let mut bodies = vec![
            body("a", 1e20, Vector3::ZERO),
            body("b", 1e20, Vector3::new(1e4, 0.0, 0.0)),
        ];
        assert_eq!(stepper.advance_bodies(&mut bodies, 1.0), 2);
        assert_eq!(stepper.tree().total_mass(), 2e20);

        assert_eq!(stepper.advance_bodies(&mut [], 1.0), 0);
        assert!(stepper.tree().is_empty());
        assert_eq!(stepper.tree().node_count(), 0);
        assert_eq!(stepper.tree().total_mass(), 0.0);
    }

    #[test]
    fn test_empty_slots_survive() {
        let mut bodies = vec![
            Some(body("a", 1e20, Vector3::ZERO)),
            None,
            Some(body("b", 1e20, Vector3::new(1e4, 0.0, 0.0))),
        ];
        assert_eq!(advance(Some(&mut bodies), 10.0), 2);
        assert!(bodies[1].is_none());
        assert_eq!(bodies[0].as_ref().unwrap().id().as_str(), "a");
        assert!(bodies[0].as_ref().unwrap().velocity().x > 0.0);
        assert!(bodies[2].as_ref().unwrap().velocity().x < 0.0);
    }

    #[test]
    fn test_only_static_bodies() {
        let mut bodies = vec![
            body("a", 1e30, Vector3::ZERO).with_static(true),
            body("b", 1e30, Vector3::new(1e6, 0.0, 0.0)).with_static(true),
        ];
        let before = bodies.clone();
        let mut stepper = Stepper::default();
        assert_eq!(stepper.advance_bodies(&mut bodies, 100.0), 0);
        assert_eq!(bodies, before);
    }

    #[test]
    fn test_verlet_stepper() {
        let mut stepper = Stepper::with_integrator(VelocityVerlet, SolverConfig::default());
        assert_eq!(stepper.integrator().name(), "Velocity Verlet");

        let mut bodies = vec![
            body("a", 1e20, Vector3::ZERO),
            body("b", 1e20, Vector3::new(1e4, 0.0, 0.0)),
        ];
        assert_eq!(stepper.advance_bodies(&mut bodies, 1.0), 2);
        assert_eq!(stepper.tree().total_mass(), 2e20);
    }
}
