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
//! Velocity Verlet integrator implementation
//!
//! The velocity Verlet algorithm is a symplectic integrator that provides
//! excellent energy conservation for Hamiltonian systems. It is particularly
//! well-suited for orbital mechanics.
//!
//! # Algorithm
//!
//! Written in kick-drift-kick form:
//!
//! ```text
//! v(t + dt/2) = v(t) + 0.5 * F(x(t)) / m * dt
//! x(t + dt)   = x(t) + v(t + dt/2) * dt
//! v(t + dt)   = v(t + dt/2) + 0.5 * F(x(t + dt)) / m * dt
//! ```
//!
//! The tree is rebuilt between the drift and the second kick, so each step
//! costs two builds and two rounds of force queries.
//!
//! # Properties
//!
//! - **Symplectic**: Preserves phase space volume (Liouville's theorem)
//! - **Time-reversible**: Running forward then backward returns to start
//! - **Energy conservation**: Bounded energy error over long periods
//! - **Second-order accurate**: Local error O(dt³), global error O(dt²)
//!
//! # References
//!
//! - Hairer, E., Lubich, C., & Wanner, G. (2006). Geometric Numerical Integration:
//!   Structure-Preserving Algorithms for Ordinary Differential Equations (2nd ed.).
//!   Springer. Section II.3.
//! - Verlet, L. (1967). Computer "Experiments" on Classical Fluids. I. Thermodynamical
//!   Properties of Lennard-Jones Molecules. Physical Review, 159(1), 98-103.

use super::{warn_if_diverged, Integrator};
use crate::body::BodySlot;
use crate::solver::ForceSolver;

/// Velocity Verlet integrator
///
/// More accurate than semi-implicit Euler and better at preserving energy
/// over long runs, at twice the force cost.
///
/// # Example
///
/// ```
/// use nbody_engine::integration::{Integrator, VelocityVerlet};
///
/// assert_eq!(VelocityVerlet.name(), "Velocity Verlet");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn name(&self) -> &str {
        "Velocity Verlet"
    }

    fn integrate<S: BodySlot>(
        &mut self,
        bodies: &mut [S],
        dt: f64,
        solver: &mut ForceSolver,
    ) -> usize {
        let half_dt = 0.5 * dt;

        // Step 1: half kick with forces at x(t), then drift
        let forces = solver.compute(bodies);
        for (slot, force) in bodies.iter_mut().zip(forces) {
            let (Some(body), Some(force)) = (slot.body_mut(), force) else {
                continue;
            };
            body.apply_force(*force, half_dt);
            body.update_position(dt);
        }

        // Step 2: second half kick with forces at x(t + dt)
        let forces = solver.compute(bodies);
        let mut updated_count = 0;
        for (slot, force) in bodies.iter_mut().zip(forces) {
            let (Some(body), Some(force)) = (slot.body_mut(), force) else {
                continue;
            };
            body.apply_force(*force, half_dt);
            warn_if_diverged(body);
            updated_count += 1;
        }
        updated_count
    }
}
