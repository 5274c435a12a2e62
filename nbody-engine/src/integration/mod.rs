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
//! Numerical integration methods for the gravity stepper
//!
//! An integrator turns the forces computed by a [`ForceSolver`] into new
//! velocities and positions. Both integrators here skip empty slots and
//! static bodies; static bodies still take part in every force evaluation.
//!
//! # Integrators
//!
//! - **Semi-implicit Euler** (default): velocity first, then position with
//!   the updated velocity. One tree build per step.
//! - **Velocity Verlet**: half kick, drift, rebuild, half kick. Two tree
//!   builds per step and noticeably better energy behavior on orbits.
//!
//! # Timestep Guidelines
//!
//! The time step is not clamped here. Orbital scenes typically run with
//! steps of minutes to hours of simulated time; a step that is large
//! relative to the tightest orbit's period makes that orbit unstable.

use crate::body::{Body, BodySlot};
use crate::solver::ForceSolver;
use crate::vector::Vector3;

mod euler;
mod verlet;

pub use euler::SemiImplicitEuler;
pub use verlet::VelocityVerlet;

/// Trait for numerical integration methods
///
/// Integrators update the velocity and position of every present, non-static
/// body in a collection. Identity is positional: slot `i` before the step is
/// slot `i` after it.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Advance `bodies` by `dt` seconds
    ///
    /// Returns the number of bodies that were integrated.
    fn integrate<S: BodySlot>(
        &mut self,
        bodies: &mut [S],
        dt: f64,
        solver: &mut ForceSolver,
    ) -> usize;
}

/// Kinetic energy of all present bodies
///
/// Static bodies contribute nothing.
pub fn total_kinetic_energy<S: BodySlot>(bodies: &[S]) -> f64 {
    bodies
        .iter()
        .filter_map(BodySlot::body)
        .filter(|body| !body.is_static())
        .map(Body::kinetic_energy)
        .sum()
}

/// Linear momentum of all present, non-static bodies
pub fn total_momentum<S: BodySlot>(bodies: &[S]) -> Vector3 {
    bodies
        .iter()
        .filter_map(BodySlot::body)
        .filter(|body| !body.is_static())
        .map(Body::momentum)
        .sum()
}

pub(crate) fn warn_if_diverged(body: &Body) {
    if !body.position().is_finite() || !body.velocity().is_finite() {
        log::warn!(
            "body {} has non-finite state after integration (position {}, velocity {})",
            body.id(),
            body.position(),
            body.velocity()
        );
    }
}
