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
//! Semi-implicit (symplectic) Euler integrator
//!
//! ```text
//! v(t + dt) = v(t) + F(x(t)) / m * dt
//! x(t + dt) = x(t) + v(t + dt) * dt
//! ```
//!
//! All forces are evaluated against a tree built from positions at the start
//! of the step, so no body sees another body's updated position.

use super::{warn_if_diverged, Integrator};
use crate::body::BodySlot;
use crate::solver::ForceSolver;

/// Semi-implicit Euler integrator, the stepper default
///
/// # Example
///
/// ```
/// use nbody_engine::integration::{Integrator, SemiImplicitEuler};
///
/// assert_eq!(SemiImplicitEuler.name(), "Semi-implicit Euler");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn name(&self) -> &str {
        "Semi-implicit Euler"
    }

    fn integrate<S: BodySlot>(
        &mut self,
        bodies: &mut [S],
        dt: f64,
        solver: &mut ForceSolver,
    ) -> usize {
        let forces = solver.compute(bodies);

        let mut updated_count = 0;
        for (slot, force) in bodies.iter_mut().zip(forces) {
            let (Some(body), Some(force)) = (slot.body_mut(), force) else {
                continue;
            };
            body.apply_force(*force, dt);
            body.update_position(dt);
            warn_if_diverged(body);
            updated_count += 1;
        }
        updated_count
    }
}
