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
//! Simulation driver
//!
//! [`Simulation`] owns the bodies of a scene, keyed by id, and turns
//! wall-clock frame times into simulated time steps. It adds the controls
//! an interactive front end needs on top of the [`Stepper`]:
//!
//! - a time-scale multiplier (simulated seconds per wall-clock second),
//!   kept within [`MIN_TIME_SCALE`, `MAX_TIME_SCALE`]
//! - pause and resume
//! - id lookup, including resolving a planet's parent
//! - spacecraft thrust
//! - energy and momentum diagnostics
//!
//! Bodies keep their insertion order, which is also the order the renderer
//! sees through [`Simulation::bodies`].

use std::collections::HashMap;

use crate::body::{Body, BodyId};
use crate::config::{SimulationConfig, DEFAULT_TIME_SCALE, MAX_TIME_SCALE, MIN_TIME_SCALE};
use crate::error::{EngineError, EngineResult};
use crate::gravity::{potential_energy, PointMass};
use crate::integration::{self, Integrator, SemiImplicitEuler};
use crate::stepper::Stepper;
use crate::tree::TreeStats;
use crate::vector::Vector3;

/// Snapshot of conserved quantities and tree shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    /// Total kinetic energy of non-static bodies (J)
    pub kinetic_energy: f64,
    /// Total pairwise potential energy by direct summation (J)
    pub potential_energy: f64,
    /// Linear momentum of non-static bodies (kg⋅m/s)
    pub momentum: Vector3,
    /// Shape of the tree built during the last step
    pub tree: TreeStats,
}

impl Diagnostics {
    /// Kinetic plus potential energy
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}

/// An id-indexed scene advanced in wall-clock time
#[derive(Debug, Clone)]
pub struct Simulation<I: Integrator = SemiImplicitEuler> {
    bodies: Vec<Body>,
    index: HashMap<BodyId, usize>,
    stepper: Stepper<I>,
    time_scale: f64,
    paused: bool,
    elapsed: f64,
}

impl Simulation {
    /// Create an empty simulation using semi-implicit Euler
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: SimulationConfig) -> EngineResult<Self> {
        Simulation::with_integrator(SemiImplicitEuler, config)
    }
}

impl<I: Integrator> Simulation<I> {
    /// Create an empty simulation using `integrator`
    pub fn with_integrator(integrator: I, config: SimulationConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Simulation {
            bodies: Vec::new(),
            index: HashMap::new(),
            stepper: Stepper::with_integrator(integrator, config.solver),
            time_scale: config.time_scale,
            paused: config.start_paused,
            elapsed: 0.0,
        })
    }

    /// Register a body
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateBody`] if the id is taken.
    pub fn add_body(&mut self, body: Body) -> EngineResult<()> {
        if self.index.contains_key(body.id()) {
            return Err(EngineError::DuplicateBody(body.id().to_string()));
        }
        self.index.insert(body.id().clone(), self.bodies.len());
        self.bodies.push(body);
        Ok(())
    }

    /// Register several bodies, stopping at the first duplicate
    pub fn add_bodies<B>(&mut self, bodies: B) -> EngineResult<()>
    where
        B: IntoIterator<Item = Body>,
    {
        bodies.into_iter().try_for_each(|body| self.add_body(body))
    }

    /// Unregister a body and return it
    ///
    /// Planets that named it as parent keep the id; their lookup fails from
    /// now on.
    pub fn remove_body(&mut self, id: &str) -> EngineResult<Body> {
        let position = self
            .index
            .remove(id)
            .ok_or_else(|| EngineError::UnknownBody(id.to_string()))?;
        let body = self.bodies.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Ok(body)
    }

    /// Remove every body and reset the clock
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
        self.elapsed = 0.0;
    }

    /// Look up a body by id
    pub fn body(&self, id: &str) -> Option<&Body> {
        self.index.get(id).map(|&i| &self.bodies[i])
    }

    /// Look up a body by id for modification
    pub fn body_mut(&mut self, id: &str) -> Option<&mut Body> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.bodies[i]),
            None => None,
        }
    }

    /// Whether a body with this id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All bodies in insertion order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Resolve the parent of a planet
    ///
    /// Returns `Ok(None)` for bodies without a parent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownBody`] if `id` is not registered, or if
    /// the parent it names is not.
    pub fn parent_of(&self, id: &str) -> EngineResult<Option<&Body>> {
        let body = self
            .body(id)
            .ok_or_else(|| EngineError::UnknownBody(id.to_string()))?;
        match body.parent_id() {
            Some(parent) => self
                .body(parent.as_str())
                .map(Some)
                .ok_or_else(|| EngineError::UnknownBody(parent.to_string())),
            None => Ok(None),
        }
    }

    /// Bodies whose parent id does not resolve, paired with that id
    pub fn unresolved_parents(&self) -> Vec<(&BodyId, &BodyId)> {
        self.bodies
            .iter()
            .filter_map(|body| body.parent_id().map(|parent| (body.id(), parent)))
            .filter(|(_, parent)| !self.index.contains_key(*parent))
            .collect()
    }

    /// Fire a spacecraft's engine for `dt` simulated seconds
    ///
    /// Returns whether thrust was applied (see [`Body::apply_thrust`]).
    pub fn apply_thrust(&mut self, id: &str, direction: Vector3, dt: f64) -> EngineResult<bool> {
        let body = self
            .body_mut(id)
            .ok_or_else(|| EngineError::UnknownBody(id.to_string()))?;
        Ok(body.apply_thrust(direction, dt))
    }

    /// Advance by `wall_dt` wall-clock seconds scaled by the time scale
    ///
    /// Does nothing while paused. Returns the number of bodies integrated.
    pub fn update(&mut self, wall_dt: f64) -> usize {
        if self.paused {
            return 0;
        }
        if !(wall_dt >= 0.0 && wall_dt.is_finite()) {
            log::warn!("ignoring invalid frame time {}", wall_dt);
            return 0;
        }
        self.step(wall_dt * self.time_scale)
    }

    /// Advance by `dt` simulated seconds, ignoring pause and time scale
    pub fn step(&mut self, dt: f64) -> usize {
        let updated = self.stepper.advance_bodies(&mut self.bodies, dt);
        self.elapsed += dt;

        let stats = self.stepper.tree().stats();
        log::debug!(
            "t = {:.1} s: {} bodies, {} nodes, depth {}, {} aggregate leaves",
            self.elapsed,
            self.bodies.len(),
            stats.node_count,
            stats.max_depth,
            stats.aggregate_leaf_count
        );
        updated
    }

    /// Simulated seconds elapsed
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Simulated seconds per wall-clock second
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the time scale, clamped into the allowed range
    ///
    /// NaN is ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            log::warn!("ignoring NaN time scale");
            return;
        }
        self.time_scale = scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        log::debug!("time scale set to {}", self.time_scale);
    }

    /// Multiply the time scale by `factor`
    ///
    /// The change is only applied if the result stays within the allowed
    /// range. Returns whether it was applied.
    pub fn adjust_time_scale(&mut self, factor: f64) -> bool {
        let scale = self.time_scale * factor;
        if !(MIN_TIME_SCALE..=MAX_TIME_SCALE).contains(&scale) {
            log::debug!("time scale {} out of range, keeping {}", scale, self.time_scale);
            return false;
        }
        self.time_scale = scale;
        log::debug!(
            "time scale {} ({:.2} days/second)",
            self.time_scale,
            self.time_scale / DEFAULT_TIME_SCALE
        );
        true
    }

    /// Go back to one simulated day per second
    pub fn reset_time_scale(&mut self) {
        self.time_scale = DEFAULT_TIME_SCALE;
        log::debug!("time scale reset to {}", self.time_scale);
    }

    /// Flip between paused and running; returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Whether updates are currently ignored
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The stepper driving this simulation
    pub fn stepper(&self) -> &Stepper<I> {
        &self.stepper
    }

    /// Energy, momentum and tree statistics for the current state
    ///
    /// Potential energy is an O(n²) direct sum.
    pub fn diagnostics(&self) -> Diagnostics {
        let points: Vec<PointMass> = self.bodies.iter().map(Body::point_mass).collect();
        Diagnostics {
            kinetic_energy: integration::total_kinetic_energy(&self.bodies),
            potential_energy: potential_energy(&points, self.stepper.config()),
            momentum: integration::total_momentum(&self.bodies),
            tree: self.stepper.tree().stats(),
        }
    }
}
