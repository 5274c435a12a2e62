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
//! Pairwise Newtonian gravity with numerical safety clamps
//!
//! # Physics Background
//!
//! Newton's law of universal gravitation states that every point mass attracts
//! every other point mass with a force proportional to the product of their
//! masses and inversely proportional to the square of the distance between them:
//!
//! **F = G * (m₁ * m₂) / r²**
//!
//! # Numerical Stability
//!
//! Instead of softening, the force is clamped to zero outside a distance
//! window:
//!
//! - below [`MIN_FORCE_DISTANCE`] the pair is treated as coincident, which
//!   avoids the `1/r²` blow-up (and NaN from normalizing a zero vector)
//! - above [`MAX_FORCE_DISTANCE`] the contribution is negligible and skipped
//!
//! A pair of static bodies never interacts, since neither can move.
//!
//! The functions here operate on [`PointMass`], a plain view shared by real
//! bodies, merged cluster leaves and the equivalent bodies the tree uses for
//! distant subtrees.

use crate::config::SolverConfig;
use crate::vector::Vector3;

/// Gravitational constant in SI units (m³/(kg⋅s²))
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

/// Pairs closer than this (meters) exert no force on each other
pub const MIN_FORCE_DISTANCE: f64 = 1e-5;

/// Pairs farther apart than this (meters) exert no force on each other
pub const MAX_FORCE_DISTANCE: f64 = 1e16;

/// Position, mass and static flag of anything that takes part in gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    /// Position in meters
    pub position: Vector3,
    /// Mass in kilograms
    pub mass: f64,
    /// Static masses attract others but never accelerate
    pub is_static: bool,
}

impl PointMass {
    /// Create a non-static point mass
    pub fn new(position: Vector3, mass: f64) -> Self {
        PointMass {
            position,
            mass,
            is_static: false,
        }
    }

    /// Create a static point mass
    pub fn fixed(position: Vector3, mass: f64) -> Self {
        PointMass {
            position,
            mass,
            is_static: true,
        }
    }
}

/// Force on `a` due to `b` with the default constants
///
/// The result points from `a` toward `b`.
///
/// # Examples
///
/// ```
/// use nbody_engine::gravity::{gravity, PointMass, GRAVITATIONAL_CONSTANT};
/// use nbody_engine::vector::Vector3;
///
/// let a = PointMass::new(Vector3::ZERO, 1000.0);
/// let b = PointMass::new(Vector3::new(10.0, 0.0, 0.0), 1000.0);
///
/// let f = gravity(&a, &b);
/// let expected = GRAVITATIONAL_CONSTANT * 1000.0 * 1000.0 / 100.0;
/// assert!((f.x - expected).abs() < 1e-20);
/// assert_eq!(f.y, 0.0);
/// ```
pub fn gravity(a: &PointMass, b: &PointMass) -> Vector3 {
    pairwise_force(a, b, &SolverConfig::default())
}

/// Force on `a` due to `b` using the constants in `config`
pub fn pairwise_force(a: &PointMass, b: &PointMass, config: &SolverConfig) -> Vector3 {
    if a.is_static && b.is_static {
        return Vector3::ZERO;
    }

    let delta = b.position - a.position;
    let distance = delta.length();

    // NaN distances fail both comparisons below, so test the window positively
    if !(distance >= config.min_distance() && distance <= config.max_distance()) {
        return Vector3::ZERO;
    }

    let magnitude = config.gravitational_constant() * a.mass * b.mass / (distance * distance);
    delta.normalize() * magnitude
}

/// Exact net force on `bodies[index]` by direct O(n²) summation
///
/// Used as the reference for the tree approximation.
pub fn direct_force_on(bodies: &[PointMass], index: usize, config: &SolverConfig) -> Vector3 {
    let target = &bodies[index];
    bodies
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, other)| pairwise_force(target, other, config))
        .sum()
}

/// Total gravitational potential energy `-Σ G mᵢ mⱼ / rᵢⱼ` over all pairs
///
/// Pairs outside the force window are skipped, consistent with
/// [`pairwise_force`].
pub fn potential_energy(bodies: &[PointMass], config: &SolverConfig) -> f64 {
    let mut energy = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let r = a.position.distance(b.position);
            if r >= config.min_distance() && r <= config.max_distance() {
                energy -= config.gravitational_constant() * a.mass * b.mass / r;
            }
        }
    }
    energy
}
