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
//! Simulated point masses
//!
//! A [`Body`] is the mutable state of one simulated point mass: identity,
//! mass, radius, display color, the static flag and its kinematic state.
//! Mass and radius are validated once at construction; afterwards only
//! position, velocity and (for spacecraft) fuel change.
//!
//! # Units
//!
//! The engine performs no unit scaling. The default gravitational constant
//! is in SI units, so masses are in kilograms, distances in meters and
//! velocities in meters per second unless the solver is reconfigured.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::gravity::PointMass;
use crate::vector::Vector3;

/// Fraction of the thrust impulse consumed as fuel by a spacecraft burn
pub const FUEL_EFFICIENCY: f64 = 0.1;

/// Unique identifier of a body
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(String);

impl BodyId {
    /// Create an id from any string
    pub fn new(id: impl Into<String>) -> Self {
        BodyId(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BodyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BodyId {
    fn from(id: &str) -> Self {
        BodyId::new(id)
    }
}

impl From<String> for BodyId {
    fn from(id: String) -> Self {
        BodyId(id)
    }
}

/// Role-specific data carried by a body
///
/// None of this affects gravity; it is metadata for the driver and renderer,
/// except for spacecraft thrust which applies an extra force.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BodyKind {
    /// Plain point mass
    #[default]
    Generic,
    /// A star with its luminosity in watts
    Star {
        /// Radiated power in watts
        luminosity: f64,
    },
    /// A planet or moon orbiting a parent body
    Planet {
        /// Id of the body this one orbits, resolved by lookup
        parent: Option<BodyId>,
        /// Whether the planet is a gas giant
        gas_giant: bool,
    },
    /// A powered craft
    Spacecraft {
        /// Thrust force in newtons at full burn
        thrust_power: f64,
        /// Remaining fuel
        fuel: f64,
    },
}

/// One simulated point mass
///
/// # Examples
///
/// ```
/// use nbody_engine::body::Body;
/// use nbody_engine::vector::Vector3;
///
/// let earth = Body::new(
///     "earth",
///     5.972e24,
///     6.371e6,
///     [0.2, 0.6, 1.0],
///     Vector3::new(1.496e11, 0.0, 0.0),
///     Vector3::new(0.0, 29_780.0, 0.0),
/// )
/// .unwrap();
/// assert_eq!(earth.id().as_str(), "earth");
/// assert!(!earth.is_static());
///
/// assert!(Body::new("bad", 0.0, 1.0, [1.0; 3], Vector3::ZERO, Vector3::ZERO).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    mass: f64,
    radius: f64,
    color: [f32; 3],
    is_static: bool,
    position: Vector3,
    velocity: Vector3,
    kind: BodyKind,
}

impl Body {
    /// Create a new non-static body
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBody`] if `mass` or `radius` is not
    /// strictly positive and finite.
    pub fn new(
        id: impl Into<BodyId>,
        mass: f64,
        radius: f64,
        color: [f32; 3],
        position: Vector3,
        velocity: Vector3,
    ) -> EngineResult<Self> {
        let id = id.into();

        if !(mass > 0.0 && mass.is_finite()) {
            return Err(EngineError::InvalidBody {
                id: id.0,
                reason: format!("mass must be positive and finite, got {}", mass),
            });
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(EngineError::InvalidBody {
                id: id.0,
                reason: format!("radius must be positive and finite, got {}", radius),
            });
        }

        Ok(Body {
            id,
            mass,
            radius,
            color,
            is_static: false,
            position,
            velocity,
            kind: BodyKind::Generic,
        })
    }

    /// Mark the body as static (it attracts others but never moves)
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Attach role-specific data
    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Get the body id
    pub fn id(&self) -> &BodyId {
        &self.id
    }

    /// Get the mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Get the physical radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the display color
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Whether the body is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Set the static flag
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    /// Get the position
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Set the position
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Get the velocity
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Get the role-specific data
    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    /// Id of the parent body, for planets that have one
    pub fn parent_id(&self) -> Option<&BodyId> {
        match &self.kind {
            BodyKind::Planet { parent, .. } => parent.as_ref(),
            _ => None,
        }
    }

    /// Remaining fuel, for spacecraft
    pub fn fuel(&self) -> Option<f64> {
        match self.kind {
            BodyKind::Spacecraft { fuel, .. } => Some(fuel),
            _ => None,
        }
    }

    /// Gravitational view of this body
    pub fn point_mass(&self) -> PointMass {
        PointMass {
            position: self.position,
            mass: self.mass,
            is_static: self.is_static,
        }
    }

    /// Apply a force over `dt` seconds: `v += (F / m) * dt`
    ///
    /// Static bodies ignore forces.
    pub fn apply_force(&mut self, force: Vector3, dt: f64) {
        if self.is_static {
            return;
        }
        self.velocity += force * (dt / self.mass);
    }

    /// Advance the position by the current velocity: `x += v * dt`
    pub fn update_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Fire a spacecraft's engine along `direction` for `dt` seconds
    ///
    /// Returns `true` if thrust was applied. Bodies that are not spacecraft,
    /// static craft and craft without fuel are left untouched.
    pub fn apply_thrust(&mut self, direction: Vector3, dt: f64) -> bool {
        if self.is_static {
            return false;
        }
        let thrust_power = match self.kind {
            BodyKind::Spacecraft { thrust_power, fuel } if fuel > 0.0 => thrust_power,
            _ => return false,
        };

        let thrust = direction.normalize() * (thrust_power * dt);
        self.apply_force(thrust, dt);

        if let BodyKind::Spacecraft { fuel, .. } = &mut self.kind {
            *fuel = (*fuel - thrust.length() * FUEL_EFFICIENCY).max(0.0);
        }
        true
    }

    /// Linear momentum `m * v`
    pub fn momentum(&self) -> Vector3 {
        self.velocity * self.mass
    }

    /// Kinetic energy `0.5 * m * v²`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Distance between the centers of two bodies
    pub fn distance_to(&self, other: &Body) -> f64 {
        self.position.distance(other.position)
    }
}

/// A position in a body collection that may or may not hold a body
///
/// Implemented for `Body` (always present) and `Option<Body>` (absent
/// entries are skipped), so the stepper accepts both dense and sparse
/// collections.
pub trait BodySlot: Send + Sync {
    /// The body in this slot, if any
    fn body(&self) -> Option<&Body>;

    /// Mutable access to the body in this slot, if any
    fn body_mut(&mut self) -> Option<&mut Body>;
}

impl BodySlot for Body {
    fn body(&self) -> Option<&Body> {
        Some(self)
    }

    fn body_mut(&mut self) -> Option<&mut Body> {
        Some(self)
    }
}

impl BodySlot for Option<Body> {
    fn body(&self) -> Option<&Body> {
        self.as_ref()
    }

    fn body_mut(&mut self) -> Option<&mut Body> {
        self.as_mut()
    }
}
