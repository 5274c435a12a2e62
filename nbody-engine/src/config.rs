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
//! Solver and simulation configuration
//!
//! The defaults reproduce the standard solver: G = 6.674e-11, an opening
//! angle of 0.5, force clamps at 1e-5 and 1e16 meters, and degenerate
//! cluster merging below a 1e-10 half-size or within 1e-6 of each other.
//! Setters validate their input and return [`EngineError::InvalidConfig`]
//! rather than panicking.
//!
//! # Example
//!
//! ```
//! use nbody_engine::config::SolverConfig;
//!
//! let config = SolverConfig::default().with_theta(0.3).unwrap();
//! assert_eq!(config.theta(), 0.3);
//! assert!(SolverConfig::default().with_theta(-1.0).is_err());
//! ```

use crate::error::{EngineError, EngineResult};
use crate::gravity::{GRAVITATIONAL_CONSTANT, MAX_FORCE_DISTANCE, MIN_FORCE_DISTANCE};
use crate::tree::{COINCIDENCE_TOLERANCE, DEFAULT_THETA, MIN_HALF_SIZE};

/// Default simulated seconds per wall-clock second (one day)
pub const DEFAULT_TIME_SCALE: f64 = 86_400.0;

/// Lower bound for the simulation time-scale multiplier
pub const MIN_TIME_SCALE: f64 = 0.1;

/// Upper bound for the simulation time-scale multiplier
pub const MAX_TIME_SCALE: f64 = 1e6;

/// Parameters of the force solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    gravitational_constant: f64,
    theta: f64,
    min_distance: f64,
    max_distance: f64,
    min_half_size: f64,
    coincidence_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            theta: DEFAULT_THETA,
            min_distance: MIN_FORCE_DISTANCE,
            max_distance: MAX_FORCE_DISTANCE,
            min_half_size: MIN_HALF_SIZE,
            coincidence_tolerance: COINCIDENCE_TOLERANCE,
        }
    }
}

fn check_non_negative(parameter: &'static str, value: f64) -> EngineResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        log::warn!("rejected {} = {}", parameter, value);
        Err(EngineError::InvalidConfig { parameter, value })
    }
}

impl SolverConfig {
    /// Create a configuration with the default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Gravitational constant in m³/(kg⋅s²)
    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    /// Opening angle used by the tree query
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Pairs closer than this exert no force
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Pairs farther than this exert no force
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Child half-size below which the tree stops subdividing
    pub fn min_half_size(&self) -> f64 {
        self.min_half_size
    }

    /// Bodies within this distance of each other are merged into one leaf
    pub fn coincidence_tolerance(&self) -> f64 {
        self.coincidence_tolerance
    }

    /// Set the gravitational constant
    pub fn set_gravitational_constant(&mut self, g: f64) -> EngineResult<()> {
        check_non_negative("gravitational_constant", g)?;
        self.gravitational_constant = g;
        Ok(())
    }

    /// Set the opening angle
    ///
    /// Zero disables the approximation and degenerates to exact pairwise
    /// summation.
    pub fn set_theta(&mut self, theta: f64) -> EngineResult<()> {
        check_non_negative("theta", theta)?;
        self.theta = theta;
        Ok(())
    }

    /// Set the force cut-off distances
    pub fn set_distance_limits(&mut self, min: f64, max: f64) -> EngineResult<()> {
        check_non_negative("min_distance", min)?;
        if max.is_nan() || max <= min {
            log::warn!("rejected max_distance = {} (min_distance = {})", max, min);
            return Err(EngineError::InvalidConfig {
                parameter: "max_distance",
                value: max,
            });
        }
        self.min_distance = min;
        self.max_distance = max;
        Ok(())
    }

    /// Set the degenerate-cluster thresholds
    pub fn set_cluster_limits(&mut self, min_half_size: f64, tolerance: f64) -> EngineResult<()> {
        check_non_negative("min_half_size", min_half_size)?;
        check_non_negative("coincidence_tolerance", tolerance)?;
        self.min_half_size = min_half_size;
        self.coincidence_tolerance = tolerance;
        Ok(())
    }

    /// Builder form of [`SolverConfig::set_gravitational_constant`]
    pub fn with_gravitational_constant(mut self, g: f64) -> EngineResult<Self> {
        self.set_gravitational_constant(g)?;
        Ok(self)
    }

    /// Builder form of [`SolverConfig::set_theta`]
    pub fn with_theta(mut self, theta: f64) -> EngineResult<Self> {
        self.set_theta(theta)?;
        Ok(self)
    }

    /// Builder form of [`SolverConfig::set_distance_limits`]
    pub fn with_distance_limits(mut self, min: f64, max: f64) -> EngineResult<Self> {
        self.set_distance_limits(min, max)?;
        Ok(self)
    }

    /// Re-check every parameter
    pub fn validate(&self) -> EngineResult<()> {
        check_non_negative("gravitational_constant", self.gravitational_constant)?;
        check_non_negative("theta", self.theta)?;
        check_non_negative("min_distance", self.min_distance)?;
        if self.max_distance.is_nan() || self.max_distance <= self.min_distance {
            return Err(EngineError::InvalidConfig {
                parameter: "max_distance",
                value: self.max_distance,
            });
        }
        check_non_negative("min_half_size", self.min_half_size)?;
        check_non_negative("coincidence_tolerance", self.coincidence_tolerance)
    }
}

/// Parameters of the [`Simulation`](crate::simulation::Simulation) driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Solver parameters for every tick
    pub solver: SolverConfig,
    /// Initial simulated seconds per wall-clock second
    pub time_scale: f64,
    /// Whether the simulation starts paused
    pub start_paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            solver: SolverConfig::default(),
            time_scale: DEFAULT_TIME_SCALE,
            start_paused: false,
        }
    }
}

impl SimulationConfig {
    /// Check the solver parameters and the initial time scale
    pub fn validate(&self) -> EngineResult<()> {
        self.solver.validate()?;
        if !(MIN_TIME_SCALE..=MAX_TIME_SCALE).contains(&self.time_scale) {
            return Err(EngineError::InvalidConfig {
                parameter: "time_scale",
                value: self.time_scale,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.gravitational_constant(), 6.674e-11);
        assert_eq!(config.theta(), 0.5);
        assert_eq!(config.min_distance(), 1e-5);
        assert_eq!(config.max_distance(), 1e16);
        assert_eq!(config.min_half_size(), 1e-10);
        assert_eq!(config.coincidence_tolerance(), 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_theta_zero_is_allowed() {
        let config = SolverConfig::new().with_theta(0.0).unwrap();
        assert_eq!(config.theta(), 0.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = SolverConfig::new();
        assert!(matches!(
            config.set_theta(f64::NAN),
            Err(EngineError::InvalidConfig {
                parameter: "theta",
                ..
            })
        ));
        assert!(config.set_theta(-0.1).is_err());
        assert!(config.set_gravitational_constant(f64::INFINITY).is_err());
        assert!(config.set_distance_limits(1.0, 0.5).is_err());
        assert!(config.set_distance_limits(-1.0, 10.0).is_err());
        assert!(config.set_cluster_limits(-1.0, 0.0).is_err());

        // Rejected setters leave the previous values in place
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_simulation_config_time_scale_bounds() {
        let mut config = SimulationConfig::default();
        assert!(config.validate().is_ok());

        config.time_scale = MAX_TIME_SCALE * 2.0;
        assert!(config.validate().is_err());

        config.time_scale = MIN_TIME_SCALE / 2.0;
        assert!(config.validate().is_err());
    }
}
