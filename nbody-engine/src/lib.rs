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
//! # N-Body Engine
//!
//! A gravitational N-body engine that approximates the O(n²) pairwise force
//! sum in O(n log n) with a Barnes-Hut octree.
//!
//! ## Features
//!
//! - **Barnes-Hut Octree**: Arena-allocated tree rebuilt every step, with an
//!   opening-angle test controlled by `theta`
//! - **Newtonian Gravity**: Pairwise force law with clamps for coincident and
//!   extremely distant pairs
//! - **Degenerate Clusters**: Coincident bodies merge into aggregate leaves,
//!   so the build always terminates
//! - **Parallelization**: Optional Rayon integration for multi-threaded
//!   force queries
//! - **Simulation Driver**: Id registry, time scale, pause, spacecraft thrust
//!   and diagnostics
//!
//! ## Example
//!
//! ```rust
//! use nbody_engine::{Body, Stepper, Vector3};
//!
//! let make = |id: &str, x: f64| {
//!     Body::new(id, 1.0e20, 1.0, [1.0; 3], Vector3::new(x, 0.0, 0.0), Vector3::ZERO).unwrap()
//! };
//! let mut bodies = vec![Some(make("a", 0.0)), None, Some(make("b", 1.0e4))];
//!
//! let mut stepper = Stepper::default();
//! assert_eq!(stepper.advance(&mut bodies, 1.0), 2);
//! ```

#![warn(missing_docs)]

/// Simulated bodies and their kinds
pub mod body;

/// Solver and driver parameters
pub mod config;

/// Error types
pub mod error;

/// Pairwise gravity
pub mod gravity;

/// Numerical integration methods
pub mod integration;

/// Id-indexed simulation driver
pub mod simulation;

/// Tree build and force evaluation for one tick
pub mod solver;

/// One simulation step
pub mod stepper;

/// Barnes-Hut octree
pub mod tree;

/// 3D vector math
pub mod vector;

pub use body::{Body, BodyId, BodyKind, BodySlot};
pub use config::{SimulationConfig, SolverConfig};
pub use error::{EngineError, EngineResult};
pub use simulation::Simulation;
pub use stepper::{advance, Stepper};
pub use tree::Octree;
pub use vector::Vector3;
