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
//! Error types
//!
//! Only construction-time and registry problems surface as errors. Numeric
//! edge cases inside the force computation are resolved locally (clamped to
//! zero force) and never reach the caller.

use std::error::Error;
use std::fmt;

/// Errors reported by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A body was constructed with non-positive or non-finite mass or radius
    InvalidBody {
        /// Id of the rejected body
        id: String,
        /// What was wrong with it
        reason: String,
    },
    /// A configuration value is out of its allowed range
    InvalidConfig {
        /// Name of the offending parameter
        parameter: &'static str,
        /// The rejected value
        value: f64,
    },
    /// No body with this id is registered
    UnknownBody(String),
    /// A body with this id is already registered
    DuplicateBody(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidBody { id, reason } => {
                write!(f, "invalid body {:?}: {}", id, reason)
            }
            EngineError::InvalidConfig { parameter, value } => {
                write!(f, "invalid value {} for {}", value, parameter)
            }
            EngineError::UnknownBody(id) => write!(f, "unknown body {:?}", id),
            EngineError::DuplicateBody(id) => write!(f, "duplicate body id {:?}", id),
        }
    }
}

impl Error for EngineError {}

/// Result alias used throughout the crate
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::InvalidBody {
            id: "earth".to_string(),
            reason: "mass must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "invalid body \"earth\": mass must be positive");

        let err = EngineError::InvalidConfig {
            parameter: "theta",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "invalid value -1 for theta");

        assert_eq!(
            EngineError::UnknownBody("moon".to_string()).to_string(),
            "unknown body \"moon\""
        );
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&EngineError::DuplicateBody("sun".to_string()));
    }
}
