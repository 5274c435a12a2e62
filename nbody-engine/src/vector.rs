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
//! Three-component vector math
//!
//! [`Vector3`] is a plain `Copy` value with double-precision components.
//! Every operation returns a new value; operands are never mutated, so
//! vectors can be passed around freely without pooling or aliasing concerns.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 3D vector with double-precision components
///
/// # Examples
///
/// ```
/// use nbody_engine::vector::Vector3;
///
/// let a = Vector3::new(1.0, 0.0, 0.0);
/// let b = Vector3::new(0.0, 1.0, 0.0);
/// assert_eq!(a.cross(b), Vector3::new(0.0, 0.0, 1.0));
/// assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// The zero vector
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new vector from its components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Create a vector from an array
    pub fn from_array(arr: [f64; 3]) -> Self {
        Vector3::new(arr[0], arr[1], arr[2])
    }

    /// Get the vector as an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise sum
    pub fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference `self - other`
    pub fn subtract(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Multiply every component by `scalar`
    pub fn scale(self, scalar: f64) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Dot product
    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product `self × other`
    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared Euclidean length
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction
    ///
    /// The zero vector normalizes to the zero vector instead of producing NaN.
    pub fn normalize(self) -> Vector3 {
        let length = self.length();
        if length == 0.0 {
            return Vector3::ZERO;
        }
        Vector3::new(self.x / length, self.y / length, self.z / length)
    }

    /// Distance between two points
    pub fn distance(self, other: Vector3) -> f64 {
        self.subtract(other).length()
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(arr: [f64; 3]) -> Self {
        Vector3::from_array(arr)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::add(self, rhs)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        self.scale(rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs.scale(self)
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

impl Sum for Vector3 {
    fn sum<I: Iterator<Item = Vector3>>(iter: I) -> Vector3 {
        iter.fold(Vector3::ZERO, |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_does_not_mutate_operands() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);

        assert_eq!(a.add(b), Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b.subtract(a), Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(a.scale(2.0), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_dot_and_cross() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = Vector3::new(0.0, 0.0, 1.0);

        assert_eq!(x.dot(y), 0.0);
        assert_eq!(x.dot(x), 1.0);
        assert_eq!(x.cross(y), z);
        assert_eq!(y.cross(x), -z);
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).dot(Vector3::new(4.0, -5.0, 6.0)), 12.0);
    }

    #[test]
    fn test_length_and_normalize() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.length_squared(), 25.0);

        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 1e-15);
        assert!((n.x - 0.6).abs() < 1e-15);
        assert!((n.y - 0.8).abs() < 1e-15);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        let n = Vector3::ZERO.normalize();
        assert_eq!(n, Vector3::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_operator_impls_match_methods() {
        let a = Vector3::new(1.0, -2.0, 0.5);
        let b = Vector3::new(-3.0, 4.0, 2.0);

        assert_eq!(a + b, a.add(b));
        assert_eq!(a - b, a.subtract(b));
        assert_eq!(a * 3.0, a.scale(3.0));
        assert_eq!(3.0 * a, a.scale(3.0));
        assert_eq!(a / 2.0, a.scale(0.5));

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn test_sum() {
        let total: Vector3 = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 3.0),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_is_finite() {
        assert!(Vector3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vector3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Vector3::new(0.0, f64::INFINITY, 0.0).is_finite());
    }
}
