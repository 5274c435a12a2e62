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
//! Axis-aligned cubes used to partition space

use crate::vector::Vector3;

/// A cubic region described by its center and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    /// Geometric center
    pub center: Vector3,
    /// Edge length used by the opening-angle test
    pub size: f64,
}

impl Cube {
    /// Create a cube from its center and size
    pub fn new(center: Vector3, size: f64) -> Self {
        Cube { center, size }
    }

    /// Smallest cube enclosing all `points`, or `None` if there are none
    ///
    /// The size is the largest per-axis span and the center is the midpoint
    /// of the bounding box, not the centroid of the points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut points = points.into_iter().peekable();
        points.peek()?;

        let (min, max) = points.fold(
            (
                Vector3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
                Vector3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(min, max), p| {
                (
                    Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                    Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
                )
            },
        );

        let size = (max.x - min.x).max(max.y - min.y).max(max.z - min.z);
        let center = Vector3::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        );
        Some(Cube { center, size })
    }

    /// Whether the center and size are all finite
    pub fn is_finite(&self) -> bool {
        self.size.is_finite() && self.center.is_finite()
    }

    /// Half of the edge length
    pub fn half_size(&self) -> f64 {
        self.size / 2.0
    }

    /// Octant (0-7) of `point` relative to the center
    ///
    /// Bit 4 is set above the center on x, bit 2 on y and bit 1 on z.
    /// Points exactly on a dividing plane fall on the lower side.
    pub fn octant_of(&self, point: Vector3) -> usize {
        let mut index = 0;
        if point.x > self.center.x {
            index |= 4;
        }
        if point.y > self.center.y {
            index |= 2;
        }
        if point.z > self.center.z {
            index |= 1;
        }
        index
    }

    /// Cube for one octant: half the size, center offset by the half-size
    pub fn child(&self, octant: usize) -> Cube {
        debug_assert!(octant < 8, "octant out of range");
        let half = self.half_size();
        let offset = |bit: usize| if octant & bit != 0 { half } else { -half };
        Cube {
            center: self.center + Vector3::new(offset(4), offset(2), offset(1)),
            size: half,
        }
    }
}
