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
//! Arena node types for the octree
//!
//! Nodes reference each other by [`NodeId`] rather than pointers, so a whole
//! tree lives in one contiguous `Vec` and is released in one go.

use super::cube::Cube;
use crate::gravity::PointMass;
use crate::vector::Vector3;

/// Index into the node arena
///
/// Uses `u32` instead of `usize`; eight child slots per internal node make
/// the narrower index worthwhile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a leaf stands for
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LeafPayload {
    /// A real body
    Body {
        /// Index of the body in the collection the tree was built from
        index: usize,
        /// Snapshot of the body taken at build time
        point: PointMass,
    },
    /// Several coincident bodies merged into one point mass
    ///
    /// This is an approximation artifact, not a simulated entity: it has no
    /// id and never matches a query target.
    Aggregate {
        /// Summed mass of the merged bodies
        mass: f64,
        /// Position of the first merged body
        position: Vector3,
        /// Number of bodies merged
        count: usize,
    },
}

impl LeafPayload {
    /// The point mass this leaf exerts gravity with
    ///
    /// Aggregates are static: they stand in for bodies but never move.
    pub fn point_mass(&self) -> PointMass {
        match *self {
            LeafPayload::Body { point, .. } => point,
            LeafPayload::Aggregate { mass, position, .. } => PointMass::fixed(position, mass),
        }
    }

    /// Mass held by this leaf
    pub fn mass(&self) -> f64 {
        match *self {
            LeafPayload::Body { point, .. } => point.mass,
            LeafPayload::Aggregate { mass, .. } => mass,
        }
    }
}

/// A node in the octree arena
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node {
    /// A single body or merged cluster
    Leaf {
        /// The body or cluster this leaf holds
        payload: LeafPayload,
        /// Region the leaf occupies
        cube: Cube,
    },
    /// A subdivided region
    Internal {
        /// Region the node covers
        cube: Cube,
        /// One slot per octant; empty octants are `None`
        children: [Option<NodeId>; 8],
        /// Sum of all masses in the subtree
        total_mass: f64,
        /// Mass-weighted mean position of the subtree
        center_of_mass: Vector3,
    },
}

impl Node {
    /// Region covered by this node
    pub fn cube(&self) -> &Cube {
        match self {
            Node::Leaf { cube, .. } | Node::Internal { cube, .. } => cube,
        }
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Non-empty children in octant order (empty for leaves)
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        let slots: &[Option<NodeId>] = match self {
            Node::Internal { children, .. } => children,
            Node::Leaf { .. } => &[],
        };
        slots.iter().flatten().copied()
    }
}
