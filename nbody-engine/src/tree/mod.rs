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
//! Arena-based Barnes-Hut octree
//!
//! The tree is rebuilt from scratch every simulation step. All nodes live in
//! one `Vec` and reference each other by [`NodeId`]; rebuilding clears the
//! arena but keeps its allocation, so a long-running stepper stops
//! allocating after the first few ticks.
//!
//! # Construction
//!
//! 1. The root cube encloses every body: its size is the largest per-axis
//!    span and its center the bounding-box midpoint.
//! 2. A region with one body becomes a leaf. A region with several bodies is
//!    split into eight octants; each non-empty octant gets a child cube of
//!    half the size, centered one half-size away on each axis.
//! 3. Coincident clusters are not subdivided. When the child half-size drops
//!    below [`MIN_HALF_SIZE`], or every body in an octant lies within
//!    [`COINCIDENCE_TOLERANCE`] of the first one, the octant becomes a single
//!    [`LeafPayload::Aggregate`] holding the summed mass at the first body's
//!    position. This bounds the depth for stacked bodies.
//! 4. Internal nodes store the total mass and center of mass of their
//!    subtree.
//!
//! # Query
//!
//! [`Octree::force_on`] descends from the root. A leaf holding the target
//! itself contributes nothing. An internal node whose `size / distance` is
//! below θ is replaced by one static point mass at its center of mass;
//! otherwise its children are summed. θ = 0 always descends and reproduces
//! exact pairwise summation.
//! [`Octree::force_on_body`] runs the same query for a [`Body`], finding its
//! leaf by id instead of by index.
//!
//! # Example
//!
//! ```
//! use nbody_engine::config::SolverConfig;
//! use nbody_engine::gravity::PointMass;
//! use nbody_engine::tree::Octree;
//! use nbody_engine::vector::Vector3;
//!
//! let bodies = vec![
//!     PointMass::fixed(Vector3::ZERO, 1.989e30),
//!     PointMass::new(Vector3::new(1.496e11, 0.0, 0.0), 5.972e24),
//! ];
//!
//! let tree = Octree::build(&bodies, &SolverConfig::default());
//! let force = tree.force_on(1);
//! assert!(force.x < 0.0); // toward the sun
//! ```

mod cube;
mod node;

pub use cube::Cube;
pub use node::{LeafPayload, Node, NodeId};

use crate::body::{Body, BodyId, BodySlot};
use crate::config::SolverConfig;
use crate::gravity::{pairwise_force, PointMass};
use crate::vector::Vector3;

/// Default Barnes-Hut opening angle
pub const DEFAULT_THETA: f64 = 0.5;

/// Child half-size below which clusters are merged instead of subdivided
pub const MIN_HALF_SIZE: f64 = 1e-10;

/// Bodies this close to the first body of their octant count as coincident
pub const COINCIDENCE_TOLERANCE: f64 = 1e-6;

/// Subdivision depth past which a cube with non-finite geometry is merged
///
/// Finite cubes are always split further: halving them reaches
/// [`MIN_HALF_SIZE`] within about 1100 levels, and well-separated
/// bodies in a huge root cube may need more than this many levels before
/// they land in different octants. Infinite or NaN cubes never shrink, so
/// they stop here.
pub const MAX_DEPTH: usize = 128;

/// Shape summary of a built tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Total nodes in the arena
    pub node_count: usize,
    /// Internal (subdivided) nodes
    pub internal_count: usize,
    /// Leaves holding a single real body
    pub body_leaf_count: usize,
    /// Leaves holding a merged cluster
    pub aggregate_leaf_count: usize,
    /// Longest root-to-leaf path, counting the root as depth 0
    pub max_depth: usize,
}

/// Barnes-Hut octree over a snapshot of point masses
///
/// The tree copies positions and masses at build time, so it never observes
/// bodies being integrated afterwards. Bodies are identified by their index
/// in the collection the tree was built from; trees built from [`Body`]
/// values also record each body's id for [`Octree::force_on_body`].
#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<Node>,
    snapshot: Vec<Option<PointMass>>,
    ids: Vec<Option<BodyId>>,
    scratch: Vec<(usize, PointMass)>,
    root: Option<NodeId>,
    config: SolverConfig,
}

impl Octree {
    /// Create an empty tree that uses `config` for building and queries
    pub fn new(config: SolverConfig) -> Self {
        Octree {
            nodes: Vec::new(),
            snapshot: Vec::new(),
            ids: Vec::new(),
            scratch: Vec::new(),
            root: None,
            config,
        }
    }

    /// Build a tree over `bodies`; body `i` is identified by index `i`
    pub fn build(bodies: &[PointMass], config: &SolverConfig) -> Self {
        let mut tree = Octree::new(*config);
        tree.rebuild(bodies.iter().copied().map(Some));
        tree
    }

    /// Build a tree over a slice of bodies
    pub fn from_bodies(bodies: &[Body], config: &SolverConfig) -> Self {
        let mut tree = Octree::new(*config);
        tree.rebuild_slots(bodies);
        tree
    }

    /// Build a tree over a sparse collection; absent slots are skipped
    pub fn from_slots(slots: &[Option<Body>], config: &SolverConfig) -> Self {
        let mut tree = Octree::new(*config);
        tree.rebuild_slots(slots);
        tree
    }

    /// Rebuild from a body collection, recording ids alongside positions
    ///
    /// Slot `i` is identified by index `i` and by its body's id; empty slots
    /// take no part in the tree.
    pub fn rebuild_slots<S: BodySlot>(&mut self, slots: &[S]) {
        self.rebuild(slots.iter().map(|slot| slot.body().map(Body::point_mass)));
        self.ids.extend(slots.iter().map(|slot| slot.body().map(|body| body.id().clone())));
    }

    /// Discard the current tree and build a new one, reusing the arena
    ///
    /// Item `i` of `points` is identified by index `i`; `None` items take no
    /// part in the tree. Bare point masses carry no ids, so
    /// [`Octree::force_on_body`] finds no match until the next
    /// [`Octree::rebuild_slots`].
    pub fn rebuild<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Option<PointMass>>,
    {
        self.nodes.clear();
        self.ids.clear();
        self.snapshot.clear();
        self.snapshot.extend(points);

        let mut entries = std::mem::take(&mut self.scratch);
        entries.clear();
        entries.extend(
            self.snapshot
                .iter()
                .enumerate()
                .filter_map(|(index, point)| point.map(|p| (index, p))),
        );

        let root_cube = Cube::enclosing(entries.iter().map(|(_, p)| p.position));
        self.root = match root_cube {
            Some(cube) => self.build_node(&mut entries, cube, 0),
            None => None,
        };

        log::trace!(
            "built octree over {} bodies with {} nodes",
            entries.len(),
            self.nodes.len()
        );
        self.scratch = entries;
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn build_node(
        &mut self,
        entries: &mut [(usize, PointMass)],
        cube: Cube,
        depth: usize,
    ) -> Option<NodeId> {
        match entries {
            [] => None,

            [(index, point)] => Some(self.push(Node::Leaf {
                payload: LeafPayload::Body {
                    index: *index,
                    point: *point,
                },
                cube,
            })),

            entries => {
                // Stable sort keeps bodies in input order within each octant,
                // so the first body of a merged cluster is deterministic.
                entries.sort_by_key(|(_, p)| cube.octant_of(p.position));

                let half = cube.half_size();
                let mut children = [None; 8];
                let mut total_mass = 0.0;
                let mut weighted = Vector3::ZERO;

                let mut start = 0;
                while start < entries.len() {
                    let octant = cube.octant_of(entries[start].1.position);
                    let len = entries[start..]
                        .iter()
                        .take_while(|(_, p)| cube.octant_of(p.position) == octant)
                        .count();
                    let group = &mut entries[start..start + len];
                    start += len;

                    let child_cube = cube.child(octant);
                    let child = if self.should_merge(group, &child_cube, half, depth) {
                        Some(self.push(aggregate_leaf(group, child_cube)))
                    } else {
                        self.build_node(group, child_cube, depth + 1)
                    };

                    if let Some(id) = child {
                        let (mass, center) = self.mass_properties(id);
                        total_mass += mass;
                        weighted += center * mass;
                        children[octant] = Some(id);
                    }
                }

                let center_of_mass = if total_mass > 0.0 {
                    weighted / total_mass
                } else {
                    Vector3::ZERO
                };

                Some(self.push(Node::Internal {
                    cube,
                    children,
                    total_mass,
                    center_of_mass,
                }))
            }
        }
    }

    fn should_merge(
        &self,
        group: &[(usize, PointMass)],
        cube: &Cube,
        half: f64,
        depth: usize,
    ) -> bool {
        if group.len() < 2 {
            return false;
        }
        if half < self.config.min_half_size() {
            return true;
        }
        if depth + 1 >= MAX_DEPTH && !cube.is_finite() {
            return true;
        }
        let first = group[0].1.position;
        let tolerance = self.config.coincidence_tolerance();
        // NaN distances compare false and count as coincident
        !group[1..]
            .iter()
            .any(|(_, p)| first.distance(p.position) > tolerance)
    }

    /// Mass and mass center of a node
    pub fn mass_properties(&self, id: NodeId) -> (f64, Vector3) {
        match self.nodes[id.index()] {
            Node::Leaf { payload, .. } => {
                let point = payload.point_mass();
                (point.mass, point.position)
            }
            Node::Internal {
                total_mass,
                center_of_mass,
                ..
            } => (total_mass, center_of_mass),
        }
    }

    /// Net force on the body with index `index`
    ///
    /// Returns zero for an empty tree or an index that took no part in the
    /// build.
    pub fn force_on(&self, index: usize) -> Vector3 {
        match self.snapshot.get(index).copied().flatten() {
            Some(target) => self.force_at(&target, Some(index)),
            None => Vector3::ZERO,
        }
    }

    /// Net force on `body`, matched to the tree by id
    ///
    /// If a body with the same id took part in the build, its own leaf is
    /// excluded. A body the tree has never seen feels every leaf. The force
    /// is evaluated at the position and mass of `body` as passed, not the
    /// snapshot. Finding the id is a linear scan.
    pub fn force_on_body(&self, body: &Body) -> Vector3 {
        let index = self.index_of(body.id());
        self.force_at(&body.point_mass(), index)
    }

    /// Index of the body with id `id` in the last build, if any
    pub fn index_of(&self, id: &BodyId) -> Option<usize> {
        self.ids.iter().position(|entry| entry.as_ref() == Some(id))
    }

    /// Net force on an arbitrary point mass
    ///
    /// `exclude` names a body whose own leaf should not contribute, which is
    /// how self-interaction is suppressed.
    pub fn force_at(&self, target: &PointMass, exclude: Option<usize>) -> Vector3 {
        match self.root {
            Some(root) => self.force_recursive(root, target, exclude),
            None => Vector3::ZERO,
        }
    }

    fn force_recursive(&self, id: NodeId, target: &PointMass, exclude: Option<usize>) -> Vector3 {
        match &self.nodes[id.index()] {
            Node::Leaf {
                payload: LeafPayload::Body { index, .. },
                ..
            } if Some(*index) == exclude => Vector3::ZERO,

            Node::Leaf { payload, .. } => {
                pairwise_force(target, &payload.point_mass(), &self.config)
            }

            Node::Internal {
                cube,
                children,
                total_mass,
                center_of_mass,
            } => {
                let distance = target.position.distance(cube.center);
                if cube.size / distance < self.config.theta() {
                    let equivalent = PointMass::fixed(*center_of_mass, *total_mass);
                    pairwise_force(target, &equivalent, &self.config)
                } else {
                    children
                        .iter()
                        .flatten()
                        .map(|&child| self.force_recursive(child, target, exclude))
                        .sum()
                }
            }
        }
    }

    /// Root node, or `None` for an empty tree
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// All nodes in arena order (children before their parent)
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no bodies
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Snapshot of the body with index `index`, if it took part in the build
    pub fn body(&self, index: usize) -> Option<&PointMass> {
        self.snapshot.get(index).and_then(Option::as_ref)
    }

    /// Configuration used by this tree
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replace the configuration; takes effect at the next rebuild or query
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    /// Total mass of all bodies in the tree
    pub fn total_mass(&self) -> f64 {
        self.root.map_or(0.0, |root| self.mass_properties(root).0)
    }

    /// Center of mass of all bodies in the tree
    pub fn center_of_mass(&self) -> Vector3 {
        self.root
            .map_or(Vector3::ZERO, |root| self.mass_properties(root).1)
    }

    /// Count nodes by kind and measure the depth
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: self.nodes.len(),
            ..TreeStats::default()
        };

        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            let node = self.node(id);
            match node {
                Node::Leaf {
                    payload: LeafPayload::Body { .. },
                    ..
                } => stats.body_leaf_count += 1,
                Node::Leaf { .. } => stats.aggregate_leaf_count += 1,
                Node::Internal { .. } => stats.internal_count += 1,
            }
            stack.extend(node.children().map(|child| (child, depth + 1)));
        }

        stats
    }
}

fn aggregate_leaf(group: &[(usize, PointMass)], cube: Cube) -> Node {
    let mass = group.iter().map(|(_, p)| p.mass).sum();
    Node::Leaf {
        payload: LeafPayload::Aggregate {
            mass,
            position: group[0].1.position,
            count: group.len(),
        },
        cube,
    }
}
