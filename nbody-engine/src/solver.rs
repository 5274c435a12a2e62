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
//! Per-tick force computation over a freshly built octree
//!
//! [`ForceSolver`] owns the octree arena and a force buffer and reuses both
//! between ticks. Each call to [`ForceSolver::compute`] rebuilds the tree
//! from the current body positions, then queries the net force on every
//! present, non-static body.
//!
//! # Parallel Computation
//!
//! With the `parallel` feature the queries run on the Rayon thread pool.
//! This is safe without locking: the tree is fully built and read-only
//! before the first query, and each query writes only its own output slot.

use crate::body::BodySlot;
use crate::config::SolverConfig;
use crate::tree::Octree;
use crate::vector::Vector3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Builds the tree and evaluates forces for one tick
#[derive(Debug, Clone)]
pub struct ForceSolver {
    tree: Octree,
    forces: Vec<Option<Vector3>>,
}

impl ForceSolver {
    /// Create a solver with the given parameters
    pub fn new(config: SolverConfig) -> Self {
        ForceSolver {
            tree: Octree::new(config),
            forces: Vec::new(),
        }
    }

    /// Parameters used for building and querying
    pub fn config(&self) -> &SolverConfig {
        self.tree.config()
    }

    /// Replace the parameters; applies from the next [`ForceSolver::compute`]
    pub fn set_config(&mut self, config: SolverConfig) {
        self.tree.set_config(config);
    }

    /// Tree built by the most recent [`ForceSolver::compute`]
    pub fn tree(&self) -> &Octree {
        &self.tree
    }

    /// Rebuild the tree from `bodies` and compute the net force on each
    ///
    /// Entry `i` of the result is the force on slot `i`, or `None` if the
    /// slot is empty or holds a static body. Static bodies still take part
    /// in the tree and attract the others.
    pub fn compute<S: BodySlot>(&mut self, bodies: &[S]) -> &[Option<Vector3>] {
        self.tree.rebuild_slots(bodies);

        #[cfg(feature = "parallel")]
        {
            self.compute_parallel(bodies);
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.compute_sequential(bodies);
        }

        &self.forces
    }

    #[cfg(feature = "parallel")]
    fn compute_parallel<S: BodySlot>(&mut self, bodies: &[S]) {
        let tree = &self.tree;
        bodies
            .par_iter()
            .enumerate()
            .map(|(index, slot)| force_for_slot(tree, index, slot))
            .collect_into_vec(&mut self.forces);
    }

    #[cfg_attr(feature = "parallel", allow(dead_code))]
    fn compute_sequential<S: BodySlot>(&mut self, bodies: &[S]) {
        let tree = &self.tree;
        self.forces.clear();
        self.forces.extend(
            bodies
                .iter()
                .enumerate()
                .map(|(index, slot)| force_for_slot(tree, index, slot)),
        );
    }
}

fn force_for_slot<S: BodySlot>(tree: &Octree, index: usize, slot: &S) -> Option<Vector3> {
    match slot.body() {
        Some(body) if !body.is_static() => Some(tree.force_on(index)),
        Some(_) => None,
        None => {
            log::trace!("skipping empty body slot {}", index);
            None
        }
    }
}
