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
//! Cluster Collapse Example
//!
//! A cold, roughly spherical cloud collapsing under its own gravity. A
//! handful of bodies start stacked on the same point to show how the tree
//! merges coincident bodies into aggregate leaves instead of subdividing
//! forever.
//!
//! ```bash
//! RUST_LOG=info cargo run --example cluster_collapse --release
//! ```

use nbody_engine::{Body, EngineResult, SolverConfig, Stepper, Vector3};

const BODY_COUNT: usize = 2_000;
const STACKED: usize = 16;
const CLOUD_RADIUS: f64 = 1e13;
const STEP: f64 = 3.0 * 86_400.0;
const STEPS: usize = 50;

fn build_cloud() -> EngineResult<Vec<Option<Body>>> {
    let mut state: u64 = 12_345;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let mut bodies = Vec::with_capacity(BODY_COUNT + STACKED);
    for i in 0..BODY_COUNT {
        let position = loop {
            let mut coordinate = || 2.0 * next() - 1.0;
            let candidate = Vector3::new(coordinate(), coordinate(), coordinate());
            if candidate.length_squared() <= 1.0 {
                break candidate * CLOUD_RADIUS;
            }
        };
        bodies.push(Some(Body::new(
            format!("star-{}", i),
            2e30,
            7e8,
            [1.0, 1.0, 1.0],
            position,
            Vector3::ZERO,
        )?));
    }

    // Stacked bodies share one coordinate exactly
    for i in 0..STACKED {
        bodies.push(Some(Body::new(
            format!("stacked-{}", i),
            1e29,
            1e8,
            [1.0, 0.3, 0.3],
            Vector3::new(0.25 * CLOUD_RADIUS, 0.0, 0.0),
            Vector3::ZERO,
        )?));
    }

    Ok(bodies)
}

fn main() -> EngineResult<()> {
    env_logger::init();

    let mut bodies = build_cloud()?;
    let mut stepper = Stepper::new(SolverConfig::default());

    println!("step  nodes  depth  aggregates  mean radius (AU)");
    for step in 0..=STEPS {
        if step > 0 {
            stepper.advance(&mut bodies, STEP);
        }
        if step % 10 == 0 {
            let stats = stepper.tree().stats();
            let (sum, count) = bodies
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(sum, count), b| (sum + b.position().length(), count + 1));
            println!(
                "{:>4}  {:>5}  {:>5}  {:>10}  {:>16.2}",
                step,
                stats.node_count,
                stats.max_depth,
                stats.aggregate_leaf_count,
                sum / count.max(1) as f64 / 1.496e11
            );
        }
    }
    log::info!("collapse finished after {} steps", STEPS);
    Ok(())
}
