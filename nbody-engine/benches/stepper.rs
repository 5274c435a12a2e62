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
//! Benchmarks for whole simulation steps
//!
//! Compares the two integrators and, with the `parallel` feature, shows
//! how force queries scale across threads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nbody_engine::integration::{SemiImplicitEuler, VelocityVerlet};
use nbody_engine::{Body, SolverConfig, Stepper, Vector3};

// Bodies on a thin disc around a static central mass
fn setup_disc(count: usize) -> Vec<Option<Body>> {
    let mut bodies = Vec::with_capacity(count + 1);
    bodies.push(Some(
        Body::new("center", 2e30, 7e8, [1.0, 1.0, 0.5], Vector3::ZERO, Vector3::ZERO)
            .unwrap()
            .with_static(true),
    ));

    for i in 0..count {
        let angle = i as f64 * 2.399_963; // golden angle
        let radius = 5e10 + 1e8 * i as f64;
        let speed = (6.674e-11 * 2e30 / radius).sqrt();
        let body = Body::new(
            format!("p{}", i),
            1e20,
            1e5,
            [0.8, 0.8, 0.8],
            Vector3::new(radius * angle.cos(), radius * angle.sin(), 0.0),
            Vector3::new(-speed * angle.sin(), speed * angle.cos(), 0.0),
        )
        .unwrap();
        bodies.push(Some(body));
    }
    bodies
}

fn bench_integrators(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.sample_size(20);

    for count in [100, 1_000, 5_000] {
        let template = setup_disc(count);
        group.throughput(Throughput::Elements(count as u64));

        let mut euler = Stepper::with_integrator(SemiImplicitEuler, SolverConfig::default());
        let mut bodies = template.clone();
        group.bench_function(BenchmarkId::new("euler", count), |b| {
            b.iter(|| black_box(euler.advance(&mut bodies, 3600.0)));
        });

        let mut verlet = Stepper::with_integrator(VelocityVerlet, SolverConfig::default());
        let mut bodies = template.clone();
        group.bench_function(BenchmarkId::new("verlet", count), |b| {
            b.iter(|| black_box(verlet.advance(&mut bodies, 3600.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_integrators);
criterion_main!(benches);
