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
//! Solar System N-Body Simulation Example
//!
//! Drives the inner solar system through the [`Simulation`] driver the way
//! an interactive front end would: fixed wall-clock frames, a time-scale
//! multiplier, and periodic energy reports.
//!
//! # Physical Constants
//!
//! All values use SI units (meters, kilograms, seconds) based on:
//! - NASA Planetary Fact Sheet: https://nssdc.gsfc.nasa.gov/planetary/factsheet/
//!
//! # Running
//!
//! ```bash
//! # One year at one day per frame with semi-implicit Euler
//! cargo run --example solar_system --release
//!
//! # Velocity Verlet, one hour per frame, for 90 days
//! RUST_LOG=debug cargo run --example solar_system --release -- \
//!     --integrator verlet --time-scale 3600 --days 90
//! ```

use nbody_engine::config::DEFAULT_TIME_SCALE;
use nbody_engine::integration::{Integrator, SemiImplicitEuler, VelocityVerlet};
use nbody_engine::{
    Body, BodyId, BodyKind, EngineResult, Simulation, SimulationConfig, Vector3,
};

/// Astronomical Unit in meters (average Earth-Sun distance)
const AU: f64 = 1.495978707e11;

/// One Earth day in seconds
const DAY: f64 = 86400.0;

struct Planet {
    name: &'static str,
    mass: f64,             // kg
    radius: f64,           // m
    distance: f64,         // m (semi-major axis)
    orbital_velocity: f64, // m/s
    color: [f32; 3],
    gas_giant: bool,
}

const PLANETS: &[Planet] = &[
    Planet {
        name: "mercury",
        mass: 3.301e23,
        radius: 2.4397e6,
        distance: 0.387 * AU,
        orbital_velocity: 47_870.0,
        color: [0.7, 0.7, 0.7],
        gas_giant: false,
    },
    Planet {
        name: "venus",
        mass: 4.867e24,
        radius: 6.0518e6,
        distance: 0.723 * AU,
        orbital_velocity: 35_020.0,
        color: [1.0, 0.8, 0.4],
        gas_giant: false,
    },
    Planet {
        name: "earth",
        mass: 5.972e24,
        radius: 6.371e6,
        distance: AU,
        orbital_velocity: 29_780.0,
        color: [0.2, 0.6, 1.0],
        gas_giant: false,
    },
    Planet {
        name: "mars",
        mass: 6.417e23,
        radius: 3.3895e6,
        distance: 1.524 * AU,
        orbital_velocity: 24_070.0,
        color: [1.0, 0.4, 0.2],
        gas_giant: false,
    },
    Planet {
        name: "jupiter",
        mass: 1.898e27,
        radius: 6.9911e7,
        distance: 5.203 * AU,
        orbital_velocity: 13_070.0,
        color: [0.8, 0.6, 0.3],
        gas_giant: true,
    },
];

struct Options {
    integrator: String,
    time_scale: f64,
    days: f64,
}

fn parse_args() -> Options {
    let mut options = Options {
        integrator: "euler".to_string(),
        time_scale: DEFAULT_TIME_SCALE,
        days: 365.25,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--integrator", Some(v)) => options.integrator = v.clone(),
            ("--time-scale", Some(v)) => match v.parse() {
                Ok(scale) => options.time_scale = scale,
                Err(_) => log::warn!("invalid --time-scale {}, keeping default", v),
            },
            ("--days", Some(v)) => match v.parse() {
                Ok(days) => options.days = days,
                Err(_) => log::warn!("invalid --days {}, keeping default", v),
            },
            (flag, _) => log::warn!("ignoring argument {}", flag),
        }
        i += 2;
    }
    options
}

fn build_scene() -> EngineResult<Vec<Body>> {
    let mut bodies = vec![Body::new(
        "sun",
        1.989e30,
        6.9634e8,
        [1.0, 0.9, 0.2],
        Vector3::ZERO,
        Vector3::ZERO,
    )?
    .with_static(true)
    .with_kind(BodyKind::Star {
        luminosity: 3.828e26,
    })];

    for planet in PLANETS {
        let body = Body::new(
            planet.name,
            planet.mass,
            planet.radius,
            planet.color,
            Vector3::new(planet.distance, 0.0, 0.0),
            Vector3::new(0.0, planet.orbital_velocity, 0.0),
        )?
        .with_kind(BodyKind::Planet {
            parent: Some(BodyId::from("sun")),
            gas_giant: planet.gas_giant,
        });
        bodies.push(body);
    }

    Ok(bodies)
}

fn run<I: Integrator>(integrator: I, options: &Options) -> EngineResult<()> {
    let config = SimulationConfig {
        time_scale: options.time_scale,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::with_integrator(integrator, config)?;
    sim.add_bodies(build_scene()?)?;

    println!(
        "Integrator: {}, {} bodies, {:.0} simulated s per frame",
        sim.stepper().integrator().name(),
        sim.body_count(),
        sim.time_scale()
    );

    let initial_energy = sim.diagnostics().total_energy();
    let frames = (options.days * DAY / sim.time_scale()).ceil() as usize;
    let report_every = (frames / 12).max(1);

    for frame in 1..=frames {
        sim.update(1.0);

        if frame % report_every == 0 || frame == frames {
            let diagnostics = sim.diagnostics();
            let drift = (diagnostics.total_energy() - initial_energy) / initial_energy.abs();
            println!("\nDay {:.1}: energy drift {:+.3e}", sim.elapsed() / DAY, drift);

            for body in sim.bodies().iter().filter(|b| !b.is_static()) {
                let parent = sim.parent_of(body.id().as_str())?;
                let distance = parent.map_or(0.0, |p| body.distance_to(p));
                println!(
                    "  {:<8} {:.4} AU from {}",
                    body.id(),
                    distance / AU,
                    parent.map_or("nothing", |p| p.id().as_str())
                );
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let options = parse_args();

    match options.integrator.as_str() {
        "verlet" => run(VelocityVerlet, &options)?,
        "euler" => run(SemiImplicitEuler, &options)?,
        other => {
            log::warn!("unknown integrator {}, using euler", other);
            run(SemiImplicitEuler, &options)?
        }
    }
    Ok(())
}
