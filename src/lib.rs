//! # Astrarium
//! This library crate is a Keplerian orbit kernel for hierarchies of
//! celestial bodies: a star, its planets, their moons, and so on.
//!
//! Every body follows a fixed two-body orbit around its parent. Positions are
//! never integrated step by step; instead the orbit is evaluated analytically
//! at whatever time is asked for, by solving Kepler's equation. This keeps
//! the simulation stable no matter how far or how fast the clock moves.
//!
//! Circular, elliptical, parabolic and hyperbolic orbits are all supported.
//!
//! ## Getting started
//! The main types are:
//! - [`Orbit`]: the six orbital elements of a body plus the gravitational
//!   parameter of its parent. It answers every per-orbit question (anomalies,
//!   radius, speed, energy, period) and can [`render`][Orbit::render] itself
//!   at a given time.
//! - [`Body`]: a named mass with a radius and an optional orbit.
//! - [`Astrarium`]: the hierarchy. It owns every body, keeps the simulation
//!   clock, caches each body's rendered state and composes absolute positions.
//!
//! Orbits can also be derived from a position and a velocity with
//! [`Orbit::from_position_and_velocity`].
//!
//! The [`presets`] module builds a few ready-made systems, and the
//! [`solvers`] module exposes the raw Kepler equation solvers.
//!
//! Simulation time is an integer number of milliseconds. Everything else is in
//! SI units: meters, seconds, kilograms and radians.
//!
//! ## Example
//!
//! ```rust
//! use astrarium::presets;
//!
//! # fn main() -> Result<(), astrarium::AstrariumError> {
//! let mut system = presets::solar_system()?;
//! let earth = system.find_by_name("Earth").unwrap();
//!
//! // Advance one day
//! system.set_time(86_400_000)?;
//!
//! let distance = system.position(earth)?.length();
//! assert!(distance > 1.4e11 && distance < 1.6e11);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//! The crate emits [`tracing`] events (a warning when the Kepler solver fails
//! to converge, debug events for orbit determination and hierarchy changes)
//! but never installs a subscriber.

#![warn(missing_docs)]

mod astrarium;
mod body;
mod clock;
mod error;
mod orbit;
pub mod presets;
pub mod solvers;
mod state_vectors;
mod vector;

pub use astrarium::{Astrarium, AstrariumConfig, BodyId, G};
pub use body::Body;
pub use clock::SimulationClock;
pub use error::{AstrariumError, DeterminationError, OrbitError, SolverError, VectorError};
pub use orbit::{Orbit, OrbitType, OrbitalElements, RenderedState, DEFAULT_PRECISION};
pub use solvers::KeplerSolution;
pub use state_vectors::StateVectors;
pub use vector::{position2, rotation_matrix, Position, Vector};
