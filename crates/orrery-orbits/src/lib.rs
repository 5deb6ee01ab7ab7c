//! Orbital mechanics for the orrery: angle bookkeeping, circular orbits and
//! Keplerian ellipses in scene units.

pub mod angle;
pub mod circular;
mod error;
pub mod kepler;
mod params;

pub use angle::{sanitize_delta, wrap_angle};
pub use circular::{CircularOrbit, advance_circular, circular_position};
pub use error::OrbitError;
pub use kepler::{DEFAULT_KEPLER_ITERATIONS, KeplerOrbit, KeplerSolver};
pub use params::OrbitalParameters;
