//! Solar-system simulation: the simulation clock, per-body state in an arena,
//! satellite propagation, the static body catalog and the asteroid belt.

pub mod belt;
pub mod body;
pub mod catalog;
pub mod clock;
mod error;
pub mod satellite;
pub mod system;

pub use belt::{AsteroidBelt, BeltParticle};
pub use body::{BodyId, BodyKind, BodySnapshot, BodyState, Motion};
pub use catalog::{BodySpec, Catalog, OrbitSpec};
pub use clock::{Clock, FrameDelta};
pub use error::SystemError;
pub use system::SolarSystem;
