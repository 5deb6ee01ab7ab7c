//! Host side of the orrery: the [`Orrery`] context that steps simulation,
//! camera and clock together, the [`Frame`] handed to renderers, and the
//! per-user directories the `orrery` binary reads its configuration from.

mod error;
pub mod frame;
mod orrery;
pub mod platform;

pub use error::AppError;
pub use frame::{Frame, FrameSink, JsonLinesSink, LogSink};
pub use orrery::Orrery;
pub use platform::{PlatformDirs, PlatformError};
