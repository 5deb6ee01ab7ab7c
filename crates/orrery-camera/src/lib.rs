//! Multi-mode camera for the orrery: free orbit, follow and overview modes,
//! smoothed transitions, body close-ups, scripted tours and the input events
//! that drive them.

mod controller;
mod error;
mod input;
mod mode;
mod tour;

pub use controller::{CameraController, CameraInfo, CameraPose, CameraSnapshot};
pub use error::CameraError;
pub use input::{GestureTracker, InputEvent};
pub use mode::{CameraMode, FollowParams, FreeOrbit, ModeKind, OverviewParams};
pub use tour::{CameraTour, TourAction, TourStep};
