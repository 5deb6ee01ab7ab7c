//! Errors surfaced by the host application.

use orrery_camera::CameraError;
use orrery_config::ConfigError;
use orrery_sim::SystemError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot build the camera: {0}")]
    Camera(#[from] CameraError),

    #[error("cannot build the solar system: {0}")]
    System(#[from] SystemError),

    #[error("frame output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("frame serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
