//! Rejected camera requests.

/// A camera request that could not be honoured. The camera is left exactly as
/// it was before the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    /// No body with this name exists in the system.
    #[error("no body named `{name}`")]
    BodyNotFound { name: String },

    /// Follow mode was requested without naming a body.
    #[error("follow mode needs a target body")]
    MissingFollowTarget,

    /// The mode name is not one of free, follow or overview.
    #[error("unknown camera mode `{0}`")]
    UnknownMode(String),

    /// The camera or input settings cannot produce a finite pose.
    #[error("invalid camera settings: {0}")]
    InvalidConfig(String),
}
