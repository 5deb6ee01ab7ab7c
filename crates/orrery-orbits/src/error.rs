//! Orbit construction errors.

/// Rejected orbital configuration. Invalid values are never clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrbitError {
    /// Eccentricity outside `[0, 1)`; parabolic and hyperbolic orbits are unsupported.
    #[error("eccentricity {0} is outside [0, 1)")]
    InvalidEccentricity(f64),

    /// Semi-major axis must be strictly positive.
    #[error("semi-major axis must be positive, got {0}")]
    NonPositiveSemiMajorAxis(f64),

    /// Circular orbit radius must be strictly positive.
    #[error("orbit radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    /// Period scale must be strictly positive.
    #[error("period scale must be positive, got {0}")]
    NonPositivePeriodScale(f64),

    /// A parameter was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}
