//! Constant-rate circular orbits in the horizontal (XZ) plane.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::{OrbitError, sanitize_delta, wrap_angle};

/// Position on a circle of `radius` at `angle`, with y fixed at zero.
pub fn circular_position(angle: f64, radius: f64) -> DVec3 {
    DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// Advance `angle` by `angular_speed * delta_seconds`, wrap it into
/// `[0, 2π)` and return the new position.
///
/// Zero speed keeps the body stationary, negative speed orbits retrograde.
/// A degenerate delta counts as zero.
pub fn advance_circular(
    angle: &mut f64,
    delta_seconds: f64,
    angular_speed: f64,
    radius: f64,
) -> DVec3 {
    let dt = sanitize_delta(delta_seconds);
    *angle = wrap_angle(*angle + angular_speed * dt);
    circular_position(*angle, radius)
}

/// A validated circular orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularOrbit {
    radius: f64,
    angular_speed: f64,
}

impl CircularOrbit {
    /// Create a circular orbit with `radius` scene units and `angular_speed`
    /// radians per simulated second.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive radius and non-finite values.
    pub fn new(radius: f64, angular_speed: f64) -> Result<Self, OrbitError> {
        if !radius.is_finite() {
            return Err(OrbitError::NonFinite {
                field: "radius",
                value: radius,
            });
        }
        if !angular_speed.is_finite() {
            return Err(OrbitError::NonFinite {
                field: "angular_speed",
                value: angular_speed,
            });
        }
        if radius <= 0.0 {
            return Err(OrbitError::NonPositiveRadius(radius));
        }
        Ok(Self {
            radius,
            angular_speed,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    /// Seconds per revolution, or `None` for a stationary orbit.
    pub fn period(&self) -> Option<f64> {
        (self.angular_speed != 0.0).then(|| std::f64::consts::TAU / self.angular_speed.abs())
    }

    pub fn position_at(&self, angle: f64) -> DVec3 {
        circular_position(angle, self.radius)
    }

    /// Advance the orbit angle and return the position relative to the orbit's center.
    pub fn advance(&self, angle: &mut f64, delta_seconds: f64) -> DVec3 {
        advance_circular(angle, delta_seconds, self.angular_speed, self.radius)
    }

    /// Sample `segments + 1` points around the circle, first and last coincide.
    pub fn generate_path(&self, segments: u32) -> Vec<DVec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * f64::from(i) / f64::from(segments);
                self.position_at(angle)
            })
            .collect()
    }
}
