//! Camera modes and the parameters each mode owns.
//!
//! Every mode keeps its own distance and angles. Switching modes never resets
//! another mode's parameters, so returning to a mode picks up where it left off.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use orrery_config::{FollowCameraConfig, FreeCameraConfig, OverviewCameraConfig};
use orrery_orbits::{sanitize_delta, wrap_angle};
use orrery_sim::BodyId;
use serde::{Deserialize, Serialize};

use crate::CameraError;

/// Mode name without its target, as used by requests and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    Free,
    Follow,
    Overview,
}

impl FromStr for ModeKind {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "follow" => Ok(Self::Follow),
            "overview" => Ok(Self::Overview),
            _ => Err(CameraError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "free",
            Self::Follow => "follow",
            Self::Overview => "overview",
        })
    }
}

/// Active camera mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Spherical orbit around the origin, steered by drag and zoom.
    Free,
    /// Circles a body at a fixed distance and height.
    Follow(BodyId),
    /// Slow automatic rotation around the whole system.
    Overview,
}

impl CameraMode {
    pub fn kind(self) -> ModeKind {
        match self {
            Self::Free => ModeKind::Free,
            Self::Follow(_) => ModeKind::Follow,
            Self::Overview => ModeKind::Overview,
        }
    }
}

/// Clamp `value` into `[min, max]`, keeping `current` when `value` is not finite.
fn clamp_or(value: f64, current: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        current
    }
}

/// Free-orbit parameters: spherical coordinates around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeOrbit {
    radius: f64,
    /// Angle from +Y.
    polar: f64,
    azimuth: f64,
    radius_min: f64,
    radius_max: f64,
    polar_margin: f64,
}

impl FreeOrbit {
    pub fn from_config(config: &FreeCameraConfig) -> Self {
        let mut orbit = Self {
            radius: config.radius,
            polar: config.polar,
            azimuth: wrap_angle(config.azimuth),
            radius_min: config.radius_min,
            radius_max: config.radius_max,
            polar_margin: config.polar_margin,
        };
        orbit.radius = orbit.radius.clamp(orbit.radius_min, orbit.radius_max);
        orbit.polar = orbit.clamp_polar(orbit.polar);
        orbit
    }

    fn clamp_polar(&self, polar: f64) -> f64 {
        clamp_or(
            polar,
            self.polar,
            self.polar_margin,
            std::f64::consts::PI - self.polar_margin,
        )
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Turn by the given angles in radians. Azimuth wraps, polar is clamped.
    pub fn rotate(&mut self, d_azimuth: f64, d_polar: f64) {
        if d_azimuth.is_finite() {
            self.azimuth = wrap_angle(self.azimuth - d_azimuth);
        }
        self.polar = self.clamp_polar(self.polar - d_polar);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.radius = clamp_or(self.radius + delta, self.radius, self.radius_min, self.radius_max);
    }

    pub(crate) fn set(&mut self, radius: f64, polar: f64, azimuth: f64) {
        self.radius = clamp_or(radius, self.radius, self.radius_min, self.radius_max);
        self.polar = self.clamp_polar(polar);
        if azimuth.is_finite() {
            self.azimuth = wrap_angle(azimuth);
        }
    }

    /// Camera position for the current angles.
    pub fn position(&self) -> DVec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        DVec3::new(
            self.radius * sin_p * cos_a,
            self.radius * cos_p,
            self.radius * sin_p * sin_a,
        )
    }
}

/// Follow parameters. The orbit phase advances with wall time.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowParams {
    distance: f64,
    height: f64,
    distance_min: f64,
    distance_max: f64,
    zoom_scale: f64,
    orbit_rate: f64,
    phase: f64,
}

impl FollowParams {
    pub fn from_config(config: &FollowCameraConfig) -> Self {
        Self {
            distance: config.distance.clamp(config.distance_min, config.distance_max),
            height: config.height,
            distance_min: config.distance_min,
            distance_max: config.distance_max,
            zoom_scale: config.zoom_scale,
            orbit_rate: config.orbit_rate,
            phase: 0.0,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Zoom deltas are scaled down in this mode; distances are small.
    pub fn zoom(&mut self, delta: f64) {
        self.distance = clamp_or(
            self.distance + delta * self.zoom_scale,
            self.distance,
            self.distance_min,
            self.distance_max,
        );
    }

    pub(crate) fn set_distance(&mut self, distance: f64) {
        self.distance = clamp_or(distance, self.distance, self.distance_min, self.distance_max);
    }

    pub(crate) fn tick(&mut self, dt: f64) {
        self.phase = wrap_angle(self.phase + self.orbit_rate * sanitize_delta(dt));
    }

    /// Offset from the followed body.
    pub fn offset(&self) -> DVec3 {
        let (sin, cos) = self.phase.sin_cos();
        DVec3::new(self.distance * cos, self.height, self.distance * sin)
    }
}

/// Overview parameters. The rotation phase advances with wall time.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewParams {
    distance: f64,
    height: f64,
    distance_min: f64,
    distance_max: f64,
    rotate_rate: f64,
    phase: f64,
}

impl OverviewParams {
    pub fn from_config(config: &OverviewCameraConfig) -> Self {
        Self {
            distance: config.distance.clamp(config.distance_min, config.distance_max),
            height: config.height,
            distance_min: config.distance_min,
            distance_max: config.distance_max,
            rotate_rate: config.rotate_rate,
            phase: 0.0,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn zoom(&mut self, delta: f64) {
        self.distance = clamp_or(
            self.distance + delta,
            self.distance,
            self.distance_min,
            self.distance_max,
        );
    }

    pub(crate) fn set_distance(&mut self, distance: f64) {
        self.distance = clamp_or(distance, self.distance, self.distance_min, self.distance_max);
    }

    pub(crate) fn tick(&mut self, dt: f64) {
        self.phase = wrap_angle(self.phase + self.rotate_rate * sanitize_delta(dt));
    }

    pub fn position(&self) -> DVec3 {
        let (sin, cos) = self.phase.sin_cos();
        DVec3::new(self.distance * cos, self.height, self.distance * sin)
    }
}
