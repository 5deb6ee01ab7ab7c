//! Per-body simulation state.

use glam::DVec3;
use orrery_orbits::{CircularOrbit, KeplerOrbit, sanitize_delta, wrap_angle};
use serde::{Deserialize, Serialize};

/// Stable handle to a body inside a [`SolarSystem`](crate::SolarSystem).
///
/// Resolved once when the system is built; never reused because bodies are
/// never removed during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub(crate) u32);

impl BodyId {
    /// Position of the body in the system's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Broad classification of a body, used for display and framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Planet,
    DwarfPlanet,
    Moon,
    Asteroid,
}

/// How a body moves relative to its parent (or the origin).
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Does not orbit, e.g. the central star.
    Fixed,
    /// Constant-rate circle in the horizontal plane.
    Circular(CircularOrbit),
    /// Keplerian ellipse driven by its mean anomaly.
    Kepler(KeplerOrbit),
}

/// Mutable state of one celestial body.
#[derive(Debug, Clone)]
pub struct BodyState {
    pub(crate) name: String,
    pub(crate) kind: BodyKind,
    pub(crate) radius: f64,
    pub(crate) rotation_speed: f64,
    /// Orbit angle (circular) or mean anomaly (Kepler), always in `[0, 2π)`.
    pub(crate) phase: f64,
    pub(crate) rotation_angle: f64,
    pub(crate) position: DVec3,
    pub(crate) parent: Option<BodyId>,
    pub(crate) motion: Motion,
}

impl BodyState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Display radius in scene units.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Spin rate in radians per simulated second.
    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Spin angle about the body's own Y axis, in `[0, 2π)`.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    /// World position as of the last update.
    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Spin and orbit for `dt` simulated seconds, returning the offset from
    /// the orbit's center. Does not touch `position`.
    pub(crate) fn integrate(&mut self, dt: f64) -> DVec3 {
        let dt = sanitize_delta(dt);
        self.rotation_angle = wrap_angle(self.rotation_angle + self.rotation_speed * dt);
        match &self.motion {
            Motion::Fixed => DVec3::ZERO,
            Motion::Circular(orbit) => orbit.advance(&mut self.phase, dt),
            Motion::Kepler(orbit) => orbit.advance(&mut self.phase, dt),
        }
    }

    /// Advance a body that orbits the origin directly.
    pub fn advance(&mut self, dt: f64) -> DVec3 {
        self.position = self.integrate(dt);
        self.position
    }

    /// Orbit curve relative to the orbit's center, or `None` for fixed bodies.
    pub fn local_orbit_path(&self, segments: u32) -> Option<Vec<DVec3>> {
        match &self.motion {
            Motion::Fixed => None,
            Motion::Circular(orbit) => Some(orbit.generate_path(segments)),
            Motion::Kepler(orbit) => Some(orbit.generate_orbit_path(segments)),
        }
    }

    pub fn snapshot(&self, id: BodyId) -> BodySnapshot {
        BodySnapshot {
            id,
            name: self.name.clone(),
            kind: self.kind,
            position: self.position,
            rotation_angle: self.rotation_angle,
            radius: self.radius,
        }
    }
}

/// What the renderer needs to draw one body for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub position: DVec3,
    pub rotation_angle: f64,
    pub radius: f64,
}

#[cfg(test)]
pub(crate) fn test_body(name: &str, motion: Motion) -> BodyState {
    BodyState {
        name: name.to_string(),
        kind: BodyKind::Planet,
        radius: 1.0,
        rotation_speed: 0.5,
        phase: 0.0,
        rotation_angle: 0.0,
        position: DVec3::ZERO,
        parent: None,
        motion,
    }
}
