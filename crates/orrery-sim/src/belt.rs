//! Asteroid belt: a seeded ring of small particles between two radii that
//! turns slowly as a whole.

use glam::DVec3;
use orrery_config::AsteroidBeltConfig;
use orrery_orbits::{sanitize_delta, wrap_angle};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::SystemError;

/// Mixed into the system seed so the belt and the initial body phases draw
/// from different streams.
const BELT_SEED_SALT: u64 = 0xB3_17_A5_7E;

/// One particle of the belt, fixed at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeltParticle {
    /// Angle around the Y axis before the belt's own rotation is applied.
    pub angle: f64,
    /// Distance from the origin in the horizontal plane.
    pub radius: f64,
    /// Height above or below the ecliptic.
    pub height: f64,
    /// Rocky brown tint in linear RGB.
    pub color: [f32; 3],
    /// Point size for drawing.
    pub size: f32,
}

impl BeltParticle {
    fn position(&self, rotation: f64) -> DVec3 {
        let a = self.angle + rotation;
        DVec3::new(self.radius * a.cos(), self.height, self.radius * a.sin())
    }
}

/// The belt as a whole.
#[derive(Debug, Clone)]
pub struct AsteroidBelt {
    particles: Vec<BeltParticle>,
    rotation: f64,
    rotation_speed: f64,
}

impl AsteroidBelt {
    /// Generate the belt described by `config`. Deterministic for a given seed.
    pub fn from_config(config: &AsteroidBeltConfig, seed: u64) -> Result<Self, SystemError> {
        let AsteroidBeltConfig {
            inner_radius,
            outer_radius,
            count,
            vertical_spread,
            radius_jitter,
            rotation_speed,
            ..
        } = *config;

        let all_finite = [
            inner_radius,
            outer_radius,
            vertical_spread,
            radius_jitter,
            rotation_speed,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(SystemError::InvalidBelt(
                "belt parameters must be finite".to_string(),
            ));
        }
        if inner_radius <= 0.0 || outer_radius < inner_radius {
            return Err(SystemError::InvalidBelt(format!(
                "radii must satisfy 0 < inner ({inner_radius}) <= outer ({outer_radius})"
            )));
        }
        if vertical_spread < 0.0 || !(0.0..1.0).contains(&radius_jitter) {
            return Err(SystemError::InvalidBelt(format!(
                "spread {vertical_spread} must be >= 0 and jitter {radius_jitter} in [0, 1)"
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ BELT_SEED_SALT);
        let width = outer_radius - inner_radius;
        let mut particles = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let angle = rng.random::<f64>() * std::f64::consts::TAU;
            let base = inner_radius + rng.random::<f64>() * width;
            let height = (rng.random::<f64>() - 0.5) * vertical_spread;
            // Jitter scales the radius by up to +/- half the jitter fraction.
            let radius = base * (1.0 + (rng.random::<f64>() - 0.5) * radius_jitter);

            let shade = 0.3 + 0.4 * rng.random::<f32>();
            let color = [0.6 * shade, 0.4 * shade, 0.3 * shade];
            let size = 0.5 + 1.5 * rng.random::<f32>();

            particles.push(BeltParticle {
                angle,
                radius,
                height,
                color,
                size,
            });
        }

        tracing::debug!(count, inner_radius, outer_radius, "Generated asteroid belt");

        Ok(Self {
            particles,
            rotation: 0.0,
            rotation_speed,
        })
    }

    /// Turn the belt by `rotation_speed * dt`.
    pub fn update(&mut self, dt: f64) {
        self.rotation = wrap_angle(self.rotation + self.rotation_speed * sanitize_delta(dt));
    }

    /// Current rotation of the whole belt about Y, in `[0, 2π)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn particles(&self) -> &[BeltParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// World positions of every particle at the current rotation.
    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.particles.iter().map(|p| p.position(self.rotation))
    }
}
