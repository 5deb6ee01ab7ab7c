//! Keplerian ellipse model: mean anomaly → eccentric anomaly → true anomaly
//! → position, tilted into the body's orbital plane.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::{OrbitError, OrbitalParameters, sanitize_delta, wrap_angle};

/// Iteration count of the default fixed-point Kepler solve.
pub const DEFAULT_KEPLER_ITERATIONS: u32 = 5;

/// Strategy for solving Kepler's equation `M = E − e·sin(E)` for `E`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KeplerSolver {
    /// Fixed-point iteration `E ← M + e·sin(E)` seeded at `E₀ = M`, with no
    /// convergence check. The residual after `n` steps is bounded by `eⁿ⁺¹`,
    /// about 2e-4 at Pluto's e = 0.244 for the default 5 steps.
    FixedIteration {
        /// Number of iterations to run.
        iterations: u32,
    },
    /// Newton-Raphson, stopping once the correction drops below `tolerance`.
    Newton {
        /// Absolute tolerance on the correction step in radians.
        tolerance: f64,
        /// Upper bound on iterations.
        max_iterations: u32,
    },
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self::FixedIteration {
            iterations: DEFAULT_KEPLER_ITERATIONS,
        }
    }
}

impl KeplerSolver {
    /// Solve for the eccentric anomaly of `mean_anomaly` at `eccentricity`.
    pub fn eccentric_anomaly(&self, mean_anomaly: f64, eccentricity: f64) -> f64 {
        match *self {
            Self::FixedIteration { iterations } => {
                let mut e_anom = mean_anomaly;
                for _ in 0..iterations {
                    e_anom = mean_anomaly + eccentricity * e_anom.sin();
                }
                e_anom
            }
            Self::Newton {
                tolerance,
                max_iterations,
            } => {
                let mut e_anom = if eccentricity < 0.8 {
                    mean_anomaly
                } else {
                    std::f64::consts::PI
                };
                for _ in 0..max_iterations {
                    let delta = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
                    let derivative = 1.0 - eccentricity * e_anom.cos();
                    let step = delta / derivative;
                    e_anom -= step;
                    if step.abs() < tolerance {
                        break;
                    }
                }
                e_anom
            }
        }
    }
}

/// True anomaly from eccentric anomaly: `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))`.
pub(crate) fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin())
        .atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// An elliptical orbit with the central star at one focus.
#[derive(Debug, Clone, PartialEq)]
pub struct KeplerOrbit {
    params: OrbitalParameters,
    rotation: DMat3,
    solver: KeplerSolver,
}

impl KeplerOrbit {
    /// Build an orbit from validated parameters using the default solver.
    ///
    /// # Errors
    ///
    /// Returns the [`OrbitError`] from [`OrbitalParameters::validate`].
    pub fn new(params: OrbitalParameters) -> Result<Self, OrbitError> {
        params.validate()?;
        // Tilt by inclination about X, then by longitude of periapsis about Y.
        let rotation = DMat3::from_rotation_x(params.inclination_deg.to_radians())
            * DMat3::from_rotation_y(params.longitude_of_periapsis_deg.to_radians());
        Ok(Self {
            params,
            rotation,
            solver: KeplerSolver::default(),
        })
    }

    /// Replace the Kepler solver.
    #[must_use]
    pub fn with_solver(mut self, solver: KeplerSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn params(&self) -> &OrbitalParameters {
        &self.params
    }

    /// Rotation taking orbital-plane coordinates into scene coordinates.
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    pub fn solver(&self) -> KeplerSolver {
        self.solver
    }

    pub fn angular_speed(&self) -> f64 {
        self.params.angular_speed()
    }

    /// Position relative to the focus at `mean_anomaly` radians.
    pub fn position_at_mean_anomaly(&self, mean_anomaly: f64) -> DVec3 {
        let e = self.params.eccentricity;
        let e_anom = self.solver.eccentric_anomaly(mean_anomaly, e);
        let nu = true_anomaly(e_anom, e);
        let r = self.params.semi_major_axis * (1.0 - e * e_anom.cos());

        let planar = DVec3::new(r * nu.cos(), 0.0, r * nu.sin());
        self.rotation * planar
    }

    /// Advance `mean_anomaly` by the orbit's mean motion over `delta_seconds`,
    /// wrap it into `[0, 2π)` and return the new position.
    pub fn advance(&self, mean_anomaly: &mut f64, delta_seconds: f64) -> DVec3 {
        let dt = sanitize_delta(delta_seconds);
        *mean_anomaly = wrap_angle(*mean_anomaly + self.angular_speed() * dt);
        self.position_at_mean_anomaly(*mean_anomaly)
    }

    /// Sample the closed orbit curve at `segments + 1` uniformly spaced mean
    /// anomalies over `[0, 2π]`. Purely a function of the static parameters.
    ///
    /// `segments == 0` yields the single periapsis point.
    pub fn generate_orbit_path(&self, segments: u32) -> Vec<DVec3> {
        if segments == 0 {
            return vec![self.position_at_mean_anomaly(0.0)];
        }
        (0..=segments)
            .map(|i| {
                let mean_anomaly = std::f64::consts::TAU * f64::from(i) / f64::from(segments);
                self.position_at_mean_anomaly(mean_anomaly)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circular_position;
    use std::f64::consts::TAU;

    fn earth_like() -> KeplerOrbit {
        KeplerOrbit::new(OrbitalParameters::new(25.0, 0.017, 0.0, 0.0, 18.25).unwrap()).unwrap()
    }

    fn tilted(e: f64) -> KeplerOrbit {
        KeplerOrbit::new(OrbitalParameters::new(200.0, e, 17.2, 40.0, 4528.0).unwrap()).unwrap()
    }

    #[test]
    fn test_earth_like_periapsis_on_x_axis() {
        let pos = earth_like().position_at_mean_anomaly(0.0);
        assert!((pos.x - 24.575).abs() < 1e-9, "x = {}", pos.x);
        assert!(pos.y.abs() < 1e-12);
        assert!(pos.z.abs() < 1e-12);
    }

    #[test]
    fn test_zero_eccentricity_matches_circular_model() {
        let orbit =
            KeplerOrbit::new(OrbitalParameters::new(40.0, 0.0, 0.0, 0.0, 10.0).unwrap()).unwrap();
        for i in 0..100 {
            let m = TAU * f64::from(i) / 100.0;
            let kepler = orbit.position_at_mean_anomaly(m);
            let circle = circular_position(m, 40.0);
            assert!((kepler - circle).length() < 1e-9, "at M={m}");
        }
    }

    #[test]
    fn test_orbit_path_is_closed_with_n_plus_one_points() {
        let path = tilted(0.244).generate_orbit_path(128);
        assert_eq!(path.len(), 129);
        assert!((path[0] - path[128]).length() < 1e-9);
    }

    #[test]
    fn test_orbit_path_satisfies_ellipse_equation() {
        for e in [0.0, 0.017, 0.094, 0.206, 0.244] {
            let orbit = tilted(e);
            let a = orbit.params().semi_major_axis;
            let to_plane = orbit.rotation().transpose();
            for p in orbit.generate_orbit_path(64) {
                let planar = to_plane * p;
                assert!(planar.y.abs() < 1e-9, "point left the orbital plane");
                let nu = planar.z.atan2(planar.x);
                let expected = a * (1.0 - e * e) / (1.0 + e * nu.cos());
                assert!(
                    (planar.length() - expected).abs() < 1e-9,
                    "e={e}: r={} expected {expected}",
                    planar.length()
                );
            }
        }
    }

    #[test]
    fn test_zero_segments_yields_periapsis() {
        let orbit = earth_like();
        let path = orbit.generate_orbit_path(0);
        assert_eq!(path, vec![orbit.position_at_mean_anomaly(0.0)]);
    }

    #[test]
    fn test_rotation_preserves_distance() {
        let flat =
            KeplerOrbit::new(OrbitalParameters::new(200.0, 0.244, 0.0, 0.0, 4528.0).unwrap())
                .unwrap();
        let orbit = tilted(0.244);
        for i in 0..32 {
            let m = TAU * f64::from(i) / 32.0;
            let a = flat.position_at_mean_anomaly(m).length();
            let b = orbit.position_at_mean_anomaly(m).length();
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inclination_lifts_orbit_out_of_plane() {
        let orbit = tilted(0.1);
        let max_height = orbit
            .generate_orbit_path(64)
            .iter()
            .map(|p| p.y.abs())
            .fold(0.0, f64::max);
        assert!(max_height > 1.0, "max |y| = {max_height}");
    }

    #[test]
    fn test_advance_keeps_mean_anomaly_wrapped() {
        let orbit = tilted(0.2);
        let mut m = 0.0;
        for i in 0..5_000 {
            orbit.advance(&mut m, 0.5 + f64::from(i % 7));
            assert!((0.0..TAU).contains(&m), "mean anomaly {m} escaped");
        }
    }

    #[test]
    fn test_advance_ignores_degenerate_delta() {
        let orbit = earth_like();
        let mut m = 1.25;
        let before = orbit.position_at_mean_anomaly(m);
        let after = orbit.advance(&mut m, f64::NEG_INFINITY);
        assert_eq!(m, 1.25);
        assert_eq!(before, after);
    }

    #[test]
    fn test_fixed_iteration_residual_within_bound() {
        let solver = KeplerSolver::default();
        for e in [0.007, 0.094, 0.244] {
            for i in 0..50 {
                let m = TAU * f64::from(i) / 50.0;
                let e_anom = solver.eccentric_anomaly(m, e);
                let residual = (e_anom - e * e_anom.sin() - m).abs();
                assert!(residual <= e.powi(6) + 1e-12, "e={e} M={m} residual={residual}");
            }
        }
    }

    #[test]
    fn test_newton_solver_converges() {
        let solver = KeplerSolver::Newton {
            tolerance: 1e-12,
            max_iterations: 50,
        };
        for e in [0.0, 0.3, 0.6, 0.95] {
            for i in 0..40 {
                let m = TAU * f64::from(i) / 40.0;
                let e_anom = solver.eccentric_anomaly(m, e);
                let residual = (e_anom - e * e_anom.sin() - m).abs();
                assert!(residual < 1e-10, "e={e} M={m} residual={residual}");
            }
        }
    }

    #[test]
    fn test_solvers_agree_at_low_eccentricity() {
        let fixed = earth_like();
        let newton = earth_like().with_solver(KeplerSolver::Newton {
            tolerance: 1e-14,
            max_iterations: 20,
        });
        for i in 0..20 {
            let m = TAU * f64::from(i) / 20.0;
            let d = (fixed.position_at_mean_anomaly(m) - newton.position_at_mean_anomaly(m))
                .length();
            assert!(d < 1e-6, "solvers diverged by {d} at M={m}");
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let params = OrbitalParameters {
            semi_major_axis: 10.0,
            eccentricity: 1.2,
            inclination_deg: 0.0,
            longitude_of_periapsis_deg: 0.0,
            period_scale: 1.0,
        };
        assert_eq!(
            KeplerOrbit::new(params),
            Err(OrbitError::InvalidEccentricity(1.2))
        );
    }
}
