//! Static orbital parameters for a body on a Keplerian ellipse.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::OrbitError;

/// Orbital elements in scene units, set once when a body is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalParameters {
    /// Semi-major axis in scene units. Must be > 0.
    pub semi_major_axis: f64,
    /// Eccentricity in `[0, 1)`. 0 = circular orbit.
    pub eccentricity: f64,
    /// Tilt of the orbital plane in degrees.
    #[serde(default)]
    pub inclination_deg: f64,
    /// Orientation of periapsis within the plane, in degrees.
    #[serde(default)]
    pub longitude_of_periapsis_deg: f64,
    /// Simulated seconds for one full revolution. Must be > 0.
    pub period_scale: f64,
}

impl OrbitalParameters {
    /// Build and validate a parameter set.
    ///
    /// # Errors
    ///
    /// Returns an [`OrbitError`] describing the first invalid field.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination_deg: f64,
        longitude_of_periapsis_deg: f64,
        period_scale: f64,
    ) -> Result<Self, OrbitError> {
        let params = Self {
            semi_major_axis,
            eccentricity,
            inclination_deg,
            longitude_of_periapsis_deg,
            period_scale,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), OrbitError> {
        for (field, value) in [
            ("semi_major_axis", self.semi_major_axis),
            ("eccentricity", self.eccentricity),
            ("inclination_deg", self.inclination_deg),
            ("longitude_of_periapsis_deg", self.longitude_of_periapsis_deg),
            ("period_scale", self.period_scale),
        ] {
            if !value.is_finite() {
                return Err(OrbitError::NonFinite { field, value });
            }
        }
        if self.semi_major_axis <= 0.0 {
            return Err(OrbitError::NonPositiveSemiMajorAxis(self.semi_major_axis));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitError::InvalidEccentricity(self.eccentricity));
        }
        if self.period_scale <= 0.0 {
            return Err(OrbitError::NonPositivePeriodScale(self.period_scale));
        }
        Ok(())
    }

    /// Mean motion in radians per simulated second.
    pub fn angular_speed(&self) -> f64 {
        TAU / self.period_scale
    }

    /// Semi-minor axis `b = a·√(1 − e²)`.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Closest distance to the focus, `a·(1 − e)`.
    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Farthest distance from the focus, `a·(1 + e)`.
    pub fn apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_parameters_accepted() {
        let p = OrbitalParameters::new(25.0, 0.017, 0.0, 0.0, 18.25).unwrap();
        assert!((p.periapsis() - 24.575).abs() < 1e-9);
        assert!((p.apoapsis() - 25.425).abs() < 1e-9);
        assert!(p.semi_minor_axis() < p.semi_major_axis);
    }

    #[test]
    fn test_eccentricity_out_of_range_rejected() {
        assert_eq!(
            OrbitalParameters::new(10.0, 1.0, 0.0, 0.0, 1.0),
            Err(OrbitError::InvalidEccentricity(1.0))
        );
        assert_eq!(
            OrbitalParameters::new(10.0, -0.1, 0.0, 0.0, 1.0),
            Err(OrbitError::InvalidEccentricity(-0.1))
        );
    }

    #[test]
    fn test_non_positive_axis_rejected() {
        assert_eq!(
            OrbitalParameters::new(0.0, 0.1, 0.0, 0.0, 1.0),
            Err(OrbitError::NonPositiveSemiMajorAxis(0.0))
        );
    }

    #[test]
    fn test_non_positive_period_rejected() {
        assert_eq!(
            OrbitalParameters::new(10.0, 0.1, 0.0, 0.0, -2.0),
            Err(OrbitError::NonPositivePeriodScale(-2.0))
        );
    }

    #[test]
    fn test_nan_rejected_with_field_name() {
        let err = OrbitalParameters::new(10.0, 0.1, f64::NAN, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            OrbitError::NonFinite {
                field: "inclination_deg",
                ..
            }
        ));
    }

    #[test]
    fn test_angular_speed_is_one_turn_per_period() {
        let p = OrbitalParameters::new(10.0, 0.0, 0.0, 0.0, 4.0).unwrap();
        assert!((p.angular_speed() * 4.0 - TAU).abs() < 1e-12);
    }
}
