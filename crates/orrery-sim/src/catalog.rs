//! Static body table: what exists, how big it is and how it moves.
//!
//! The built-in [`Catalog::solar_system`] is scaled for viewing, not for
//! accuracy: distances are compressed and one Earth year lasts 18 simulated
//! seconds. Custom catalogs load from RON.

use std::path::Path;

use orrery_orbits::OrbitalParameters;
use serde::{Deserialize, Serialize};

use crate::{BodyKind, SystemError};

/// Simulated seconds per real orbital day in the built-in catalog.
pub const SECONDS_PER_DAY: f64 = 0.05;

/// Orbit description for a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum OrbitSpec {
    /// Stationary relative to its parent (or the origin).
    #[default]
    Fixed,
    /// Circular orbit with an explicit angular speed in rad/s.
    Circular { radius: f64, angular_speed: f64 },
    /// Keplerian ellipse.
    Kepler(OrbitalParameters),
}

/// One body in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub kind: BodyKind,
    /// Display radius in scene units.
    pub radius: f64,
    /// Spin in radians per simulated second; negative is retrograde.
    #[serde(default)]
    pub rotation_speed: f64,
    #[serde(default)]
    pub orbit: OrbitSpec,
    /// Name of the body this one orbits. `None` orbits the origin.
    #[serde(default)]
    pub parent: Option<String>,
    /// Starting phase in radians. `None` draws one from the system seed.
    #[serde(default)]
    pub initial_phase: Option<f64>,
}

impl BodySpec {
    fn new(name: &str, kind: BodyKind, radius: f64, rotation_speed: f64, orbit: OrbitSpec) -> Self {
        Self {
            name: name.to_string(),
            kind,
            radius,
            rotation_speed,
            orbit,
            parent: None,
            initial_phase: None,
        }
    }

    fn orbiting(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }
}

/// The full static body table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub bodies: Vec<BodySpec>,
}

fn kepler(semi_major_axis: f64, eccentricity: f64, inclination_deg: f64, days: f64) -> OrbitSpec {
    OrbitSpec::Kepler(OrbitalParameters {
        semi_major_axis,
        eccentricity,
        inclination_deg,
        longitude_of_periapsis_deg: 0.0,
        period_scale: days * SECONDS_PER_DAY,
    })
}

fn circular(radius: f64, angular_speed: f64) -> OrbitSpec {
    OrbitSpec::Circular {
        radius,
        angular_speed,
    }
}

impl Catalog {
    /// The Sun, nine planets on Keplerian ellipses, the Moon and four major
    /// asteroids.
    pub fn solar_system() -> Self {
        use BodyKind::*;

        let bodies = vec![
            BodySpec::new("Sun", Star, 5.0, 0.06, OrbitSpec::Fixed),
            BodySpec::new("Mercury", Planet, 0.4, 0.03, kepler(15.0, 0.206, 7.0, 88.0)),
            BodySpec::new("Venus", Planet, 0.9, -0.012, kepler(20.0, 0.007, 3.4, 225.0)),
            BodySpec::new("Earth", Planet, 1.0, 0.12, kepler(25.0, 0.017, 0.0, 365.0)),
            BodySpec::new("Mars", Planet, 0.5, 0.108, kepler(35.0, 0.094, 1.8, 687.0)),
            BodySpec::new("Jupiter", Planet, 4.5, 0.3, kepler(65.0, 0.049, 1.3, 4333.0)),
            BodySpec::new("Saturn", Planet, 3.8, 0.27, kepler(95.0, 0.057, 2.5, 10759.0)),
            BodySpec::new("Uranus", Planet, 1.8, 0.21, kepler(135.0, 0.046, 0.8, 30687.0)),
            BodySpec::new("Neptune", Planet, 1.7, 0.228, kepler(165.0, 0.010, 1.8, 60190.0)),
            BodySpec::new("Pluto", DwarfPlanet, 0.2, 0.072, kepler(200.0, 0.244, 17.2, 90560.0)),
            // Tidally locked: spin rate equals orbital rate.
            BodySpec::new("Moon", Moon, 0.27, 0.037, circular(3.8, 0.037)).orbiting("Earth"),
            BodySpec::new("Ceres", Asteroid, 0.15, 0.025, circular(45.0, 0.008)),
            BodySpec::new("Vesta", Asteroid, 0.08, 0.02, circular(48.0, 0.007)),
            BodySpec::new("Pallas", Asteroid, 0.07, 0.015, circular(52.0, 0.006)),
            BodySpec::new("Hygiea", Asteroid, 0.06, 0.012, circular(55.0, 0.005)),
        ];
        Self { bodies }
    }

    /// Parse a catalog from RON text.
    pub fn from_ron(text: &str) -> Result<Self, SystemError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> Result<Self, SystemError> {
        let text = std::fs::read_to_string(path).map_err(|source| SystemError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_ron(&text)?;
        tracing::info!(
            "Loaded {} bodies from {}",
            catalog.bodies.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Case-insensitive lookup of a catalog entry.
    pub fn get(&self, name: &str) -> Option<&BodySpec> {
        self.bodies
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solar_system_contents() {
        let catalog = Catalog::solar_system();
        assert_eq!(catalog.bodies.len(), 15);
        assert_eq!(catalog.get("sun").unwrap().orbit, OrbitSpec::Fixed);
        assert_eq!(
            catalog.get("moon").unwrap().parent.as_deref(),
            Some("Earth")
        );
        assert!(catalog.get("Vulcan").is_none());
    }

    #[test]
    fn test_earth_year_is_eighteen_seconds() {
        let catalog = Catalog::solar_system();
        let OrbitSpec::Kepler(params) = catalog.get("Earth").unwrap().orbit else {
            panic!("earth should be on a Kepler orbit");
        };
        assert!((params.period_scale - 18.25).abs() < 1e-9);
        assert!((params.semi_major_axis - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_venus_spins_retrograde() {
        let catalog = Catalog::solar_system();
        assert!(catalog.get("Venus").unwrap().rotation_speed < 0.0);
    }

    #[test]
    fn test_ron_roundtrip() {
        let catalog = Catalog::solar_system();
        let text = ron::to_string(&catalog).unwrap();
        assert_eq!(Catalog::from_ron(&text).unwrap(), catalog);
    }

    #[test]
    fn test_minimal_ron_uses_field_defaults() {
        let text = r#"(bodies: [
            (name: "Sol", kind: Star, radius: 3.0),
            (name: "Rock", kind: Planet, radius: 0.5,
             orbit: Circular(radius: 12.0, angular_speed: 0.4), initial_phase: Some(1.0)),
        ])"#;
        let catalog = Catalog::from_ron(text).unwrap();
        assert_eq!(catalog.bodies[0].rotation_speed, 0.0);
        assert_eq!(catalog.bodies[0].orbit, OrbitSpec::Fixed);
        assert_eq!(catalog.bodies[1].initial_phase, Some(1.0));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodies.ron");
        std::fs::write(&path, ron::to_string(&Catalog::solar_system()).unwrap()).unwrap();
        assert_eq!(Catalog::load(&path).unwrap(), Catalog::solar_system());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Catalog::load(Path::new("/nonexistent/bodies.ron")).unwrap_err();
        assert!(matches!(err, SystemError::CatalogRead { .. }));
        assert!(err.to_string().contains("bodies.ron"));
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        assert!(matches!(
            Catalog::from_ron("(bodies: [ (name: ) ])"),
            Err(SystemError::CatalogParse(_))
        ));
    }
}
