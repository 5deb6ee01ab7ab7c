//! The simulation context: every body in one arena, updated in parent order.

use std::f64::consts::TAU;

use glam::DVec3;
use orrery_config::Config;
use orrery_orbits::{CircularOrbit, KeplerOrbit, KeplerSolver, sanitize_delta, wrap_angle};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::{
    AsteroidBelt, BodyId, BodySnapshot, BodySpec, BodyState, Catalog, Motion, OrbitSpec,
    SystemError, satellite,
};

/// All bodies of one scene plus the optional asteroid belt.
///
/// Bodies live in a flat arena addressed by [`BodyId`]. Parent links are
/// resolved once at construction, and `update_order` lists every body after
/// its parent so a single pass per tick sees fresh parent positions.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    bodies: Vec<BodyState>,
    index: FxHashMap<String, BodyId>,
    update_order: Vec<BodyId>,
    belt: Option<AsteroidBelt>,
    elapsed: f64,
}

fn build_motion(spec: &BodySpec, solver: KeplerSolver) -> Result<Motion, SystemError> {
    let invalid = |source| SystemError::InvalidOrbit {
        body: spec.name.clone(),
        source,
    };
    Ok(match &spec.orbit {
        OrbitSpec::Fixed => Motion::Fixed,
        OrbitSpec::Circular {
            radius,
            angular_speed,
        } => Motion::Circular(CircularOrbit::new(*radius, *angular_speed).map_err(invalid)?),
        OrbitSpec::Kepler(params) => Motion::Kepler(
            KeplerOrbit::new(*params)
                .map_err(invalid)?
                .with_solver(solver),
        ),
    })
}

/// Depth of each body in the parent forest, or the first body found on a cycle.
fn parent_depths(parents: &[Option<usize>], names: &[&str]) -> Result<Vec<usize>, SystemError> {
    let mut depths = Vec::with_capacity(parents.len());
    for start in 0..parents.len() {
        let mut depth = 0;
        let mut cursor = parents[start];
        while let Some(p) = cursor {
            depth += 1;
            if depth > parents.len() {
                return Err(SystemError::ParentCycle(names[start].to_string()));
            }
            cursor = parents[p];
        }
        depths.push(depth);
    }
    Ok(depths)
}

impl SolarSystem {
    /// Build a system from a catalog.
    ///
    /// Bodies without an explicit `initial_phase` draw one from a
    /// `ChaCha8Rng` seeded with `seed`, so the same seed gives the same sky.
    /// Positions are computed before returning.
    pub fn build(catalog: &Catalog, seed: u64, solver: KeplerSolver) -> Result<Self, SystemError> {
        let mut index = FxHashMap::default();
        for (i, spec) in catalog.bodies.iter().enumerate() {
            let name = spec.name.trim();
            if name.is_empty() {
                return Err(SystemError::EmptyName { index: i });
            }
            let id = BodyId(i as u32);
            if index.insert(name.to_lowercase(), id).is_some() {
                return Err(SystemError::DuplicateBody(name.to_string()));
            }
        }

        let mut parents = Vec::with_capacity(catalog.bodies.len());
        for spec in &catalog.bodies {
            let parent = match &spec.parent {
                None => None,
                Some(parent) => match index.get(&parent.trim().to_lowercase()) {
                    Some(id) => Some(id.index()),
                    None => {
                        return Err(SystemError::UnknownParent {
                            body: spec.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                },
            };
            parents.push(parent);
        }

        let names: Vec<&str> = catalog.bodies.iter().map(|s| s.name.as_str()).collect();
        let depths = parent_depths(&parents, &names)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut bodies = Vec::with_capacity(catalog.bodies.len());
        for (spec, parent) in catalog.bodies.iter().zip(&parents) {
            if !(spec.radius.is_finite() && spec.radius > 0.0) {
                return Err(SystemError::InvalidRadius {
                    body: spec.name.clone(),
                    radius: spec.radius,
                });
            }
            if !spec.rotation_speed.is_finite() {
                return Err(SystemError::InvalidRotationSpeed {
                    body: spec.name.clone(),
                    speed: spec.rotation_speed,
                });
            }
            let motion = build_motion(spec, solver)?;
            // Draw for every body so adding a fixed phase to one entry does
            // not shift the phases of the others.
            let drawn = rng.random::<f64>() * TAU;
            let phase = match spec.initial_phase {
                Some(phase) if phase.is_finite() => wrap_angle(phase),
                _ => drawn,
            };

            bodies.push(BodyState {
                name: spec.name.trim().to_string(),
                kind: spec.kind,
                radius: spec.radius,
                rotation_speed: spec.rotation_speed,
                phase,
                rotation_angle: 0.0,
                position: DVec3::ZERO,
                parent: parent.map(|p| BodyId(p as u32)),
                motion,
            });
        }

        let mut update_order: Vec<BodyId> = (0..bodies.len()).map(|i| BodyId(i as u32)).collect();
        update_order.sort_by_key(|id| depths[id.index()]);

        let mut system = Self {
            bodies,
            index,
            update_order,
            belt: None,
            elapsed: 0.0,
        };
        system.update(0.0);

        info!(bodies = system.bodies.len(), seed, "Built solar system");
        Ok(system)
    }

    /// Build from a catalog using the simulation and belt sections of `config`.
    pub fn from_config(catalog: &Catalog, config: &Config) -> Result<Self, SystemError> {
        let sim = &config.simulation;
        let mut system = Self::build(catalog, sim.seed, sim.kepler_solver)?;
        if config.belt.enabled {
            system.belt = Some(AsteroidBelt::from_config(&config.belt, sim.seed)?);
        }
        Ok(system)
    }

    /// Attach or replace the asteroid belt.
    pub fn with_belt(mut self, belt: AsteroidBelt) -> Self {
        self.belt = Some(belt);
        self
    }

    /// Advance every body by `dt` simulated seconds, parents first.
    ///
    /// Negative or non-finite deltas count as zero.
    pub fn update(&mut self, dt: f64) {
        let dt = sanitize_delta(dt);
        for &id in &self.update_order {
            let parent_position = self.bodies[id.index()]
                .parent
                .map(|p| self.bodies[p.index()].position);
            let body = &mut self.bodies[id.index()];
            match parent_position {
                Some(center) => {
                    satellite::advance(body, center, dt);
                }
                None => {
                    body.advance(dt);
                }
            }
        }
        if let Some(belt) = &mut self.belt {
            belt.update(dt);
        }
        self.elapsed += dt;
    }

    /// Case-insensitive name lookup.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        let found = self.index.get(&name.trim().to_lowercase()).copied();
        if found.is_none() {
            debug!(name, "No body with this name");
        }
        found
    }

    pub fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(id.index())
    }

    pub fn body_by_name(&self, name: &str) -> Option<&BodyState> {
        self.find(name).and_then(|id| self.body(id))
    }

    /// World position of a body as of the last update.
    pub fn position(&self, id: BodyId) -> Option<DVec3> {
        self.body(id).map(BodyState::position)
    }

    /// Iterate over all bodies in catalog order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &BodyState)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (BodyId(i as u32), body))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies whose parent is `id`.
    pub fn children(&self, id: BodyId) -> Vec<BodyId> {
        self.bodies()
            .filter(|(_, body)| body.parent == Some(id))
            .map(|(child, _)| child)
            .collect()
    }

    /// Orbit curve of a body in world coordinates, centred on its parent's
    /// current position. `None` for unknown or fixed bodies.
    pub fn orbit_path(&self, id: BodyId, segments: u32) -> Option<Vec<DVec3>> {
        let body = self.body(id)?;
        let center = body
            .parent
            .and_then(|p| self.position(p))
            .unwrap_or(DVec3::ZERO);
        let mut path = body.local_orbit_path(segments)?;
        for point in &mut path {
            *point += center;
        }
        Some(path)
    }

    /// Render-ready view of every body.
    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies().map(|(id, body)| body.snapshot(id)).collect()
    }

    pub fn belt(&self) -> Option<&AsteroidBelt> {
        self.belt.as_ref()
    }

    /// Simulated seconds since construction.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyKind;
    use orrery_orbits::OrbitalParameters;

    fn solar() -> SolarSystem {
        SolarSystem::build(&Catalog::solar_system(), 42, KeplerSolver::default()).unwrap()
    }

    fn spec(name: &str, parent: Option<&str>) -> BodySpec {
        BodySpec {
            name: name.to_string(),
            kind: BodyKind::Moon,
            radius: 1.0,
            rotation_speed: 0.0,
            orbit: OrbitSpec::Circular {
                radius: 2.0,
                angular_speed: 1.0,
            },
            parent: parent.map(str::to_string),
            initial_phase: Some(0.0),
        }
    }

    #[test]
    fn test_builds_default_catalog() {
        let system = solar();
        assert_eq!(system.len(), 15);
        assert_eq!(system.position(system.find("Sun").unwrap()), Some(DVec3::ZERO));
        assert_eq!(system.find("EARTH"), system.find("earth"));
        assert!(system.find("Vulcan").is_none());
    }

    #[test]
    fn test_phases_stay_wrapped_over_long_run() {
        let mut system = solar();
        for _ in 0..2_000 {
            system.update(0.25);
        }
        for (_, body) in system.bodies() {
            assert!((0.0..TAU).contains(&body.phase()), "{}", body.name());
            assert!((0.0..TAU).contains(&body.rotation_angle()), "{}", body.name());
        }
        assert!((system.elapsed() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_moon_stays_at_fixed_distance_from_earth() {
        let mut system = solar();
        let earth = system.find("Earth").unwrap();
        let moon = system.find("Moon").unwrap();
        for _ in 0..300 {
            system.update(0.1);
            let d = system.position(moon).unwrap() - system.position(earth).unwrap();
            assert!((d.length() - 3.8).abs() < 1e-9);
        }
        assert_eq!(system.children(earth), vec![moon]);
    }

    #[test]
    fn test_satellite_listed_before_parent_still_updates_after_it() {
        let catalog = Catalog {
            bodies: vec![
                spec("Moonlet", Some("Rock")),
                BodySpec {
                    parent: None,
                    orbit: OrbitSpec::Circular {
                        radius: 10.0,
                        angular_speed: 0.5,
                    },
                    ..spec("Rock", None)
                },
            ],
        };
        let mut system = SolarSystem::build(&catalog, 0, KeplerSolver::default()).unwrap();
        system.update(1.3);
        let rock = system.position(system.find("Rock").unwrap()).unwrap();
        let moonlet = system.position(system.find("Moonlet").unwrap()).unwrap();
        assert!(((moonlet - rock).length() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_initial_positions() {
        let a = solar();
        let b = solar();
        let c = SolarSystem::build(&Catalog::solar_system(), 43, KeplerSolver::default()).unwrap();
        assert_eq!(a.snapshots(), b.snapshots());
        assert_ne!(a.snapshots(), c.snapshots());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let catalog = Catalog {
            bodies: vec![spec("Io", None), spec("IO", None)],
        };
        assert!(matches!(
            SolarSystem::build(&catalog, 0, KeplerSolver::default()),
            Err(SystemError::DuplicateBody(_))
        ));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let catalog = Catalog {
            bodies: vec![spec("Phobos", Some("Mars"))],
        };
        assert!(matches!(
            SolarSystem::build(&catalog, 0, KeplerSolver::default()),
            Err(SystemError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_parent_cycle_rejected() {
        let catalog = Catalog {
            bodies: vec![spec("A", Some("B")), spec("B", Some("A"))],
        };
        assert!(matches!(
            SolarSystem::build(&catalog, 0, KeplerSolver::default()),
            Err(SystemError::ParentCycle(_))
        ));
    }

    #[test]
    fn test_invalid_eccentricity_rejected_not_clamped() {
        let mut bad = spec("Comet", None);
        bad.orbit = OrbitSpec::Kepler(OrbitalParameters {
            semi_major_axis: 10.0,
            eccentricity: 1.2,
            inclination_deg: 0.0,
            longitude_of_periapsis_deg: 0.0,
            period_scale: 5.0,
        });
        let err = SolarSystem::build(&Catalog { bodies: vec![bad] }, 0, KeplerSolver::default())
            .unwrap_err();
        assert!(matches!(err, SystemError::InvalidOrbit { .. }));
        assert!(err.to_string().contains("Comet"));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut bad = spec("Dust", None);
        bad.radius = 0.0;
        assert!(matches!(
            SolarSystem::build(&Catalog { bodies: vec![bad] }, 0, KeplerSolver::default()),
            Err(SystemError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_world_orbit_path_is_centred_on_parent() {
        let mut system = solar();
        system.update(3.0);
        let earth = system.position(system.find("Earth").unwrap()).unwrap();
        let path = system.orbit_path(system.find("Moon").unwrap(), 32).unwrap();
        assert_eq!(path.len(), 33);
        for point in path {
            assert!(((point - earth).length() - 3.8).abs() < 1e-9);
        }
        assert!(system.orbit_path(system.find("Sun").unwrap(), 32).is_none());
    }

    #[test]
    fn test_from_config_attaches_belt() {
        let config = Config::default();
        let system = SolarSystem::from_config(&Catalog::solar_system(), &config).unwrap();
        assert_eq!(
            system.belt().map(AsteroidBelt::len),
            Some(config.belt.count as usize)
        );

        let mut no_belt = Config::default();
        no_belt.belt.enabled = false;
        let system = SolarSystem::from_config(&Catalog::solar_system(), &no_belt).unwrap();
        assert!(system.belt().is_none());
    }

    #[test]
    fn test_paused_update_keeps_positions() {
        let mut system = solar();
        let before = system.snapshots();
        system.update(0.0);
        assert_eq!(before, system.snapshots());
    }
}
