//! Configuration structs with sensible defaults and RON persistence.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};
use std::path::{Path, PathBuf};

use orrery_orbits::KeplerSolver;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Clock and orbit integration settings.
    pub simulation: SimulationConfig,
    /// Camera modes, ranges and easing.
    pub camera: CameraConfig,
    /// Pointer and wheel scaling.
    pub input: InputConfig,
    /// Asteroid belt particle cloud.
    pub belt: AsteroidBeltConfig,
    /// Body catalog source.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Simulation clock and orbit model settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulated seconds per wall-clock second.
    pub time_scale: f64,
    /// Longest wall-clock frame accepted before clamping, in seconds.
    pub max_frame_time: f64,
    /// Start with the simulation clock paused.
    pub start_paused: bool,
    /// Seed for initial orbital phases and the asteroid belt.
    pub seed: u64,
    /// How Kepler's equation is solved for elliptical orbits.
    pub kepler_solver: KeplerSolver,
    /// Segments used when sampling orbit curves for drawing.
    pub orbit_path_segments: u32,
}

/// Camera controller settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per update while transitioning.
    pub smoothing: f64,
    /// Distance to the target pose below which a transition ends.
    pub arrival_threshold: f64,
    pub free: FreeCameraConfig,
    pub follow: FollowCameraConfig,
    pub overview: OverviewCameraConfig,
    pub framing: FramingConfig,
}

/// Free-orbit mode: spherical coordinates around the origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FreeCameraConfig {
    /// Initial (and reset) distance from the origin.
    pub radius: f64,
    /// Initial polar angle from +Y in radians.
    pub polar: f64,
    /// Initial azimuth in radians.
    pub azimuth: f64,
    pub radius_min: f64,
    pub radius_max: f64,
    /// Keeps the polar angle inside `[margin, π − margin]`.
    pub polar_margin: f64,
}

/// Follow mode: circles a body at a fixed distance and height.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FollowCameraConfig {
    pub distance: f64,
    pub height: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    /// Multiplier applied to zoom deltas in this mode.
    pub zoom_scale: f64,
    /// Wall-clock radians per second the camera circles the body.
    pub orbit_rate: f64,
}

/// Overview mode: slow auto-rotation around the whole system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverviewCameraConfig {
    pub distance: f64,
    pub height: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    /// Wall-clock radians per second of auto-rotation.
    pub rotate_rate: f64,
}

/// Shot used by zoom-to-body: offset scales with the body's display radius.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FramingConfig {
    /// Framing size per unit of body radius.
    pub radius_factor: f64,
    /// Smallest framing size, so tiny bodies stay visible.
    pub min_size: f64,
}

/// Input scaling for pointer gestures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of orbit per pixel dragged.
    pub drag_sensitivity: f64,
    /// Zoom units per wheel delta unit.
    pub wheel_scale: f64,
    /// Zoom units per pixel of pinch distance change.
    pub pinch_scale: f64,
    /// Invert vertical drag.
    pub invert_y: bool,
}

/// Asteroid belt between Mars and Jupiter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AsteroidBeltConfig {
    pub enabled: bool,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub count: u32,
    /// Total vertical thickness of the belt.
    pub vertical_spread: f64,
    /// Relative radial jitter applied to each particle.
    pub radius_jitter: f64,
    /// Radians per simulated second the whole belt turns.
    pub rotation_speed: f64,
}

/// Where the body table comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// RON catalog to load instead of the built-in solar system.
    pub catalog_path: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Emit a frame summary every N frames (0 disables).
    pub log_every_n_frames: u32,
}

// --- Default implementations ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_frame_time: 0.25,
            start_paused: false,
            seed: 0x50_1A_2E,
            kepler_solver: KeplerSolver::default(),
            orbit_path_segments: 128,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.05,
            arrival_threshold: 1.0,
            free: FreeCameraConfig::default(),
            follow: FollowCameraConfig::default(),
            overview: OverviewCameraConfig::default(),
            framing: FramingConfig::default(),
        }
    }
}

impl Default for FreeCameraConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            polar: FRAC_PI_6,
            azimuth: FRAC_PI_4,
            radius_min: 30.0,
            radius_max: 400.0,
            polar_margin: 0.1,
        }
    }
}

impl Default for FollowCameraConfig {
    fn default() -> Self {
        Self {
            distance: 15.0,
            height: 8.0,
            distance_min: 5.0,
            distance_max: 50.0,
            zoom_scale: 0.1,
            orbit_rate: 0.5,
        }
    }
}

impl Default for OverviewCameraConfig {
    fn default() -> Self {
        Self {
            distance: 300.0,
            height: 150.0,
            distance_min: 200.0,
            distance_max: 500.0,
            rotate_rate: 0.2,
        }
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            radius_factor: 4.0,
            min_size: 10.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            wheel_scale: 0.2,
            pinch_scale: 0.8,
            invert_y: false,
        }
    }
}

impl Default for AsteroidBeltConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inner_radius: 40.0,
            outer_radius: 60.0,
            count: 1500,
            vertical_spread: 3.0,
            radius_jitter: 0.3,
            rotation_speed: 0.001,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_every_n_frames: 60,
        }
    }
}

// --- Validation ---

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    check_positive(field, min)?;
    if !(min <= max) {
        return Err(invalid(field, format!("range [{min}, {max}] is empty")));
    }
    if !(min..=max).contains(&value) {
        return Err(invalid(field, format!("{value} is outside [{min}, {max}]")));
    }
    Ok(())
}

impl CameraConfig {
    /// Reject camera settings that would put a non-finite value into the pose.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(invalid(
                "camera.smoothing",
                format!("must be in (0, 1], got {}", self.smoothing),
            ));
        }
        check_positive("camera.arrival_threshold", self.arrival_threshold)?;

        let free = &self.free;
        check_range("camera.free.radius", free.radius, free.radius_min, free.radius_max)?;
        check_finite("camera.free.polar", free.polar)?;
        check_finite("camera.free.azimuth", free.azimuth)?;
        if !(free.polar_margin > 0.0 && free.polar_margin < FRAC_PI_2) {
            return Err(invalid(
                "camera.free.polar_margin",
                format!("must be in (0, π/2), got {}", free.polar_margin),
            ));
        }

        let follow = &self.follow;
        check_range(
            "camera.follow.distance",
            follow.distance,
            follow.distance_min,
            follow.distance_max,
        )?;
        check_finite("camera.follow.height", follow.height)?;
        check_finite("camera.follow.zoom_scale", follow.zoom_scale)?;
        check_finite("camera.follow.orbit_rate", follow.orbit_rate)?;

        let overview = &self.overview;
        check_range(
            "camera.overview.distance",
            overview.distance,
            overview.distance_min,
            overview.distance_max,
        )?;
        check_finite("camera.overview.height", overview.height)?;
        check_finite("camera.overview.rotate_rate", overview.rotate_rate)?;

        check_positive("camera.framing.radius_factor", self.framing.radius_factor)?;
        check_positive("camera.framing.min_size", self.framing.min_size)?;
        Ok(())
    }
}

impl InputConfig {
    /// Reject non-finite gesture scales.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("input.drag_sensitivity", self.drag_sensitivity)?;
        check_finite("input.wheel_scale", self.wheel_scale)?;
        check_finite("input.pinch_scale", self.pinch_scale)?;
        Ok(())
    }
}

impl Config {
    /// Reject settings the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(sim.time_scale.is_finite() && sim.time_scale >= 0.0) {
            return Err(invalid(
                "simulation.time_scale",
                format!("must be finite and non-negative, got {}", sim.time_scale),
            ));
        }
        check_positive("simulation.max_frame_time", sim.max_frame_time)?;

        self.camera.validate()?;
        self.input.validate()?;

        let belt = &self.belt;
        if belt.enabled {
            check_positive("belt.inner_radius", belt.inner_radius)?;
            if !(belt.outer_radius > belt.inner_radius) {
                return Err(invalid(
                    "belt.outer_radius",
                    format!(
                        "must exceed inner radius {}, got {}",
                        belt.inner_radius, belt.outer_radius
                    ),
                ));
            }
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

fn read_config(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let config: Config = ron::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: config_dir.join(CONFIG_FILE),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(write_err)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
