//! The application context: configuration, simulation, camera and clock,
//! stepped together once per frame.

use orrery_camera::{CameraController, CameraError, CameraTour, GestureTracker, InputEvent, ModeKind};
use orrery_config::Config;
use orrery_sim::{Catalog, Clock, SolarSystem};
use tracing::{debug, info};

use crate::{AppError, Frame, FrameSink};

/// Owns all mutable state of a running orrery.
pub struct Orrery {
    config: Config,
    system: SolarSystem,
    camera: CameraController,
    clock: Clock,
    gestures: GestureTracker,
    frame_index: u64,
}

impl Orrery {
    /// Build from `config`, loading the catalog it names or the built-in
    /// solar system.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let catalog = match &config.scene.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::solar_system(),
        };
        Self::with_catalog(config, &catalog)
    }

    pub fn with_catalog(config: Config, catalog: &Catalog) -> Result<Self, AppError> {
        config.validate()?;
        let system = SolarSystem::from_config(catalog, &config)?;
        let camera = CameraController::new(&config.camera, &config.input)?;
        let clock = Clock::from_config(&config.simulation);
        let gestures = GestureTracker::new(&config.input);
        info!(
            bodies = system.len(),
            time_scale = clock.time_scale(),
            paused = clock.is_paused(),
            "Orrery ready"
        );
        Ok(Self {
            config,
            system,
            camera,
            clock,
            gestures,
            frame_index: 0,
        })
    }

    /// Step one frame using the real time since the previous call.
    pub fn tick(&mut self) -> Frame {
        let delta = self.clock.tick();
        self.step(delta.wall, delta.simulated)
    }

    /// Step one frame of `frame_time` wall-clock seconds.
    pub fn advance(&mut self, frame_time: f64) -> Frame {
        let delta = self.clock.advance(frame_time);
        self.step(delta.wall, delta.simulated)
    }

    fn step(&mut self, wall: f64, simulated: f64) -> Frame {
        self.system.update(simulated);
        self.camera.update(wall, &self.system);
        let frame = self.frame();
        self.frame_index += 1;

        let every = u64::from(self.config.debug.log_every_n_frames);
        if every != 0 && frame.index % every == 0 {
            debug!(
                frame = frame.index,
                simulated = self.system.elapsed(),
                transitioning = self.camera.is_transitioning(),
                "Frame stepped"
            );
        }
        frame
    }

    /// Run `frames` fixed-length frames, presenting each to `sink`.
    pub fn run<S: FrameSink>(&mut self, frames: u32, frame_time: f64, sink: &mut S) {
        for _ in 0..frames {
            let frame = self.advance(frame_time);
            sink.present(&frame);
        }
    }

    /// Snapshot of the current state without stepping.
    pub fn frame(&self) -> Frame {
        Frame {
            index: self.frame_index,
            simulated_time: self.system.elapsed(),
            paused: self.clock.is_paused(),
            bodies: self.system.snapshots(),
            belt_rotation: self.system.belt().map(|belt| belt.rotation()),
            camera: self.camera.pose(),
            camera_mode: self.camera.mode().kind(),
        }
    }

    // ── User intent ─────────────────────────────────────────────────

    /// Forward an input event to the camera.
    pub fn handle(&mut self, event: InputEvent) -> Result<(), CameraError> {
        self.camera.handle(event, &self.system)
    }

    pub fn set_camera_mode(&mut self, mode: ModeKind, target: Option<&str>) -> Result<(), CameraError> {
        self.camera.set_mode(mode, target, &self.system)
    }

    pub fn zoom_to_body(&mut self, name: &str) -> Result<(), CameraError> {
        self.camera.zoom_to_body(name, &self.system)
    }

    pub fn start_tour(&mut self) {
        self.camera.start_tour(CameraTour::cinematic());
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        info!(paused, "Simulation pause toggled");
        paused
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.clock.set_time_scale(time_scale);
    }

    /// Gesture tracker configured from the input settings, for hosts that
    /// feed raw pointer samples.
    pub fn gestures_mut(&mut self) -> &mut GestureTracker {
        &mut self.gestures
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}
