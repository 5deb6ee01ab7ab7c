//! Camera state machine: computes a target pose for the active mode each frame
//! and eases the current pose toward it.

use glam::DVec3;
use orrery_config::{CameraConfig, FreeCameraConfig, InputConfig};
use orrery_orbits::sanitize_delta;
use orrery_sim::{BodyId, SolarSystem};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::mode::{FollowParams, FreeOrbit, OverviewParams};
use crate::tour::{CameraTour, TourAction};
use crate::{CameraError, CameraMode, InputEvent, ModeKind};

/// Where the camera starts before its first update.
const INITIAL_POSITION: DVec3 = DVec3::new(80.0, 50.0, 80.0);

/// Offset direction of a body close-up, scaled by the framing size.
const FRAMING_OFFSET: DVec3 = DVec3::new(1.5, 0.5, 1.2);

/// A camera placement: eye position and the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: DVec3,
    pub look_at: DVec3,
}

impl CameraPose {
    /// Unit view direction, or -Z when the two points coincide.
    pub fn direction(&self) -> DVec3 {
        let dir = (self.look_at - self.position).normalize_or_zero();
        if dir == DVec3::ZERO { DVec3::NEG_Z } else { dir }
    }
}

/// Close-up of one body, held until the user steers the camera again.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Framing {
    body: BodyId,
    size: f64,
}

/// Summary for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraInfo {
    pub mode: ModeKind,
    /// Followed body, if any.
    pub target: Option<String>,
    pub position: DVec3,
    /// Distance parameter of the active mode.
    pub distance: f64,
    pub transitioning: bool,
}

/// Saved camera parameters and pose; see [`CameraController::save_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub mode: ModeKind,
    pub follow_target: Option<String>,
    pub free_radius: f64,
    pub free_polar: f64,
    pub free_azimuth: f64,
    pub follow_distance: f64,
    pub overview_distance: f64,
    pub pose: CameraPose,
}

/// Multi-mode camera: free orbit, follow and overview, with smoothed
/// transitions between them.
#[derive(Debug, Clone)]
pub struct CameraController {
    mode: CameraMode,
    free: FreeOrbit,
    free_defaults: FreeCameraConfig,
    follow: FollowParams,
    overview: OverviewParams,
    framing: Option<Framing>,
    radius_factor: f64,
    min_frame_size: f64,
    position: DVec3,
    direction: DVec3,
    target: CameraPose,
    transitioning: bool,
    smoothing: f64,
    arrival_threshold: f64,
    drag_sensitivity: f64,
    invert_y: bool,
    tour: Option<CameraTour>,
}

impl CameraController {
    /// Build the controller in free mode.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidConfig`] for settings that fail
    /// validation, such as an inverted zoom range or a NaN angle.
    pub fn new(camera: &CameraConfig, input: &InputConfig) -> Result<Self, CameraError> {
        camera
            .validate()
            .and_then(|()| input.validate())
            .map_err(|err| CameraError::InvalidConfig(err.to_string()))?;

        let free = FreeOrbit::from_config(&camera.free);
        let target = CameraPose {
            position: free.position(),
            look_at: DVec3::ZERO,
        };
        Ok(Self {
            mode: CameraMode::Free,
            free,
            free_defaults: camera.free.clone(),
            follow: FollowParams::from_config(&camera.follow),
            overview: OverviewParams::from_config(&camera.overview),
            framing: None,
            radius_factor: camera.framing.radius_factor,
            min_frame_size: camera.framing.min_size,
            position: INITIAL_POSITION,
            direction: (-INITIAL_POSITION).normalize(),
            target,
            transitioning: false,
            smoothing: camera.smoothing.clamp(0.0, 1.0),
            arrival_threshold: camera.arrival_threshold,
            drag_sensitivity: input.drag_sensitivity,
            invert_y: input.invert_y,
            tour: None,
        })
    }

    // ── Requests ────────────────────────────────────────────────────

    /// Switch mode. Follow needs a target body name; the other modes ignore it.
    ///
    /// On error nothing changes, including any running tour.
    pub fn set_mode(
        &mut self,
        kind: ModeKind,
        target: Option<&str>,
        system: &SolarSystem,
    ) -> Result<(), CameraError> {
        self.switch_mode(kind, target, system)?;
        self.cancel_tour();
        Ok(())
    }

    /// Shorthand for follow mode on `name`.
    pub fn follow_body(&mut self, name: &str, system: &SolarSystem) -> Result<(), CameraError> {
        self.set_mode(ModeKind::Follow, Some(name), system)
    }

    /// Frame `name` in a close-up sized to its radius. The mode is unchanged.
    pub fn zoom_to_body(&mut self, name: &str, system: &SolarSystem) -> Result<(), CameraError> {
        self.frame_body(name, system)?;
        self.cancel_tour();
        Ok(())
    }

    /// Back to free mode with the configured starting angles and radius.
    pub fn reset_view(&mut self) {
        self.cancel_tour();
        self.free = FreeOrbit::from_config(&self.free_defaults);
        self.mode = CameraMode::Free;
        self.framing = None;
        self.target = self.free_target();
        self.transitioning = true;
        info!("Camera view reset");
    }

    /// Pointer drag in pixels. Steers only the free orbit.
    pub fn on_drag(&mut self, dx: f64, dy: f64) {
        if self.mode != CameraMode::Free {
            trace!(mode = %self.mode.kind(), "Drag ignored outside free mode");
            return;
        }
        let dy = if self.invert_y { -dy } else { dy };
        self.free
            .rotate(dx * self.drag_sensitivity, dy * self.drag_sensitivity);
        self.release_framing();
    }

    /// Adjust the active mode's distance by `delta`.
    pub fn on_zoom(&mut self, delta: f64) {
        match self.mode {
            CameraMode::Free => self.free.zoom(delta),
            CameraMode::Follow(_) => self.follow.zoom(delta),
            CameraMode::Overview => self.overview.zoom(delta),
        }
        self.release_framing();
    }

    /// Apply one user-intent event.
    pub fn handle(&mut self, event: InputEvent, system: &SolarSystem) -> Result<(), CameraError> {
        match event {
            InputEvent::Drag { dx, dy } => self.on_drag(dx, dy),
            InputEvent::Zoom { delta } => self.on_zoom(delta),
            InputEvent::BodySelected(name) => self.zoom_to_body(&name, system)?,
            InputEvent::ModeRequested { mode, target } => {
                self.set_mode(mode, target.as_deref(), system)?
            }
            InputEvent::ResetRequested => self.reset_view(),
        }
        Ok(())
    }

    /// Start a scripted tour, replacing any running one. Its first step fires
    /// on the next update.
    pub fn start_tour(&mut self, tour: CameraTour) {
        info!(steps = tour.pending(), "Camera tour started");
        self.tour = Some(tour);
    }

    pub fn cancel_tour(&mut self) {
        if self.tour.take().is_some() {
            debug!("Camera tour cancelled");
        }
    }

    pub fn is_touring(&self) -> bool {
        self.tour.is_some()
    }

    // ── Per-frame update ────────────────────────────────────────────

    /// Advance by `dt` wall-clock seconds against the current body positions.
    pub fn update(&mut self, dt: f64, system: &SolarSystem) {
        let dt = sanitize_delta(dt);
        self.follow.tick(dt);
        self.overview.tick(dt);
        self.advance_tour(dt, system);
        self.refresh_target(system);

        if self.transitioning {
            self.ease();
        } else {
            self.position = self.target.position;
            let dir = (self.target.look_at - self.position).normalize_or_zero();
            if dir != DVec3::ZERO {
                self.direction = dir;
            }
        }
    }

    fn ease(&mut self) {
        self.position = self.position.lerp(self.target.position, self.smoothing);
        let wanted = (self.target.look_at - self.position).normalize_or_zero();
        if wanted != DVec3::ZERO {
            let blended = self.direction.lerp(wanted, self.smoothing).normalize_or_zero();
            self.direction = if blended == DVec3::ZERO { wanted } else { blended };
        }
        if self.position.distance(self.target.position) < self.arrival_threshold {
            self.transitioning = false;
            debug!(mode = %self.mode.kind(), "Camera transition complete");
        }
    }

    fn advance_tour(&mut self, dt: f64, system: &SolarSystem) {
        let Some(tour) = &mut self.tour else {
            return;
        };
        let due = tour.advance(dt);
        let finished = tour.is_finished();
        for action in due {
            debug!(?action, "Tour step");
            let result = match &action {
                TourAction::Free => self.switch_mode(ModeKind::Free, None, system),
                TourAction::Overview => self.switch_mode(ModeKind::Overview, None, system),
                TourAction::Follow(name) => self.switch_mode(ModeKind::Follow, Some(name), system),
                TourAction::Zoom(name) => self.frame_body(name, system),
            };
            // A failed step still holds for its duration.
            if let Err(err) = result {
                warn!(%err, "Tour step skipped");
            }
        }
        if finished {
            self.tour = None;
            info!("Camera tour finished");
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn switch_mode(
        &mut self,
        kind: ModeKind,
        target: Option<&str>,
        system: &SolarSystem,
    ) -> Result<(), CameraError> {
        let mode = match kind {
            ModeKind::Free => CameraMode::Free,
            ModeKind::Overview => CameraMode::Overview,
            ModeKind::Follow => {
                let name = target.ok_or_else(|| {
                    warn!("Follow mode requested without a target");
                    CameraError::MissingFollowTarget
                })?;
                CameraMode::Follow(lookup(name, system)?)
            }
        };
        self.mode = mode;
        self.framing = None;
        self.transitioning = true;
        self.refresh_target(system);
        info!(mode = %kind, target, "Camera mode changed");
        Ok(())
    }

    fn frame_body(&mut self, name: &str, system: &SolarSystem) -> Result<(), CameraError> {
        let body = lookup(name, system)?;
        let radius = system.body(body).map_or(1.0, |b| b.radius());
        let size = (radius * self.radius_factor).max(self.min_frame_size);
        self.framing = Some(Framing { body, size });
        self.transitioning = true;
        self.refresh_target(system);
        info!(body = name, size, "Zooming to body");
        Ok(())
    }

    fn release_framing(&mut self) {
        if self.framing.take().is_some() {
            self.transitioning = true;
        }
    }

    fn free_target(&self) -> CameraPose {
        CameraPose {
            position: self.free.position(),
            look_at: DVec3::ZERO,
        }
    }

    /// Recompute the target pose. A body that cannot be found leaves the
    /// previous target in place.
    fn refresh_target(&mut self, system: &SolarSystem) {
        if let Some(Framing { body, size }) = self.framing {
            if let Some(center) = system.position(body) {
                self.target = CameraPose {
                    position: center + FRAMING_OFFSET * size,
                    look_at: center,
                };
            }
            return;
        }
        match self.mode {
            CameraMode::Free => self.target = self.free_target(),
            CameraMode::Follow(body) => {
                if let Some(center) = system.position(body) {
                    self.target = CameraPose {
                        position: center + self.follow.offset(),
                        look_at: center,
                    };
                }
            }
            CameraMode::Overview => {
                self.target = CameraPose {
                    position: self.overview.position(),
                    look_at: DVec3::ZERO,
                };
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Current eye position and look-at point.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            look_at: self.position + self.direction,
        }
    }

    /// Pose the camera is moving toward.
    pub fn target(&self) -> CameraPose {
        self.target
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Whether a zoom-to-body close-up is active.
    pub fn is_framing(&self) -> bool {
        self.framing.is_some()
    }

    pub fn free_orbit(&self) -> &FreeOrbit {
        &self.free
    }

    pub fn follow_params(&self) -> &FollowParams {
        &self.follow
    }

    pub fn overview_params(&self) -> &OverviewParams {
        &self.overview
    }

    pub fn info(&self, system: &SolarSystem) -> CameraInfo {
        let target = match self.mode {
            CameraMode::Follow(id) => system.body(id).map(|b| b.name().to_string()),
            _ => None,
        };
        let distance = match self.mode {
            CameraMode::Free => self.free.radius(),
            CameraMode::Follow(_) => self.follow.distance(),
            CameraMode::Overview => self.overview.distance(),
        };
        CameraInfo {
            mode: self.mode.kind(),
            target,
            position: self.position,
            distance,
            transitioning: self.transitioning,
        }
    }

    // ── Save / restore ──────────────────────────────────────────────

    pub fn save_state(&self, system: &SolarSystem) -> CameraSnapshot {
        let follow_target = match self.mode {
            CameraMode::Follow(id) => system.body(id).map(|b| b.name().to_string()),
            _ => None,
        };
        CameraSnapshot {
            mode: self.mode.kind(),
            follow_target,
            free_radius: self.free.radius(),
            free_polar: self.free.polar(),
            free_azimuth: self.free.azimuth(),
            follow_distance: self.follow.distance(),
            overview_distance: self.overview.distance(),
            pose: self.pose(),
        }
    }

    /// Restore parameters and pose from a snapshot. Values outside a mode's
    /// limits are clamped. Fails without changes if the followed body is gone.
    pub fn restore(
        &mut self,
        snapshot: &CameraSnapshot,
        system: &SolarSystem,
    ) -> Result<(), CameraError> {
        let mode = match snapshot.mode {
            ModeKind::Free => CameraMode::Free,
            ModeKind::Overview => CameraMode::Overview,
            ModeKind::Follow => {
                let name = snapshot
                    .follow_target
                    .as_deref()
                    .ok_or(CameraError::MissingFollowTarget)?;
                CameraMode::Follow(lookup(name, system)?)
            }
        };

        self.cancel_tour();
        self.mode = mode;
        self.framing = None;
        self.free
            .set(snapshot.free_radius, snapshot.free_polar, snapshot.free_azimuth);
        self.follow.set_distance(snapshot.follow_distance);
        self.overview.set_distance(snapshot.overview_distance);
        if snapshot.pose.position.is_finite() && snapshot.pose.look_at.is_finite() {
            self.position = snapshot.pose.position;
            self.direction = snapshot.pose.direction();
        }
        self.transitioning = true;
        self.refresh_target(system);
        debug!(mode = %snapshot.mode, "Camera state restored");
        Ok(())
    }
}

fn lookup(name: &str, system: &SolarSystem) -> Result<BodyId, CameraError> {
    system.find(name).ok_or_else(|| {
        warn!(name, "Camera target not found");
        CameraError::BodyNotFound {
            name: name.to_string(),
        }
    })
}
