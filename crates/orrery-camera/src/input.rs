//! User-intent events and the gesture tracker that produces them.
//!
//! [`GestureTracker`] is fed raw pointer, wheel and touch samples by whatever
//! windowing layer hosts the orrery and turns them into [`InputEvent`]s for
//! [`CameraController::handle`](crate::CameraController::handle).

use glam::DVec2;
use orrery_config::InputConfig;

use crate::ModeKind;

/// What the user asked the camera to do.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer drag in pixels since the previous drag event.
    Drag { dx: f64, dy: f64 },
    /// Zoom in scene units; positive moves away.
    Zoom { delta: f64 },
    /// A body was picked; frame it.
    BodySelected(String),
    /// Switch mode. Follow needs a target.
    ModeRequested {
        mode: ModeKind,
        target: Option<String>,
    },
    ResetRequested,
}

/// Accumulates pointer and touch state between samples.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    pointer_down: bool,
    last_pointer: DVec2,
    touches: Vec<DVec2>,
    wheel_scale: f64,
    pinch_scale: f64,
}

impl GestureTracker {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            pointer_down: false,
            last_pointer: DVec2::ZERO,
            touches: Vec::new(),
            wheel_scale: config.wheel_scale,
            pinch_scale: config.pinch_scale,
        }
    }

    /// Primary button pressed. Hosts forward only primary-button presses here.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) {
        self.pointer_down = true;
        self.last_pointer = DVec2::new(x, y);
    }

    pub fn pointer_released(&mut self) {
        self.pointer_down = false;
    }

    /// Pointer moved. Yields a drag only while the button is held.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> Option<InputEvent> {
        if !self.pointer_down {
            return None;
        }
        let now = DVec2::new(x, y);
        let delta = now - self.last_pointer;
        self.last_pointer = now;
        Some(InputEvent::Drag {
            dx: delta.x,
            dy: delta.y,
        })
    }

    /// Mouse wheel with the raw vertical delta.
    pub fn wheel(&mut self, delta_y: f64) -> InputEvent {
        InputEvent::Zoom {
            delta: delta_y * self.wheel_scale,
        }
    }

    pub fn touches_started(&mut self, touches: &[DVec2]) {
        self.touches = touches.to_vec();
    }

    /// Touch points moved. One finger drags; two fingers pinch-zoom, where
    /// spreading the fingers apart zooms in.
    pub fn touches_moved(&mut self, touches: &[DVec2]) -> Option<InputEvent> {
        let event = match (self.touches.as_slice(), touches) {
            ([old], [new]) => {
                let delta = *new - *old;
                Some(InputEvent::Drag {
                    dx: delta.x,
                    dy: delta.y,
                })
            }
            ([a0, a1], [b0, b1]) => {
                let old_span = a0.distance(*a1);
                let new_span = b0.distance(*b1);
                Some(InputEvent::Zoom {
                    delta: (old_span - new_span) * self.pinch_scale,
                })
            }
            _ => None,
        };
        self.touches = touches.to_vec();
        event
    }

    pub fn touches_ended(&mut self, remaining: &[DVec2]) {
        self.touches = remaining.to_vec();
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}
