//! Wall-clock to simulated-time conversion.
//!
//! One [`Clock::tick`] per rendered frame measures the real frame time, clamps
//! it, and scales it into a simulated delta. Hosts that already know their
//! frame time (tests, fixed-rate drivers) call [`Clock::advance`] instead.

use std::time::Instant;

use orrery_config::SimulationConfig;
use orrery_orbits::sanitize_delta;
use tracing::{debug, warn};

/// Default maximum frame time: a stalled frame counts as 250 ms.
pub const DEFAULT_MAX_FRAME_TIME: f64 = 0.25;

/// Time deltas produced for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameDelta {
    /// Clamped wall-clock seconds. Drives camera motion, which keeps running
    /// while the simulation is paused.
    pub wall: f64,
    /// Simulated seconds: `wall * time_scale`, or zero while paused.
    pub simulated: f64,
}

/// Frame clock with pause and time scaling.
#[derive(Debug, Clone)]
pub struct Clock {
    previous_time: Option<Instant>,
    time_scale: f64,
    max_frame_time: f64,
    paused: bool,
    wall_elapsed: f64,
    simulated_elapsed: f64,
    frame_count: u64,
}

impl Clock {
    /// Create a running clock. Invalid arguments fall back to defaults.
    pub fn new(time_scale: f64, max_frame_time: f64) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale >= 0.0 {
            time_scale
        } else {
            1.0
        };
        let max_frame_time = if max_frame_time.is_finite() && max_frame_time > 0.0 {
            max_frame_time
        } else {
            DEFAULT_MAX_FRAME_TIME
        };
        Self {
            previous_time: None,
            time_scale,
            max_frame_time,
            paused: false,
            wall_elapsed: 0.0,
            simulated_elapsed: 0.0,
            frame_count: 0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut clock = Self::new(config.time_scale, config.max_frame_time);
        clock.paused = config.start_paused;
        clock
    }

    /// Measure real time since the previous tick and convert it.
    ///
    /// The first call has nothing to measure against and yields a zero delta.
    pub fn tick(&mut self) -> FrameDelta {
        let now = Instant::now();
        let frame_time = self
            .previous_time
            .map(|prev| now.duration_since(prev).as_secs_f64())
            .unwrap_or(0.0);
        self.previous_time = Some(now);
        self.advance(frame_time)
    }

    /// Convert an explicit wall-clock frame time into a [`FrameDelta`].
    ///
    /// Negative or non-finite frame times count as zero; long frames are
    /// clamped to the maximum frame time.
    pub fn advance(&mut self, frame_time: f64) -> FrameDelta {
        let mut wall = sanitize_delta(frame_time);
        if wall > self.max_frame_time {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                wall * 1000.0,
                self.max_frame_time * 1000.0
            );
            wall = self.max_frame_time;
        }

        let simulated = if self.paused {
            0.0
        } else {
            wall * self.time_scale
        };

        self.wall_elapsed += wall;
        self.simulated_elapsed += simulated;
        self.frame_count += 1;

        FrameDelta { wall, simulated }
    }

    /// Change the simulated-seconds-per-wall-second ratio.
    ///
    /// Negative and non-finite scales are ignored.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if !(time_scale.is_finite() && time_scale >= 0.0) {
            warn!(time_scale, "Ignoring invalid time scale");
            return;
        }
        debug!(from = self.time_scale, to = time_scale, "Time scale changed");
        self.time_scale = time_scale;
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the paused state and return the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total clamped wall-clock seconds seen so far.
    pub fn wall_elapsed(&self) -> f64 {
        self.wall_elapsed
    }

    /// Total simulated seconds produced so far.
    pub fn simulated_elapsed(&self) -> f64 {
        self.simulated_elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_MAX_FRAME_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn test_unit_scale_passes_frame_through() {
        let mut clock = Clock::default();
        let delta = clock.advance(FRAME);
        assert!((delta.wall - FRAME).abs() < 1e-15);
        assert!((delta.simulated - FRAME).abs() < 1e-15);
    }

    #[test]
    fn test_time_scale_multiplies_simulated_delta() {
        let mut clock = Clock::new(20.0, 0.25);
        let delta = clock.advance(0.1);
        assert!((delta.wall - 0.1).abs() < 1e-15);
        assert!((delta.simulated - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = Clock::default();
        let delta = clock.advance(3.0);
        assert_eq!(delta.wall, DEFAULT_MAX_FRAME_TIME);
        assert_eq!(delta.simulated, DEFAULT_MAX_FRAME_TIME);
    }

    #[test]
    fn test_degenerate_frame_time_is_zero() {
        let mut clock = Clock::default();
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let delta = clock.advance(bad);
            assert_eq!(delta, FrameDelta::default(), "frame time {bad}");
        }
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn test_paused_clock_keeps_wall_time() {
        let mut clock = Clock::default();
        clock.pause();
        let delta = clock.advance(FRAME);
        assert_eq!(delta.simulated, 0.0);
        assert!(delta.wall > 0.0);
        assert!(!clock.toggle_pause());
        assert!(clock.advance(FRAME).simulated > 0.0);
    }

    #[test]
    fn test_elapsed_totals_accumulate() {
        let mut clock = Clock::new(2.0, 0.25);
        for _ in 0..60 {
            clock.advance(FRAME);
        }
        assert!((clock.wall_elapsed() - 1.0).abs() < 1e-9);
        assert!((clock.simulated_elapsed() - 2.0).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 60);
    }

    #[test]
    fn test_invalid_time_scale_ignored() {
        let mut clock = Clock::new(3.0, 0.25);
        clock.set_time_scale(-1.0);
        clock.set_time_scale(f64::NAN);
        assert_eq!(clock.time_scale(), 3.0);
        clock.set_time_scale(0.0);
        assert_eq!(clock.advance(FRAME).simulated, 0.0);
    }

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = Clock::default();
        let delta = clock.tick();
        assert_eq!(delta.wall, 0.0);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_from_config_honours_start_paused() {
        let config = SimulationConfig {
            start_paused: true,
            time_scale: 5.0,
            ..Default::default()
        };
        let clock = Clock::from_config(&config);
        assert!(clock.is_paused());
        assert_eq!(clock.time_scale(), 5.0);
    }

    #[test]
    fn test_deterministic_sequence() {
        let frame_times = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];
        let mut a = Clock::new(4.0, 0.25);
        let mut b = Clock::new(4.0, 0.25);
        for &ft in &frame_times {
            assert_eq!(a.advance(ft), b.advance(ft));
        }
        assert_eq!(a.simulated_elapsed(), b.simulated_elapsed());
    }
}
