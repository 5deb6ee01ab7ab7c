//! Scripted camera tours: a queue of timed steps driven by the camera's own
//! per-frame update, so a tour is as deterministic as the frame times fed to it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// What a tour step asks the camera to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TourAction {
    Free,
    Overview,
    /// Enter follow mode on the named body.
    Follow(String),
    /// Frame the named body without changing mode.
    Zoom(String),
}

/// One step: perform `action`, then hold for `duration` wall-clock seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    pub action: TourAction,
    pub duration: f64,
}

impl TourStep {
    pub fn new(action: TourAction, duration: f64) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        Self { action, duration }
    }
}

/// A running or pending tour.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTour {
    steps: VecDeque<TourStep>,
    /// Hold time left on the step that fired last.
    remaining: f64,
    fired: usize,
}

impl CameraTour {
    pub fn new(steps: impl IntoIterator<Item = TourStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            remaining: 0.0,
            fired: 0,
        }
    }

    /// Overview, the Sun, Earth up close, the gas giants, and back out.
    pub fn cinematic() -> Self {
        Self::new([
            TourStep::new(TourAction::Overview, 3.0),
            TourStep::new(TourAction::Zoom("sun".into()), 2.0),
            TourStep::new(TourAction::Follow("earth".into()), 3.0),
            TourStep::new(TourAction::Zoom("jupiter".into()), 2.0),
            TourStep::new(TourAction::Zoom("saturn".into()), 2.0),
            TourStep::new(TourAction::Overview, 2.0),
        ])
    }

    /// Spend `dt` seconds and return the actions that became due, in order.
    ///
    /// The first call fires the first step immediately. Leftover time carries
    /// into the next step, so a long frame may fire several steps at once.
    pub fn advance(&mut self, dt: f64) -> Vec<TourAction> {
        let mut due = Vec::new();
        if dt.is_finite() && dt > 0.0 {
            self.remaining -= dt;
        }
        while self.remaining <= 0.0 {
            let Some(step) = self.steps.pop_front() else {
                break;
            };
            self.remaining += step.duration;
            self.fired += 1;
            due.push(step.action);
        }
        due
    }

    /// True once every step has fired and the last hold has elapsed.
    pub fn is_finished(&self) -> bool {
        self.steps.is_empty() && self.remaining <= 0.0
    }

    /// Steps not yet fired.
    pub fn pending(&self) -> usize {
        self.steps.len()
    }

    /// Steps fired so far.
    pub fn fired(&self) -> usize {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_fires_immediately() {
        let mut tour = CameraTour::cinematic();
        assert_eq!(tour.advance(0.0), vec![TourAction::Overview]);
        assert_eq!(tour.pending(), 5);
    }

    #[test]
    fn test_steps_fire_in_order_at_their_times() {
        let mut tour = CameraTour::cinematic();
        let mut log: Vec<(f64, TourAction)> =
            tour.advance(0.0).into_iter().map(|a| (0.0, a)).collect();
        let mut elapsed = 0.0;
        while !tour.is_finished() {
            elapsed += 0.5;
            for action in tour.advance(0.5) {
                log.push((elapsed, action));
            }
        }
        let times: Vec<f64> = log.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.0, 3.0, 5.0, 8.0, 10.0, 12.0]);
        assert_eq!(log[2].1, TourAction::Follow("earth".into()));
        assert_eq!(log[5].1, TourAction::Overview);
        assert_eq!(elapsed, 14.0);
    }

    #[test]
    fn test_long_frame_fires_several_steps() {
        let mut tour = CameraTour::cinematic();
        tour.advance(0.0);
        let due = tour.advance(5.5);
        assert_eq!(
            due,
            vec![TourAction::Zoom("sun".into()), TourAction::Follow("earth".into())]
        );
        assert_eq!(tour.fired(), 3);
    }

    #[test]
    fn test_empty_tour_is_finished() {
        let mut tour = CameraTour::new([]);
        assert!(tour.advance(1.0).is_empty());
        assert!(tour.is_finished());
    }

    #[test]
    fn test_negative_duration_treated_as_zero() {
        assert_eq!(TourStep::new(TourAction::Free, -4.0).duration, 0.0);
    }
}
