//! Steady hold: charge while pressed, drain slowly while released.
use std::time::Duration;

use super::Progress;
use crate::constants::{STEADY_CHARGE_PER_STEP, STEADY_DECAY_PER_STEP, STEADY_STEP};
use crate::timer::Interval;

#[derive(Debug, Clone)]
pub struct SteadyState {
    holding: bool,
    step: Interval,
}

impl SteadyState {
    pub(crate) fn new() -> Self {
        Self {
            holding: false,
            step: Interval::new(STEADY_STEP),
        }
    }

    pub(crate) fn set_holding(&mut self, holding: bool) -> bool {
        let changed = self.holding != holding;
        self.holding = holding;
        changed
    }

    pub(crate) fn tick(&mut self, dt: Duration, progress: &mut Progress) {
        let delta = if self.holding {
            STEADY_CHARGE_PER_STEP
        } else {
            -STEADY_DECAY_PER_STEP
        };
        for _ in 0..self.step.advance(dt) {
            progress.advance(delta);
        }
    }

    #[must_use]
    pub const fn holding(&self) -> bool {
        self.holding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_while_held() {
        let mut state = SteadyState::new();
        let mut progress = Progress::default();
        assert!(state.set_holding(true));
        assert!(!state.set_holding(true));
        state.tick(Duration::from_millis(1_000), &mut progress);
        assert!((progress.value() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn decays_when_released_but_not_below_zero() {
        let mut state = SteadyState::new();
        let mut progress = Progress::default();
        state.set_holding(true);
        state.tick(Duration::from_millis(200), &mut progress);
        state.set_holding(false);
        state.tick(Duration::from_millis(200), &mut progress);
        assert!((progress.value() - 2.0).abs() < 1e-4);
        state.tick(Duration::from_millis(1_000), &mut progress);
        assert!(progress.value().abs() < f32::EPSILON);
    }
}
