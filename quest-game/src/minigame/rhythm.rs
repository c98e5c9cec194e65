//! Rhythm tap: tap while the pad pulses to bring the two figures together.
use std::time::Duration;

use super::Progress;
use crate::constants::{RHYTHM_PERIOD, RHYTHM_PROGRESS_PER_HIT, RHYTHM_PULSE};

#[derive(Debug, Clone, Default)]
pub struct RhythmState {
    elapsed: Duration,
    hits: u32,
    misses: u32,
}

impl RhythmState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// A tap inside the pulse scores; outside it is simply ignored.
    pub(crate) fn tap(&mut self, progress: &mut Progress) -> bool {
        if !self.pulsing() {
            self.misses += 1;
            return false;
        }
        self.hits += 1;
        progress.advance(RHYTHM_PROGRESS_PER_HIT);
        true
    }

    /// The first pulse starts one full period after play begins and each
    /// stays visible for [`RHYTHM_PULSE`].
    #[must_use]
    pub fn pulsing(&self) -> bool {
        self.elapsed >= RHYTHM_PERIOD
            && self.elapsed.as_nanos() % RHYTHM_PERIOD.as_nanos() < RHYTHM_PULSE.as_nanos()
    }

    /// Time until the next pulse begins; zero while pulsing.
    #[must_use]
    pub fn until_next_pulse(&self) -> Duration {
        if self.pulsing() {
            return Duration::ZERO;
        }
        let period = RHYTHM_PERIOD.as_nanos();
        let phase = self.elapsed.as_nanos() % period;
        let wait = u64::try_from(period - phase).unwrap_or(u64::MAX);
        Duration::from_nanos(wait)
    }

    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.hits
    }

    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pulse_before_the_first_beat() {
        let mut state = RhythmState::new();
        let mut progress = Progress::default();
        state.tick(Duration::from_millis(300));
        assert!(!state.pulsing());
        assert!(!state.tap(&mut progress));
        assert_eq!(state.misses(), 1);
        assert!(progress.value().abs() < f32::EPSILON);
    }

    #[test]
    fn pulse_window_is_half_open() {
        let mut state = RhythmState::new();
        state.tick(Duration::from_millis(1_999));
        assert!(!state.pulsing());
        assert_eq!(state.until_next_pulse(), Duration::from_millis(1));
        state.tick(Duration::from_millis(1));
        assert!(state.pulsing());
        state.tick(Duration::from_millis(499));
        assert!(state.pulsing());
        state.tick(Duration::from_millis(1));
        assert!(!state.pulsing());
        assert_eq!(state.until_next_pulse(), Duration::from_millis(1_500));
    }

    #[test]
    fn on_beat_tap_scores_twenty() {
        let mut state = RhythmState::new();
        let mut progress = Progress::default();
        state.tick(Duration::from_millis(4_100));
        assert!(state.tap(&mut progress));
        assert_eq!(state.hits(), 1);
        assert!((progress.value() - 20.0).abs() < f32::EPSILON);
    }
}
