//! Host-independent timers driven by explicit tick deltas.
//!
//! Mini-games never read the wall clock; the host feeds elapsed time and each
//! timer reports how many times it fired. Tests drive them with synthetic
//! deltas.
use std::time::Duration;

use crate::constants::MAX_CATCH_UP_STEPS;

/// Repeating timer, the tick-driven counterpart of `setInterval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    accumulated: Duration,
}

impl Interval {
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "interval period must be non-zero");
        Self {
            period,
            accumulated: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Add elapsed time; returns how many periods completed. Backlog beyond
    /// [`MAX_CATCH_UP_STEPS`] periods is dropped.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let cap = self.period * MAX_CATCH_UP_STEPS;
        self.accumulated = (self.accumulated + dt).min(cap);
        let mut fired = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

/// One-shot countdown, the tick-driven counterpart of `setTimeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Returns `true` once the countdown has fully elapsed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let mut interval = Interval::new(Duration::from_millis(100));
        assert_eq!(interval.advance(Duration::from_millis(99)), 0);
        assert_eq!(interval.advance(Duration::from_millis(1)), 1);
        assert_eq!(interval.advance(Duration::from_millis(250)), 2);
        assert_eq!(interval.advance(Duration::from_millis(50)), 1);
    }

    #[test]
    fn caps_catch_up() {
        let mut interval = Interval::new(Duration::from_millis(10));
        assert_eq!(interval.advance(Duration::from_secs(60)), MAX_CATCH_UP_STEPS);
        assert_eq!(interval.advance(Duration::ZERO), 0);
    }

    #[test]
    fn reset_discards_partial_period() {
        let mut interval = Interval::new(Duration::from_millis(100));
        interval.advance(Duration::from_millis(90));
        interval.reset();
        assert_eq!(interval.advance(Duration::from_millis(20)), 0);
    }

    #[test]
    fn countdown_elapses_once_drained() {
        let mut countdown = Countdown::new(Duration::from_millis(500));
        assert!(!countdown.advance(Duration::from_millis(499)));
        assert!(countdown.advance(Duration::from_millis(5)));
        assert_eq!(countdown.remaining(), Duration::ZERO);
    }
}
