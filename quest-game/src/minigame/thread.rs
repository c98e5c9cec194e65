//! Thread connect: pull a thread from the left heart across to the right one.
use serde::{Deserialize, Serialize};

use super::{PlayArea, Progress};
use crate::constants::{THREAD_ANCHOR_X, THREAD_BOW, THREAD_FINISH_MARGIN};

/// Quadratic curve from the anchor heart to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadPath {
    pub start: (f32, f32),
    pub control: (f32, f32),
    pub end: (f32, f32),
}

impl ThreadPath {
    /// The control point sits at the midpoint, pushed down by a fixed bow so
    /// the thread sags instead of drawing a straight line.
    #[must_use]
    pub fn toward(x: f32, y: f32, area: PlayArea) -> Self {
        let start = (THREAD_ANCHOR_X, area.height / 2.0);
        let control = (
            (start.0 + x) / 2.0,
            (start.1 + y) / 2.0 + THREAD_BOW,
        );
        Self {
            start,
            control,
            end: (x, y),
        }
    }

    /// SVG path data (`M .. Q ..`).
    #[must_use]
    pub fn svg_d(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.0, self.start.1, self.control.0, self.control.1, self.end.0, self.end.1
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThreadState {
    path: Option<ThreadPath>,
}

impl ThreadState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Progress jumps straight to full once the pointer passes the finish line.
    pub(crate) fn trace(&mut self, x: f32, y: f32, area: PlayArea, progress: &mut Progress) -> bool {
        self.path = Some(ThreadPath::toward(x, y, area));
        if x > area.width - THREAD_FINISH_MARGIN {
            progress.fill();
        }
        true
    }

    #[must_use]
    pub const fn path(&self) -> Option<ThreadPath> {
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: PlayArea = PlayArea::new(400.0, 320.0);

    #[test]
    fn curve_bows_below_the_midpoint() {
        let path = ThreadPath::toward(260.0, 100.0, AREA);
        assert_eq!(path.start, (60.0, 160.0));
        assert_eq!(path.control, (160.0, 135.0));
        assert_eq!(path.end, (260.0, 100.0));
        assert_eq!(path.svg_d(), "M 60 160 Q 160 135 260 100");
    }

    #[test]
    fn curve_is_deterministic() {
        assert_eq!(
            ThreadPath::toward(123.0, 45.0, AREA),
            ThreadPath::toward(123.0, 45.0, AREA)
        );
    }

    #[test]
    fn crossing_the_far_edge_completes_in_one_step() {
        let mut state = ThreadState::new();
        let mut progress = Progress::default();
        state.trace(339.0, 10.0, AREA, &mut progress);
        assert!(progress.value().abs() < f32::EPSILON);
        state.trace(341.0, 10.0, AREA, &mut progress);
        assert!(progress.is_complete());
        assert!(state.path().is_some());
    }
}
