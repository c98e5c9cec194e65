//! Catch falling: tap kisses as they float up and off the screen.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Progress, spawn_pct};
use crate::constants::{CATCH_LIFETIME, CATCH_PROGRESS_PER_CATCH, CATCH_SPAWN_EVERY};
use crate::timer::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingTarget {
    pub id: u32,
    /// Percent of the play area width.
    pub x: f32,
    pub age: Duration,
}

impl FallingTarget {
    /// Travel fraction from the bottom edge (0) to just past the top (1).
    #[must_use]
    pub fn rise(&self) -> f32 {
        (self.age.as_secs_f32() / CATCH_LIFETIME.as_secs_f32()).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct CatchState {
    targets: Vec<FallingTarget>,
    spawn: Interval,
    next_id: u32,
    caught: u32,
    missed: u32,
}

impl CatchState {
    pub(crate) fn new() -> Self {
        Self {
            targets: Vec::new(),
            spawn: Interval::new(CATCH_SPAWN_EVERY),
            next_id: 0,
            caught: 0,
            missed: 0,
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration, rng: &mut impl Rng) {
        let before = self.targets.len();
        self.targets.retain_mut(|target| {
            target.age += dt;
            target.age < CATCH_LIFETIME
        });
        let expired = before - self.targets.len();
        self.missed += u32::try_from(expired).unwrap_or(u32::MAX);
        for _ in 0..self.spawn.advance(dt) {
            self.targets.push(FallingTarget {
                id: self.next_id,
                x: spawn_pct(rng),
                age: Duration::ZERO,
            });
            self.next_id = self.next_id.wrapping_add(1);
        }
    }

    pub(crate) fn catch(&mut self, id: u32, progress: &mut Progress) -> bool {
        let Some(index) = self.targets.iter().position(|target| target.id == id) else {
            return false;
        };
        self.targets.remove(index);
        self.caught += 1;
        progress.advance(CATCH_PROGRESS_PER_CATCH);
        true
    }

    #[must_use]
    pub fn targets(&self) -> &[FallingTarget] {
        &self.targets
    }

    #[must_use]
    pub const fn caught(&self) -> u32 {
        self.caught
    }

    /// Targets that floated away untouched; they carry no penalty.
    #[must_use]
    pub const fn missed(&self) -> u32 {
        self.missed
    }
}
