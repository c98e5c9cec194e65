//! Bloom: tap drifting sparks to open the rose.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

use super::{Progress, spawn_pct};
use crate::constants::{BLOOM_MAX_SPARKS, BLOOM_PROGRESS_PER_SPARK, BLOOM_SPAWN_EVERY};
use crate::timer::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spark {
    pub id: u32,
    /// Percent of the play area width.
    pub x: f32,
    /// Percent of the play area height.
    pub y: f32,
}

/// Rose rendering parameters; both grow continuously with progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloomGlow {
    pub scale: f32,
    pub brightness: f32,
}

impl BloomGlow {
    #[must_use]
    pub fn for_progress(progress: Progress) -> Self {
        let p = progress.value();
        Self {
            scale: 0.5 + p / 150.0,
            brightness: 0.5 + p / 100.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BloomState {
    sparks: SmallVec<[Spark; BLOOM_MAX_SPARKS]>,
    spawn: Interval,
    next_id: u32,
}

impl BloomState {
    pub(crate) fn new() -> Self {
        Self {
            sparks: SmallVec::new(),
            spawn: Interval::new(BLOOM_SPAWN_EVERY),
            next_id: 0,
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration, rng: &mut impl Rng) {
        for _ in 0..self.spawn.advance(dt) {
            if self.sparks.len() >= BLOOM_MAX_SPARKS {
                continue;
            }
            self.sparks.push(Spark {
                id: self.next_id,
                x: spawn_pct(rng),
                y: spawn_pct(rng),
            });
            self.next_id = self.next_id.wrapping_add(1);
        }
    }

    pub(crate) fn tap(&mut self, id: u32, progress: &mut Progress) -> bool {
        let Some(index) = self.sparks.iter().position(|spark| spark.id == id) else {
            return false;
        };
        self.sparks.remove(index);
        progress.advance(BLOOM_PROGRESS_PER_SPARK);
        true
    }

    #[must_use]
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }
}
