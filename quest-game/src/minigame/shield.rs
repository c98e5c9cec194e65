//! Angle shield: turn the shield toward shadows closing in on the heart.
//!
//! Shadows spawn on a circle around the centre and move radially inward.
//! Progress grows every frame regardless of what the player does; blocking
//! only changes the picture. A shadow that reaches the heart just vanishes.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::time::Duration;

use super::Progress;
use crate::constants::{
    SHIELD_BLOCK_ARC, SHIELD_BLOCK_INNER, SHIELD_BLOCK_OUTER, SHIELD_CORE_RADIUS, SHIELD_FRAME,
    SHIELD_PROGRESS_PER_FRAME, SHIELD_SPAWN_EVERY, SHIELD_SPAWN_RADIUS, SHIELD_SPEED_MIN,
    SHIELD_SPEED_SPAN,
};
use crate::timer::Interval;

/// Smallest absolute difference between two angles, in `[0, π]`.
#[must_use]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI { TAU - diff } else { diff }
}

/// Whether a shadow at `distance` and `angle` is stopped by a shield
/// pointing at `shield_angle`.
#[must_use]
pub fn is_blocked(distance: f32, angle: f32, shield_angle: f32) -> bool {
    distance > SHIELD_BLOCK_INNER
        && distance < SHIELD_BLOCK_OUTER
        && angular_distance(angle, shield_angle) <= SHIELD_BLOCK_ARC
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub id: u32,
    pub angle: f32,
    pub distance: f32,
    /// Units travelled per frame.
    pub speed: f32,
}

impl Shadow {
    /// Offset from the centre in pixels.
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (
            self.angle.cos() * self.distance,
            self.angle.sin() * self.distance,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ShieldState {
    shield_angle: f32,
    shadows: Vec<Shadow>,
    spawn: Interval,
    frame: Interval,
    next_id: u32,
    blocked: u32,
    reached_core: u32,
}

impl ShieldState {
    pub(crate) fn new() -> Self {
        Self {
            shield_angle: 0.0,
            shadows: Vec::new(),
            spawn: Interval::new(SHIELD_SPAWN_EVERY),
            frame: Interval::new(SHIELD_FRAME),
            next_id: 0,
            blocked: 0,
            reached_core: 0,
        }
    }

    pub(crate) fn aim(&mut self, angle: f32) -> bool {
        self.shield_angle = angle;
        true
    }

    pub(crate) fn tick(&mut self, dt: Duration, rng: &mut impl Rng, progress: &mut Progress) {
        for _ in 0..self.spawn.advance(dt) {
            let angle = rng.r#gen::<f32>() * TAU;
            let speed = SHIELD_SPEED_MIN + rng.r#gen::<f32>() * SHIELD_SPEED_SPAN;
            self.spawn_shadow(angle, speed);
        }
        for _ in 0..self.frame.advance(dt) {
            self.step_frame();
            progress.advance(SHIELD_PROGRESS_PER_FRAME);
        }
    }

    pub(crate) fn spawn_shadow(&mut self, angle: f32, speed: f32) {
        self.shadows.push(Shadow {
            id: self.next_id,
            angle,
            distance: SHIELD_SPAWN_RADIUS,
            speed,
        });
        self.next_id = self.next_id.wrapping_add(1);
    }

    fn step_frame(&mut self) {
        let shield_angle = self.shield_angle;
        let mut blocked = 0;
        let mut reached_core = 0;
        self.shadows.retain_mut(|shadow| {
            shadow.distance -= shadow.speed;
            if is_blocked(shadow.distance, shadow.angle, shield_angle) {
                blocked += 1;
                return false;
            }
            if shadow.distance < SHIELD_CORE_RADIUS {
                reached_core += 1;
                return false;
            }
            true
        });
        self.blocked += blocked;
        self.reached_core += reached_core;
    }

    #[must_use]
    pub const fn shield_angle(&self) -> f32 {
        self.shield_angle
    }

    #[must_use]
    pub fn shadows(&self) -> &[Shadow] {
        &self.shadows
    }

    #[must_use]
    pub const fn blocked(&self) -> u32 {
        self.blocked
    }

    #[must_use]
    pub const fn reached_core(&self) -> u32 {
        self.reached_core
    }
}
