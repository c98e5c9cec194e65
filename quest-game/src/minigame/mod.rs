//! Mini-game runtime.
//!
//! Seven bespoke widgets share one lifecycle, `Idle -> Playing -> Won`, and
//! one completion signal. Each variant owns its private state in
//! [`VariantState`]; the session only tracks status, progress and the win
//! grace period. The host drives everything through [`MiniGameSession::handle`]
//! (pointer/touch input) and [`MiniGameSession::tick`] (elapsed time).
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    COMPLETION_SCORE, PROGRESS_MAX, SPAWN_MIN_PCT, SPAWN_SPAN_PCT, WIN_GRACE,
};
use crate::data::Challenge;
use crate::timer::Countdown;

pub mod bloom;
pub mod catch;
pub mod drag;
pub mod rhythm;
pub mod shield;
pub mod steady;
pub mod thread;

pub use bloom::{BloomGlow, BloomState, Spark};
pub use catch::{CatchState, FallingTarget};
pub use drag::{DragState, DragToken};
pub use rhythm::RhythmState;
pub use shield::{Shadow, ShieldState, angular_distance, is_blocked};
pub use steady::SteadyState;
pub use thread::{ThreadPath, ThreadState};

const CHEERS: [&str; 6] = ["Wow baby", "Awww", "Yayyy", "Woahh", "Hehehehe", "Mwahhh"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiniGameKind {
    Bloom,
    SteadyHold,
    DragCollect,
    AngleShield,
    ThreadConnect,
    RhythmTap,
    CatchFalling,
}

impl MiniGameKind {
    pub const ALL: [Self; 7] = [
        Self::Bloom,
        Self::SteadyHold,
        Self::DragCollect,
        Self::AngleShield,
        Self::ThreadConnect,
        Self::RhythmTap,
        Self::CatchFalling,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Bloom => "Bloom The Rose",
            Self::SteadyHold => "Steady My Heart",
            Self::DragCollect => "Sweet Memory Jar",
            Self::AngleShield => "Protect The Little Heart",
            Self::ThreadConnect => "Tie The Promise Thread",
            Self::RhythmTap => "Bring Us Closer",
            Self::CatchFalling => "Catch The Kisses",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Bloom => "Catch the light to help love grow.",
            Self::SteadyHold => "Hold the heart to calm the nerves.",
            Self::DragCollect => "Collect the tiny sweet moments.",
            Self::AngleShield => "Move your mouse to shield the heart.",
            Self::ThreadConnect => "Draw a thread to connect us.",
            Self::RhythmTap => "Tap when the circle pulses.",
            Self::CatchFalling => "Don't let them fade away.",
        }
    }

    /// Kebab-case tag, matching the content asset.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Bloom => "bloom",
            Self::SteadyHold => "steady-hold",
            Self::DragCollect => "drag-collect",
            Self::AngleShield => "angle-shield",
            Self::ThreadConnect => "thread-connect",
            Self::RhythmTap => "rhythm-tap",
            Self::CatchFalling => "catch-falling",
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Idle,
    Playing,
    Won,
    /// Part of the status vocabulary, never produced: every variant is unloseable.
    Lost,
}

/// Completion amount in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Progress(f32);

impl Progress {
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= PROGRESS_MAX
    }

    /// Add (or, with a negative delta, remove) progress, clamped to `[0, 100]`.
    pub fn advance(&mut self, delta: f32) {
        self.0 = (self.0 + delta).clamp(0.0, PROGRESS_MAX);
    }

    pub fn fill(&mut self) {
        self.0 = PROGRESS_MAX;
    }
}

/// Size of the widget's play area in CSS pixels; pointer coordinates are
/// relative to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Angle of `(x, y)` around the area's centre, in `(-π, π]`.
    #[must_use]
    pub fn angle_from_center(&self, x: f32, y: f32) -> f32 {
        (y - self.height / 2.0).atan2(x - self.width / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameInput {
    /// Click/tap on a spawned target (bloom sparks, falling kisses).
    Tap { target: u32 },
    /// Pointer or touch held down anywhere on the area.
    Press,
    Release,
    /// A dragged token let go at vertical position `y`.
    DragRelease { token: usize, y: f32 },
    PointerMove { x: f32, y: f32, area: PlayArea },
    /// Tap on the rhythm pad.
    Beat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("challenge {0:?} is not a mini-game")]
    NotAMiniGame(Challenge),
    #[error("session is already playing")]
    AlreadyStarted,
    #[error("session has finished; mount a new one to play again")]
    Finished,
}

/// Per-variant state, dispatched by tag.
#[derive(Debug, Clone)]
pub enum VariantState {
    Bloom(BloomState),
    SteadyHold(SteadyState),
    DragCollect(DragState),
    AngleShield(ShieldState),
    ThreadConnect(ThreadState),
    RhythmTap(RhythmState),
    CatchFalling(CatchState),
}

impl VariantState {
    fn new(kind: MiniGameKind) -> Self {
        match kind {
            MiniGameKind::Bloom => Self::Bloom(BloomState::new()),
            MiniGameKind::SteadyHold => Self::SteadyHold(SteadyState::new()),
            MiniGameKind::DragCollect => Self::DragCollect(DragState::new()),
            MiniGameKind::AngleShield => Self::AngleShield(ShieldState::new()),
            MiniGameKind::ThreadConnect => Self::ThreadConnect(ThreadState::new()),
            MiniGameKind::RhythmTap => Self::RhythmTap(RhythmState::new()),
            MiniGameKind::CatchFalling => Self::CatchFalling(CatchState::new()),
        }
    }

    fn tick(&mut self, dt: Duration, rng: &mut ChaCha20Rng, progress: &mut Progress) {
        match self {
            Self::Bloom(state) => state.tick(dt, rng),
            Self::SteadyHold(state) => state.tick(dt, progress),
            Self::AngleShield(state) => state.tick(dt, rng, progress),
            Self::RhythmTap(state) => state.tick(dt),
            Self::CatchFalling(state) => state.tick(dt, rng),
            Self::DragCollect(_) | Self::ThreadConnect(_) => {}
        }
    }

    fn handle(&mut self, input: GameInput, progress: &mut Progress) -> bool {
        match (self, input) {
            (Self::Bloom(state), GameInput::Tap { target }) => state.tap(target, progress),
            (Self::SteadyHold(state), GameInput::Press) => state.set_holding(true),
            (Self::SteadyHold(state), GameInput::Release) => state.set_holding(false),
            (Self::DragCollect(state), GameInput::DragRelease { token, y }) => {
                state.release(token, y, progress)
            }
            (Self::AngleShield(state), GameInput::PointerMove { x, y, area }) => {
                state.aim(area.angle_from_center(x, y))
            }
            (Self::ThreadConnect(state), GameInput::PointerMove { x, y, area }) => {
                state.trace(x, y, area, progress)
            }
            (Self::RhythmTap(state), GameInput::Beat) => state.tap(progress),
            (Self::CatchFalling(state), GameInput::Tap { target }) => {
                state.catch(target, progress)
            }
            _ => false,
        }
    }
}

/// Per-variant render data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VariantView {
    Bloom { sparks: Vec<Spark>, glow: BloomGlow },
    SteadyHold { holding: bool },
    DragCollect { tokens: Vec<DragToken> },
    AngleShield { shield_angle: f32, shadows: Vec<Shadow> },
    ThreadConnect { path: Option<String> },
    RhythmTap { pulsing: bool },
    CatchFalling { targets: Vec<FallingTarget> },
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub kind: MiniGameKind,
    pub title: &'static str,
    pub status: GameStatus,
    pub progress: f32,
    pub finishing: bool,
    pub cheer: Option<&'static str>,
    pub variant: VariantView,
}

/// Random horizontal/vertical placement in `[10, 90)` percent.
pub(crate) fn spawn_pct(rng: &mut impl Rng) -> f32 {
    SPAWN_MIN_PCT + rng.r#gen::<f32>() * SPAWN_SPAN_PCT
}

/// One playthrough of one level's mini-game.
#[derive(Debug, Clone)]
pub struct MiniGameSession {
    kind: MiniGameKind,
    status: GameStatus,
    progress: Progress,
    variant: VariantState,
    rng: ChaCha20Rng,
    grace: Option<Countdown>,
    cheer: Option<&'static str>,
}

impl MiniGameSession {
    #[must_use]
    pub fn new(kind: MiniGameKind, seed: u64) -> Self {
        Self {
            kind,
            status: GameStatus::Idle,
            progress: Progress::default(),
            variant: VariantState::new(kind),
            rng: ChaCha20Rng::seed_from_u64(seed),
            grace: None,
            cheer: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotAMiniGame`] for the riddle finale.
    pub fn for_challenge(challenge: Challenge, seed: u64) -> Result<Self, SessionError> {
        challenge
            .mini_game()
            .map(|kind| Self::new(kind, seed))
            .ok_or(SessionError::NotAMiniGame(challenge))
    }

    /// Leave the idle screen and begin play with fresh state.
    ///
    /// # Errors
    ///
    /// Fails if the session is already playing or has finished.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.status {
            GameStatus::Idle => {}
            GameStatus::Playing => return Err(SessionError::AlreadyStarted),
            GameStatus::Won | GameStatus::Lost => return Err(SessionError::Finished),
        }
        self.status = GameStatus::Playing;
        self.progress = Progress::default();
        self.variant = VariantState::new(self.kind);
        self.grace = None;
        log::debug!("{} started", self.kind.slug());
        Ok(())
    }

    /// Apply a player action. Returns `true` if the variant accepted it.
    /// Input is ignored outside active play and during the win grace period.
    pub fn handle(&mut self, input: GameInput) -> bool {
        if !self.accepting_play() {
            return false;
        }
        let accepted = self.variant.handle(input, &mut self.progress);
        self.arm_grace();
        accepted
    }

    /// Advance timers by `dt`. Returns the completion exactly once, when the
    /// grace period after reaching full progress has elapsed.
    pub fn tick(&mut self, dt: Duration) -> Option<Completion> {
        if self.status != GameStatus::Playing {
            return None;
        }
        if let Some(grace) = self.grace.as_mut() {
            if !grace.advance(dt) {
                return None;
            }
            self.status = GameStatus::Won;
            let pick = self.rng.gen_range(0..CHEERS.len());
            self.cheer = Some(CHEERS[pick]);
            log::debug!("{} won", self.kind.slug());
            return Some(Completion {
                score: COMPLETION_SCORE,
            });
        }
        self.variant.tick(dt, &mut self.rng, &mut self.progress);
        self.arm_grace();
        None
    }

    fn accepting_play(&self) -> bool {
        self.status == GameStatus::Playing && self.grace.is_none()
    }

    fn arm_grace(&mut self) {
        if self.grace.is_none() && self.progress.is_complete() {
            self.grace = Some(Countdown::new(WIN_GRACE));
        }
    }

    #[must_use]
    pub const fn kind(&self) -> MiniGameKind {
        self.kind
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub const fn variant(&self) -> &VariantState {
        &self.variant
    }

    /// Whether full progress was reached and the won screen is pending.
    #[must_use]
    pub const fn finishing(&self) -> bool {
        self.grace.is_some()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        let variant = match &self.variant {
            VariantState::Bloom(state) => VariantView::Bloom {
                sparks: state.sparks().to_vec(),
                glow: BloomGlow::for_progress(self.progress),
            },
            VariantState::SteadyHold(state) => VariantView::SteadyHold {
                holding: state.holding(),
            },
            VariantState::DragCollect(state) => VariantView::DragCollect {
                tokens: state.tokens().to_vec(),
            },
            VariantState::AngleShield(state) => VariantView::AngleShield {
                shield_angle: state.shield_angle(),
                shadows: state.shadows().to_vec(),
            },
            VariantState::ThreadConnect(state) => VariantView::ThreadConnect {
                path: state.path().map(|path| path.svg_d()),
            },
            VariantState::RhythmTap(state) => VariantView::RhythmTap {
                pulsing: state.pulsing(),
            },
            VariantState::CatchFalling(state) => VariantView::CatchFalling {
                targets: state.targets().to_vec(),
            },
        };
        SessionView {
            kind: self.kind,
            title: self.kind.title(),
            status: self.status,
            progress: self.progress.value(),
            finishing: self.finishing(),
            cheer: self.cheer,
            variant,
        }
    }

    /// Won-screen message, chosen at the moment of winning.
    #[must_use]
    pub const fn cheer(&self) -> Option<&'static str> {
        self.cheer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_both_ways() {
        let mut progress = Progress::default();
        progress.advance(-5.0);
        assert!(progress.value().abs() < f32::EPSILON);
        progress.advance(150.0);
        assert!(progress.is_complete());
        assert!((progress.value() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn start_only_from_idle() {
        let mut session = MiniGameSession::new(MiniGameKind::ThreadConnect, 1);
        assert_eq!(session.status(), GameStatus::Idle);
        session.start().unwrap();
        assert_eq!(session.start(), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn idle_session_ignores_input_and_time() {
        let mut session = MiniGameSession::new(MiniGameKind::RhythmTap, 1);
        assert!(!session.handle(GameInput::Beat));
        assert!(session.tick(Duration::from_secs(10)).is_none());
        assert_eq!(session.status(), GameStatus::Idle);
    }

    #[test]
    fn riddle_challenge_is_not_a_mini_game() {
        assert!(matches!(
            MiniGameSession::for_challenge(Challenge::RiddleGate, 0),
            Err(SessionError::NotAMiniGame(Challenge::RiddleGate))
        ));
        let session = MiniGameSession::for_challenge(Challenge::Bloom, 0).unwrap();
        assert_eq!(session.kind(), MiniGameKind::Bloom);
    }

    #[test]
    fn win_waits_for_grace_then_fires_once() {
        let area = PlayArea::new(400.0, 320.0);
        let mut session = MiniGameSession::new(MiniGameKind::ThreadConnect, 9);
        session.start().unwrap();
        assert!(session.handle(GameInput::PointerMove {
            x: 390.0,
            y: 100.0,
            area
        }));
        assert!(session.finishing());
        assert_eq!(session.status(), GameStatus::Playing);
        assert!(session.tick(Duration::from_millis(499)).is_none());
        let done = session.tick(Duration::from_millis(1));
        assert_eq!(done, Some(Completion { score: 100 }));
        assert_eq!(session.status(), GameStatus::Won);
        assert!(session.cheer().is_some());
        assert!(session.tick(Duration::from_secs(1)).is_none());
        assert_eq!(session.start(), Err(SessionError::Finished));
    }

    #[test]
    fn input_is_frozen_during_grace() {
        let area = PlayArea::new(400.0, 320.0);
        let mut session = MiniGameSession::new(MiniGameKind::ThreadConnect, 9);
        session.start().unwrap();
        session.handle(GameInput::PointerMove {
            x: 390.0,
            y: 10.0,
            area,
        });
        assert!(!session.handle(GameInput::PointerMove {
            x: 10.0,
            y: 10.0,
            area
        }));
    }

    #[test]
    fn mismatched_input_is_ignored() {
        let mut session = MiniGameSession::new(MiniGameKind::Bloom, 3);
        session.start().unwrap();
        assert!(!session.handle(GameInput::Press));
        assert!(!session.handle(GameInput::Beat));
    }

    #[test]
    fn view_tracks_variant_state() {
        let mut session = MiniGameSession::new(MiniGameKind::SteadyHold, 2);
        session.start().unwrap();
        session.handle(GameInput::Press);
        let view = session.view();
        assert_eq!(view.title, "Steady My Heart");
        assert_eq!(view.status, GameStatus::Playing);
        assert_eq!(view.variant, VariantView::SteadyHold { holding: true });
    }

    #[test]
    fn slugs_round_trip() {
        for kind in MiniGameKind::ALL {
            assert_eq!(MiniGameKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(MiniGameKind::from_slug("riddle-gate"), None);
    }

    #[test]
    fn pointer_angle_is_measured_from_center() {
        let area = PlayArea::new(200.0, 200.0);
        assert!(area.angle_from_center(200.0, 100.0).abs() < 1e-6);
        let down = area.angle_from_center(100.0, 200.0);
        assert!((down - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
