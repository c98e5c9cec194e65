//! Centralized tuning constants for the quest core.
//!
//! Every mini-game is tuned to be unloseable; the values below only decide
//! how long a playthrough takes. Keeping them together means pacing changes
//! go through code review rather than through the JSON content asset.

use std::time::Duration;

// Persisted keys -----------------------------------------------------------
pub const KEY_INTRO_SHOWN: &str = "quest.intro-shown";
pub const KEY_RIDDLE_STAGE: &str = "quest.riddle-stage";
pub const KEY_RESULTS: &str = "quest.results";

// Scheduler ----------------------------------------------------------------
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const COUNTDOWN_LEAD_MINUTES: i64 = 5;

// Session lifecycle --------------------------------------------------------
pub const PROGRESS_MAX: f32 = 100.0;
pub const COMPLETION_SCORE: u32 = 100;
pub const WIN_GRACE: Duration = Duration::from_millis(500);
/// Upper bound on timer catch-up per tick; a backgrounded tab must not
/// replay minutes of spawns in one frame.
pub const MAX_CATCH_UP_STEPS: u32 = 10;

// Shared spawn placement (percent of the play area) ------------------------
pub const SPAWN_MIN_PCT: f32 = 10.0;
pub const SPAWN_SPAN_PCT: f32 = 80.0;

// Bloom --------------------------------------------------------------------
pub const BLOOM_SPAWN_EVERY: Duration = Duration::from_millis(800);
pub const BLOOM_MAX_SPARKS: usize = 5;
pub const BLOOM_PROGRESS_PER_SPARK: f32 = 10.0;

// Steady hold --------------------------------------------------------------
pub const STEADY_STEP: Duration = Duration::from_millis(100);
pub const STEADY_CHARGE_PER_STEP: f32 = 1.5;
pub const STEADY_DECAY_PER_STEP: f32 = 0.5;

// Drag collect -------------------------------------------------------------
pub const DRAG_TOKEN_COUNT: usize = 5;
pub const DRAG_PROGRESS_PER_TOKEN: f32 = 20.0;
pub const DRAG_DROP_LINE_Y: f32 = 200.0;

// Angle shield -------------------------------------------------------------
pub const SHIELD_SPAWN_EVERY: Duration = Duration::from_millis(1_000);
pub const SHIELD_FRAME: Duration = Duration::from_micros(16_667);
pub const SHIELD_SPAWN_RADIUS: f32 = 150.0;
pub const SHIELD_SPEED_MIN: f32 = 0.5;
pub const SHIELD_SPEED_SPAN: f32 = 0.5;
pub const SHIELD_BLOCK_INNER: f32 = 30.0;
pub const SHIELD_BLOCK_OUTER: f32 = 50.0;
pub const SHIELD_BLOCK_ARC: f32 = 1.0;
pub const SHIELD_CORE_RADIUS: f32 = 10.0;
pub const SHIELD_PROGRESS_PER_FRAME: f32 = 0.1;

// Thread connect -----------------------------------------------------------
pub const THREAD_ANCHOR_X: f32 = 60.0;
pub const THREAD_FINISH_MARGIN: f32 = 60.0;
pub const THREAD_BOW: f32 = 5.0;

// Rhythm tap ---------------------------------------------------------------
pub const RHYTHM_PERIOD: Duration = Duration::from_millis(2_000);
pub const RHYTHM_PULSE: Duration = Duration::from_millis(500);
pub const RHYTHM_PROGRESS_PER_HIT: f32 = 20.0;

// Catch falling ------------------------------------------------------------
pub const CATCH_SPAWN_EVERY: Duration = Duration::from_millis(600);
pub const CATCH_LIFETIME: Duration = Duration::from_millis(3_000);
pub const CATCH_PROGRESS_PER_CATCH: f32 = 10.0;

// Riddle gate --------------------------------------------------------------
pub const RIDDLE_STAGE_COUNT: u8 = 4;
pub const RIDDLE_HINT_AFTER: u32 = 2;
pub const RIDDLE_FEEDBACK_FOR: Duration = Duration::from_secs(2);
pub const RIDDLE_WRONG_FEEDBACK: &str = "Not quite. Try again.";
pub const RIDDLE_BYPASS_KEYWORD: &str = "skip";

// Developer access ---------------------------------------------------------
pub const ACCESS_TAPS_TO_PROMPT: u32 = 7;
pub const ACCESS_NOTICE_FOR: Duration = Duration::from_secs(2);
pub const ACCESS_UNLOCK_NOTICE_FOR: Duration = Duration::from_secs(3);
pub const LOCKED_NOTICE_FOR: Duration = Duration::from_secs(2);

// Narrative collaborator ---------------------------------------------------
pub const STORY_EMPTY_FALLBACK: &str = "Our story is written in the stars...";
pub const STORY_ERROR_FALLBACK: &str =
    "Even AI can't express how much I love you (API Error).";
pub const STORY_WORD_LIMIT: usize = 200;
