//! Valentine Quest engine
//!
//! Platform-agnostic core for the date-gated quest: the unlock scheduler, the
//! seven mini-games, the riddle gate and the persisted flags behind them.
//! Rendering, audio and routing live in the host; this crate only exposes
//! state and transitions.

pub mod access;
pub mod clock;
pub mod constants;
pub mod data;
pub mod engine;
pub mod minigame;
pub mod narrative;
pub mod riddle;
pub mod schedule;
pub mod storage;
pub mod timer;

// Re-export commonly used types
pub use access::{AccessGate, AccessNotice, AccessOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use data::{
    AccessCodes, Challenge, DataError, LevelDescriptor, LevelId, Photo, QuestData, Riddle,
};
pub use engine::{LevelRun, MapEntry, MapSnapshot, QuestEngine, QuestError};
pub use minigame::{
    Completion, GameInput, GameStatus, MiniGameKind, MiniGameSession, PlayArea, Progress,
    SessionError, SessionView, VariantState, VariantView,
};
pub use narrative::{
    ImagePayload, OfflineStoryTeller, StoryTeller, edited_image_or_none, story_or_fallback,
    story_prompt,
};
pub use riddle::{GateView, RiddleGate, SubmitOutcome, normalize_answer};
pub use schedule::{
    CountdownStatus, PollOutcome, UnlockPoller, UnlockSchedule, is_unlocked, locked_message,
};
pub use storage::{
    GameResult, KeyValueStore, MemoryStore, MemoryStoreError, PersistedFlags, RiddleStage,
};
pub use timer::{Countdown, Interval};
