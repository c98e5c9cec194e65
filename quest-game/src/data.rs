//! Quest content: levels, riddles, gallery photos and access codes.
use chrono::{DateTime, FixedOffset};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::constants::RIDDLE_STAGE_COUNT;
use crate::minigame::MiniGameKind;

const DEFAULT_QUEST_DATA: &str = include_str!("../assets/quest.json");

/// Stable level identifier; ordering of ids is the ordering on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u8);

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a level asks of the player once it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Challenge {
    Bloom,
    SteadyHold,
    DragCollect,
    AngleShield,
    ThreadConnect,
    RhythmTap,
    CatchFalling,
    RiddleGate,
}

impl Challenge {
    /// The mini-game behind this challenge, or `None` for the riddle finale.
    #[must_use]
    pub const fn mini_game(self) -> Option<MiniGameKind> {
        match self {
            Self::Bloom => Some(MiniGameKind::Bloom),
            Self::SteadyHold => Some(MiniGameKind::SteadyHold),
            Self::DragCollect => Some(MiniGameKind::DragCollect),
            Self::AngleShield => Some(MiniGameKind::AngleShield),
            Self::ThreadConnect => Some(MiniGameKind::ThreadConnect),
            Self::RhythmTap => Some(MiniGameKind::RhythmTap),
            Self::CatchFalling => Some(MiniGameKind::CatchFalling),
            Self::RiddleGate => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub id: LevelId,
    pub name: String,
    pub unlock_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub icon: String,
    pub paragraph: String,
    #[serde(default)]
    pub notes: Vec<String>,
    pub challenge: Challenge,
    #[serde(default)]
    pub audio_src: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Riddle {
    pub question: String,
    /// Stored already normalized: lowercase, no whitespace.
    pub answer: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub src: String,
    pub caption: String,
}

/// Secret codes typed into the hidden developer prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCodes {
    pub dev_mode: String,
    pub finale: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("quest data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quest data has no levels")]
    NoLevels,
    #[error("level id {0} appears more than once")]
    DuplicateLevel(LevelId),
    #[error("level {0} unlocks before the level preceding it")]
    UnlockOrder(LevelId),
    #[error("expected {expected} riddles, found {found}")]
    RiddleCount { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestData {
    pub levels: Vec<LevelDescriptor>,
    pub riddles: Vec<Riddle>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub access: AccessCodes,
}

impl QuestData {
    /// Parse and validate quest content.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails [`QuestData::validate`].
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let mut data: Self = serde_json::from_str(json)?;
        data.levels.sort_by_key(|level| level.id);
        data.validate()?;
        Ok(data)
    }

    /// The content embedded in the crate, parsed once per process.
    ///
    /// # Panics
    ///
    /// Panics if the embedded asset is invalid; `embedded_asset_is_valid`
    /// guards this at test time.
    #[must_use]
    pub fn load_default() -> &'static Self {
        static DATA: OnceCell<QuestData> = OnceCell::new();
        DATA.get_or_init(|| {
            Self::from_json(DEFAULT_QUEST_DATA).expect("embedded quest.json must be valid")
        })
    }

    /// Check the structural invariants the scheduler and riddle gate rely on.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.levels.is_empty() {
            return Err(DataError::NoLevels);
        }
        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.id) {
                return Err(DataError::DuplicateLevel(level.id));
            }
        }
        for pair in self.levels.windows(2) {
            if pair[1].unlock_at < pair[0].unlock_at {
                return Err(DataError::UnlockOrder(pair[1].id));
            }
        }
        let expected = usize::from(RIDDLE_STAGE_COUNT);
        if self.riddles.len() != expected {
            return Err(DataError::RiddleCount {
                expected,
                found: self.riddles.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn level(&self, id: LevelId) -> Option<&LevelDescriptor> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// The level whose unlock opens the finale (the last one on the map).
    #[must_use]
    pub fn finale(&self) -> Option<&LevelDescriptor> {
        self.levels.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_asset_is_valid() {
        let data = QuestData::load_default();
        assert_eq!(data.levels.len(), 8);
        assert_eq!(data.riddles.len(), 4);
        assert_eq!(data.finale().map(|l| l.challenge), Some(Challenge::RiddleGate));
        assert_eq!(data.riddles[0].answer, "iloveyou");
        assert_eq!(data.riddles[3].hint, "Timeless...");
    }

    #[test]
    fn every_level_but_the_last_hosts_a_mini_game() {
        let data = QuestData::load_default();
        let (last, rest) = data.levels.split_last().unwrap();
        assert!(last.challenge.mini_game().is_none());
        assert!(rest.iter().all(|l| l.challenge.mini_game().is_some()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut data = QuestData::load_default().clone();
        data.levels[1].id = LevelId(1);
        assert!(matches!(
            data.validate(),
            Err(DataError::DuplicateLevel(LevelId(1)))
        ));
    }

    #[test]
    fn out_of_order_unlocks_are_rejected() {
        let mut data = QuestData::load_default().clone();
        data.levels[2].unlock_at = data.levels[0].unlock_at - chrono::Duration::days(1);
        assert!(matches!(data.validate(), Err(DataError::UnlockOrder(LevelId(3)))));
    }

    #[test]
    fn riddle_count_is_enforced() {
        let mut data = QuestData::load_default().clone();
        data.riddles.pop();
        assert!(matches!(
            data.validate(),
            Err(DataError::RiddleCount {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn malformed_json_surfaces_as_error() {
        assert!(matches!(
            QuestData::from_json("{not json"),
            Err(DataError::Json(_))
        ));
    }
}
