//! Host control flow: the level map, entering levels and the results ledger.
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::access::{AccessGate, AccessOutcome};
use crate::constants::LOCKED_NOTICE_FOR;
use crate::data::{DataError, LevelId, QuestData};
use crate::minigame::{Completion, MiniGameSession};
use crate::riddle::RiddleGate;
use crate::schedule::{CountdownStatus, PollOutcome, UnlockPoller, UnlockSchedule, locked_message};
use crate::storage::{GameResult, KeyValueStore, PersistedFlags};
use crate::timer::Countdown;

#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    #[error("no level with id {0}")]
    UnknownLevel(LevelId),
    #[error("level {id} is locked until {unlock_at}")]
    Locked {
        id: LevelId,
        unlock_at: DateTime<FixedOffset>,
    },
    #[error(transparent)]
    Data(#[from] DataError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapEntry {
    pub id: LevelId,
    pub name: String,
    pub icon: String,
    pub unlocked: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSnapshot {
    pub levels: Vec<MapEntry>,
    /// Present only while the pre-finale countdown is running.
    pub countdown: Option<CountdownStatus>,
}

/// What entering a level mounts.
#[derive(Debug, Clone)]
pub enum LevelRun<S> {
    MiniGame(MiniGameSession),
    Finale(RiddleGate<S>),
}

pub struct QuestEngine<S> {
    data: QuestData,
    poller: UnlockPoller,
    flags: PersistedFlags<S>,
    access: AccessGate,
    locked_notice: Option<(String, Countdown)>,
}

impl<S: KeyValueStore + Clone> QuestEngine<S> {
    /// # Errors
    ///
    /// Returns an error if `data` has no levels to schedule.
    pub fn new(data: QuestData, store: S) -> Result<Self, QuestError> {
        let schedule = UnlockSchedule::new(&data.levels)?;
        let access = AccessGate::new(data.access.clone());
        Ok(Self {
            data,
            poller: UnlockPoller::new(schedule, false),
            flags: PersistedFlags::new(store),
            access,
            locked_notice: None,
        })
    }

    /// Engine over the embedded quest content.
    ///
    /// # Errors
    ///
    /// See [`QuestEngine::new`].
    pub fn with_default_data(store: S) -> Result<Self, QuestError> {
        Self::new(QuestData::load_default().clone(), store)
    }

    /// Apply a `?dev=true` style query string.
    #[must_use]
    pub fn with_url_query(mut self, query: &str) -> Self {
        self.access = AccessGate::with_url_flag(self.data.access.clone(), query);
        self.poller.set_override(self.access.override_all());
        self
    }

    #[must_use]
    pub const fn data(&self) -> &QuestData {
        &self.data
    }

    #[must_use]
    pub const fn flags(&self) -> &PersistedFlags<S> {
        &self.flags
    }

    #[must_use]
    pub fn override_all(&self) -> bool {
        self.access.override_all()
    }

    #[must_use]
    pub const fn access(&self) -> &AccessGate {
        &self.access
    }

    /// Count a title tap; `true` when the secret prompt opens.
    pub fn tap_title(&mut self) -> bool {
        self.access.tap_title()
    }

    pub fn enter_code(&mut self, code: &str) -> Option<AccessOutcome> {
        let outcome = self.access.enter_code(code);
        self.poller.set_override(self.access.override_all());
        outcome
    }

    /// One scheduler poll, to be called every
    /// [`POLL_INTERVAL`](crate::constants::POLL_INTERVAL).
    pub fn poll(&mut self, now: DateTime<Utc>) -> PollOutcome {
        self.poller.poll(now)
    }

    #[must_use]
    pub fn map(&self, now: DateTime<Utc>) -> MapSnapshot {
        let override_all = self.override_all();
        let schedule = self.poller.schedule();
        let completed: HashSet<LevelId> = self
            .flags
            .results()
            .into_iter()
            .filter(|result| result.completed)
            .map(|result| result.level_id)
            .collect();
        let levels = self
            .data
            .levels
            .iter()
            .map(|level| MapEntry {
                id: level.id,
                name: level.name.clone(),
                icon: level.icon.clone(),
                unlocked: schedule.is_unlocked(level.id, now, override_all),
                completed: completed.contains(&level.id),
            })
            .collect();
        let countdown = if override_all {
            None
        } else {
            Some(schedule.countdown_status(now)).filter(|status| status.active)
        };
        MapSnapshot { levels, countdown }
    }

    /// Mount the level's challenge. Tapping a locked level also raises the
    /// "come back on ..." notice.
    ///
    /// # Errors
    ///
    /// [`QuestError::UnknownLevel`] for ids not on the map and
    /// [`QuestError::Locked`] before the level's unlock instant.
    pub fn enter_level(
        &mut self,
        id: LevelId,
        now: DateTime<Utc>,
        seed: u64,
    ) -> Result<LevelRun<S>, QuestError> {
        let level = self.data.level(id).ok_or(QuestError::UnknownLevel(id))?;
        if !self
            .poller
            .schedule()
            .is_unlocked(id, now, self.override_all())
        {
            let unlock_at = level.unlock_at;
            self.locked_notice = Some((locked_message(level), Countdown::new(LOCKED_NOTICE_FOR)));
            log::debug!("level {id} tapped while locked");
            return Err(QuestError::Locked { id, unlock_at });
        }
        log::debug!("entering level {id} ({:?})", level.challenge);
        Ok(match level.challenge.mini_game() {
            Some(kind) => LevelRun::MiniGame(MiniGameSession::new(kind, seed)),
            None => LevelRun::Finale(self.open_finale()),
        })
    }

    /// The riddle gate, regardless of the schedule (finale access code).
    #[must_use]
    pub fn open_finale(&self) -> RiddleGate<S> {
        RiddleGate::open(
            &self.data.riddles,
            &self.data.photos,
            PersistedFlags::new(self.flags.store().clone()),
            self.override_all(),
        )
    }

    pub fn record_completion(&self, id: LevelId, completion: Completion, now: DateTime<Utc>) {
        log::debug!("level {id} completed with score {}", completion.score);
        self.flags.record_result(GameResult {
            level_id: id,
            score: completion.score,
            completed: true,
            recorded_at: now,
        });
    }

    #[must_use]
    pub fn intro_seen(&self) -> bool {
        self.flags.intro_seen()
    }

    pub fn finish_intro(&self) {
        self.flags.mark_intro_seen();
    }

    /// Expire transient notices.
    pub fn tick(&mut self, dt: Duration) {
        self.access.tick(dt);
        if let Some((_, countdown)) = self.locked_notice.as_mut()
            && countdown.advance(dt)
        {
            self.locked_notice = None;
        }
    }

    #[must_use]
    pub fn locked_notice(&self) -> Option<&str> {
        self.locked_notice.as_ref().map(|(text, _)| text.as_str())
    }
}
