//! Date-gated level availability and the pre-finale countdown.
//!
//! Unlock instants are absolute, offset-qualified timestamps, so comparison
//! against `Utc::now()` needs no timezone arithmetic. Everything here is a
//! pure function of the instant it is given; the host re-polls at
//! [`POLL_INTERVAL`](crate::constants::POLL_INTERVAL).
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::COUNTDOWN_LEAD_MINUTES;
use crate::data::{DataError, LevelDescriptor, LevelId};

/// `true` when `override_all` is set or `now` has reached the level's unlock instant.
#[must_use]
pub fn is_unlocked<Tz: TimeZone>(
    level: &LevelDescriptor,
    now: &DateTime<Tz>,
    override_all: bool,
) -> bool {
    override_all || *now >= level.unlock_at
}

/// Popup text shown when a locked level is tapped.
#[must_use]
pub fn locked_message(level: &LevelDescriptor) -> String {
    format!("Come back on {}", level.unlock_at.format("%b %-d, %H:%M"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownStatus {
    pub active: bool,
    /// Whole seconds until the finale unlocks, rounded up; zero when inactive.
    pub seconds_remaining: u64,
}

impl CountdownStatus {
    pub const INACTIVE: Self = Self {
        active: false,
        seconds_remaining: 0,
    };

    /// `MM:SS` display text.
    #[must_use]
    pub fn clock_text(&self) -> String {
        let minutes = self.seconds_remaining / 60;
        let seconds = self.seconds_remaining % 60;
        format!("{minutes:02}:{seconds:02}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockSchedule {
    entries: Vec<(LevelId, DateTime<FixedOffset>)>,
    finale_at: DateTime<FixedOffset>,
    countdown_lead: chrono::Duration,
}

impl UnlockSchedule {
    /// Build a schedule over `levels`; the last level is the finale.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NoLevels`] if `levels` is empty.
    pub fn new(levels: &[LevelDescriptor]) -> Result<Self, DataError> {
        let finale = levels.last().ok_or(DataError::NoLevels)?;
        Ok(Self {
            entries: levels.iter().map(|l| (l.id, l.unlock_at)).collect(),
            finale_at: finale.unlock_at,
            countdown_lead: chrono::Duration::minutes(COUNTDOWN_LEAD_MINUTES),
        })
    }

    #[must_use]
    pub fn with_countdown_lead(mut self, lead: chrono::Duration) -> Self {
        self.countdown_lead = lead;
        self
    }

    #[must_use]
    pub const fn finale_at(&self) -> DateTime<FixedOffset> {
        self.finale_at
    }

    #[must_use]
    pub fn unlock_at(&self, id: LevelId) -> Option<DateTime<FixedOffset>> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, at)| *at)
    }

    /// Unknown ids are never unlocked, even under the override.
    #[must_use]
    pub fn is_unlocked(&self, id: LevelId, now: DateTime<Utc>, override_all: bool) -> bool {
        self.unlock_at(id)
            .is_some_and(|at| override_all || now >= at)
    }

    /// Reachable level ids in map order.
    #[must_use]
    pub fn unlocked_ids(&self, now: DateTime<Utc>, override_all: bool) -> Vec<LevelId> {
        self.entries
            .iter()
            .filter(|(_, at)| override_all || now >= *at)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Active only inside `[finale_at - lead, finale_at)`.
    #[must_use]
    pub fn countdown_status(&self, now: DateTime<Utc>) -> CountdownStatus {
        let start = self.finale_at - self.countdown_lead;
        if now < start || now >= self.finale_at {
            return CountdownStatus::INACTIVE;
        }
        let remaining = self.finale_at.with_timezone(&Utc) - now;
        let millis = u64::try_from(remaining.num_milliseconds()).unwrap_or(0);
        CountdownStatus {
            active: true,
            seconds_remaining: millis.div_ceil(1_000),
        }
    }
}

/// Result of one scheduler poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOutcome {
    pub unlocked: Vec<LevelId>,
    /// Whether `unlocked` differs from the previous poll; lets the host skip
    /// re-rendering the map.
    pub changed: bool,
    /// `None` when inactive or while the override is on.
    pub countdown: Option<CountdownStatus>,
}

/// Stateful wrapper the host calls once per [`POLL_INTERVAL`](crate::constants::POLL_INTERVAL).
#[derive(Debug, Clone)]
pub struct UnlockPoller {
    schedule: UnlockSchedule,
    override_all: bool,
    last: Option<Vec<LevelId>>,
}

impl UnlockPoller {
    #[must_use]
    pub const fn new(schedule: UnlockSchedule, override_all: bool) -> Self {
        Self {
            schedule,
            override_all,
            last: None,
        }
    }

    #[must_use]
    pub const fn schedule(&self) -> &UnlockSchedule {
        &self.schedule
    }

    #[must_use]
    pub const fn override_all(&self) -> bool {
        self.override_all
    }

    pub fn set_override(&mut self, override_all: bool) {
        if self.override_all != override_all {
            log::debug!("unlock override {}", if override_all { "on" } else { "off" });
        }
        self.override_all = override_all;
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> PollOutcome {
        let unlocked = self.schedule.unlocked_ids(now, self.override_all);
        let changed = self.last.as_ref() != Some(&unlocked);
        if changed {
            log::debug!("unlocked levels now {unlocked:?}");
            self.last = Some(unlocked.clone());
        }
        let countdown = if self.override_all {
            None
        } else {
            Some(self.schedule.countdown_status(now)).filter(|status| status.active)
        };
        PollOutcome {
            unlocked,
            changed,
            countdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestData;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn schedule() -> UnlockSchedule {
        UnlockSchedule::new(&QuestData::load_default().levels).unwrap()
    }

    #[test]
    fn unlock_is_exact_at_the_boundary() {
        let level = &QuestData::load_default().levels[0];
        let instant = level.unlock_at.with_timezone(&Utc);
        assert!(!is_unlocked(
            level,
            &(instant - chrono::Duration::milliseconds(1)),
            false
        ));
        assert!(is_unlocked(level, &instant, false));
        assert!(is_unlocked(level, &level.unlock_at, false));
    }

    #[test]
    fn override_unlocks_everything() {
        let long_ago = at("2000-01-01T00:00:00Z");
        assert_eq!(schedule().unlocked_ids(long_ago, true).len(), 8);
        assert!(schedule().unlocked_ids(long_ago, false).is_empty());
    }

    #[test]
    fn unlock_compares_absolute_instants() {
        // 2026-02-07T00:00+05:30 is 2026-02-06T18:30Z.
        let schedule = schedule();
        assert!(!schedule.is_unlocked(LevelId(1), at("2026-02-06T18:29:59Z"), false));
        assert!(schedule.is_unlocked(LevelId(1), at("2026-02-06T18:30:00Z"), false));
        assert!(!schedule.is_unlocked(LevelId(2), at("2026-02-06T18:30:00Z"), false));
    }

    #[test]
    fn unknown_level_is_never_unlocked() {
        assert!(!schedule().is_unlocked(LevelId(42), at("2030-01-01T00:00:00Z"), true));
    }

    #[test]
    fn countdown_window_is_half_open() {
        let schedule = schedule();
        // Finale: 2026-02-14T00:00+05:30 == 2026-02-13T18:30Z.
        assert_eq!(
            schedule.countdown_status(at("2026-02-13T18:24:59Z")),
            CountdownStatus::INACTIVE
        );
        let start = schedule.countdown_status(at("2026-02-13T18:25:00Z"));
        assert!(start.active);
        assert_eq!(start.seconds_remaining, 300);
        assert_eq!(start.clock_text(), "05:00");
        let late = schedule.countdown_status(
            at("2026-02-13T18:29:59Z") + chrono::Duration::milliseconds(500),
        );
        assert!(late.active);
        assert_eq!(late.seconds_remaining, 1);
        assert!(!schedule.countdown_status(at("2026-02-13T18:30:00Z")).active);
    }

    #[test]
    fn clock_text_pads_minutes_and_seconds() {
        let status = CountdownStatus {
            active: true,
            seconds_remaining: 127,
        };
        assert_eq!(status.clock_text(), "02:07");
    }

    #[test]
    fn poller_reports_changes_only_once() {
        let mut poller = UnlockPoller::new(schedule(), false);
        let before = at("2026-02-07T12:00:00Z");
        let first = poller.poll(before);
        assert!(first.changed);
        assert_eq!(first.unlocked, vec![LevelId(1)]);
        assert!(!poller.poll(before).changed);
        let next_day = poller.poll(at("2026-02-08T12:00:00Z"));
        assert!(next_day.changed);
        assert_eq!(next_day.unlocked, vec![LevelId(1), LevelId(2)]);
    }

    #[test]
    fn poller_hides_countdown_under_override() {
        let now = at("2026-02-13T18:27:00Z");
        let mut poller = UnlockPoller::new(schedule(), false);
        assert_eq!(poller.poll(now).countdown.map(|c| c.seconds_remaining), Some(180));
        poller.set_override(true);
        let outcome = poller.poll(now);
        assert!(outcome.countdown.is_none());
        assert!(outcome.changed);
        assert_eq!(outcome.unlocked.len(), 8);
    }

    #[test]
    fn locked_message_uses_level_offset() {
        let level = &QuestData::load_default().levels[1];
        assert_eq!(locked_message(level), "Come back on Feb 8, 00:00");
    }
}
