use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use quest_game::{CountdownStatus, LevelId, QuestData, UnlockPoller, UnlockSchedule, locked_message};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub id: LevelId,
    pub name: String,
    pub unlock_at: DateTime<FixedOffset>,
    pub unlocked: bool,
    /// Popup text while locked.
    pub locked_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub at: DateTime<Utc>,
    pub override_all: bool,
    pub levels: Vec<ScheduleEntry>,
    pub countdown: Option<CountdownStatus>,
}

impl ScheduleReport {
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.levels.iter().filter(|level| level.unlocked).count()
    }
}

/// Parse `--at`.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .with_context(|| format!("'{raw}' is not an RFC 3339 timestamp"))
}

/// Evaluate the embedded schedule the way the map poll does at `at`.
pub fn inspect_schedule(at: DateTime<Utc>, override_all: bool) -> Result<ScheduleReport> {
    let data = QuestData::load_default();
    let schedule = UnlockSchedule::new(&data.levels).context("building unlock schedule")?;
    let mut poller = UnlockPoller::new(schedule, override_all);
    let outcome = poller.poll(at);
    let levels = data
        .levels
        .iter()
        .map(|level| {
            let unlocked = outcome.unlocked.contains(&level.id);
            ScheduleEntry {
                id: level.id,
                name: level.name.clone(),
                unlock_at: level.unlock_at,
                unlocked,
                locked_message: (!unlocked).then(|| locked_message(level)),
            }
        })
        .collect();
    Ok(ScheduleReport {
        at,
        override_all,
        levels,
        countdown: outcome.countdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_week_shows_partial_map() {
        let at = parse_instant("2026-02-10T12:00:00+05:30").unwrap();
        let report = inspect_schedule(at, false).unwrap();
        assert_eq!(report.unlocked_count(), 4);
        assert_eq!(
            report.levels[4].locked_message.as_deref(),
            Some("Come back on Feb 11, 00:00")
        );
        assert!(report.countdown.is_none());
    }

    #[test]
    fn override_opens_everything() {
        let at = parse_instant("2020-01-01T00:00:00Z").unwrap();
        let report = inspect_schedule(at, true).unwrap();
        assert_eq!(report.unlocked_count(), 8);
        assert!(report.levels.iter().all(|l| l.locked_message.is_none()));
    }

    #[test]
    fn countdown_appears_before_the_finale() {
        let at = parse_instant("2026-02-13T23:58:30+05:30").unwrap();
        let countdown = inspect_schedule(at, false).unwrap().countdown.unwrap();
        assert_eq!(countdown.clock_text(), "01:30");
    }

    #[test]
    fn bad_instant_is_an_error() {
        assert!(parse_instant("tomorrow").is_err());
    }
}
