use quest_game::{GameStatus, MiniGameKind, MiniGameSession, PlayArea};
use serde::Serialize;
use std::time::Duration;

use super::policy::player_moves;

pub const TICK: Duration = Duration::from_millis(16);
pub const BUDGET: Duration = Duration::from_secs(120);
/// Extra ticks run after a win to catch a repeated completion signal.
const SETTLE_TICKS: u32 = 60;
const AREA: PlayArea = PlayArea::new(400.0, 320.0);

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityRecord {
    pub kind: MiniGameKind,
    pub seed: u64,
    pub ticks: u32,
    pub simulated_ms: u64,
    pub completions: u32,
    pub final_progress: f32,
    pub passed: bool,
}

/// Drive one session with the scripted player until it is won or the
/// budget runs out.
#[must_use]
pub fn play_once(kind: MiniGameKind, seed: u64) -> PlayabilityRecord {
    let mut session = MiniGameSession::new(kind, seed);
    let mut completions = 0;
    let mut ticks = 0;
    let mut elapsed = Duration::ZERO;

    if let Err(err) = session.start() {
        log::error!("{} seed {seed} refused to start: {err}", kind.slug());
    }
    while elapsed < BUDGET && session.status() == GameStatus::Playing {
        for input in player_moves(&session.view().variant, AREA) {
            session.handle(input);
        }
        if session.tick(TICK).is_some() {
            completions += 1;
        }
        ticks += 1;
        elapsed += TICK;
    }
    for _ in 0..SETTLE_TICKS {
        if session.tick(TICK).is_some() {
            completions += 1;
        }
    }

    log::debug!(
        "{} seed {seed}: {completions} completion(s) after {ticks} ticks",
        kind.slug()
    );
    PlayabilityRecord {
        kind,
        seed,
        ticks,
        simulated_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        completions,
        final_progress: session.progress().value(),
        passed: completions == 1 && session.status() == GameStatus::Won,
    }
}

/// Every mini-game kind against every seed.
#[must_use]
pub fn run_playability_analysis(seeds: &[u64]) -> Vec<PlayabilityRecord> {
    MiniGameKind::ALL
        .iter()
        .flat_map(|&kind| seeds.iter().map(move |&seed| play_once(kind, seed)))
        .collect()
}

pub fn failed_records(records: &[PlayabilityRecord]) -> impl Iterator<Item = &PlayabilityRecord> {
    records.iter().filter(|record| !record.passed)
}
