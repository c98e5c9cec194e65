//! Injected key-value persistence and the best-effort flags built on it.
//!
//! Storage being unavailable is never fatal: reads fall back to defaults and
//! failed writes are logged and dropped.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::constants::{KEY_INTRO_SHOWN, KEY_RESULTS, KEY_RIDDLE_STAGE, RIDDLE_STAGE_COUNT};
use crate::data::LevelId;

/// Platform key-value store (browser `localStorage`, in-memory map, ...).
pub trait KeyValueStore {
    type Error: std::error::Error + 'static;

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be accessed.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete a value; deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be accessed.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("storage unavailable")]
    Unavailable,
}

/// In-memory store. Clones share the same map, the way every component in a
/// page shares one `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, e.g. private browsing with
    /// storage disabled.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            entries: Rc::default(),
            unavailable: true,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        if self.unavailable {
            return Err(MemoryStoreError::Unavailable);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.unavailable {
            return Err(MemoryStoreError::Unavailable);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.unavailable {
            return Err(MemoryStoreError::Unavailable);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Riddle-gate progress, `0..=4`; 4 means solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiddleStage(u8);

impl RiddleStage {
    pub const START: Self = Self(0);
    pub const SOLVED: Self = Self(RIDDLE_STAGE_COUNT);

    /// Values past the final stage clamp to solved.
    #[must_use]
    pub fn new(stage: u8) -> Self {
        Self(stage.min(RIDDLE_STAGE_COUNT))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_solved(self) -> bool {
        self.0 >= RIDDLE_STAGE_COUNT
    }

    /// The next stage, saturating at solved.
    #[must_use]
    pub fn next(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    fn parse(raw: &str) -> Self {
        raw.trim().parse::<u8>().map(Self::new).unwrap_or_default()
    }
}

/// One finished level, kept so the map can mark completed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub level_id: LevelId,
    pub score: u32,
    pub completed: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Typed, best-effort access to the quest's persisted keys.
#[derive(Debug, Clone)]
pub struct PersistedFlags<S> {
    store: S,
}

impl<S: KeyValueStore> PersistedFlags<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("storage read of {key} failed, using default: {err}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            log::warn!("storage write of {key} failed, keeping in-memory state: {err}");
        }
    }

    #[must_use]
    pub fn intro_seen(&self) -> bool {
        self.read(KEY_INTRO_SHOWN).is_some_and(|v| v == "true")
    }

    pub fn mark_intro_seen(&self) {
        self.write(KEY_INTRO_SHOWN, "true");
    }

    #[must_use]
    pub fn riddle_stage(&self) -> RiddleStage {
        self.read(KEY_RIDDLE_STAGE)
            .map(|raw| RiddleStage::parse(&raw))
            .unwrap_or_default()
    }

    pub fn set_riddle_stage(&self, stage: RiddleStage) {
        self.write(KEY_RIDDLE_STAGE, &stage.get().to_string());
    }

    #[must_use]
    pub fn results(&self) -> Vec<GameResult> {
        let Some(raw) = self.read(KEY_RESULTS) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            log::warn!("discarding unreadable results ledger: {err}");
            Vec::new()
        })
    }

    pub fn record_result(&self, result: GameResult) {
        let mut results = self.results();
        results.push(result);
        match serde_json::to_string(&results) {
            Ok(json) => self.write(KEY_RESULTS, &json),
            Err(err) => log::warn!("could not encode results ledger: {err}"),
        }
    }

    /// Wipe every quest key (developer reset).
    pub fn clear(&self) {
        for key in [KEY_INTRO_SHOWN, KEY_RIDDLE_STAGE, KEY_RESULTS] {
            if let Err(err) = self.store.remove(key) {
                log::warn!("storage remove of {key} failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_keys_absent() {
        let flags = PersistedFlags::new(MemoryStore::new());
        assert!(!flags.intro_seen());
        assert_eq!(flags.riddle_stage(), RiddleStage::START);
        assert!(flags.results().is_empty());
    }

    #[test]
    fn defaults_when_storage_unavailable() {
        let flags = PersistedFlags::new(MemoryStore::unavailable());
        flags.mark_intro_seen();
        flags.set_riddle_stage(RiddleStage::new(3));
        assert!(!flags.intro_seen());
        assert_eq!(flags.riddle_stage(), RiddleStage::START);
    }

    #[test]
    fn clones_share_the_same_entries() {
        let store = MemoryStore::new();
        let flags = PersistedFlags::new(store.clone());
        flags.mark_intro_seen();
        assert!(PersistedFlags::new(store).intro_seen());
    }

    #[test]
    fn stage_parsing_is_forgiving() {
        let store = MemoryStore::new();
        let flags = PersistedFlags::new(store.clone());
        store.set(KEY_RIDDLE_STAGE, " 2 ").unwrap();
        assert_eq!(flags.riddle_stage().get(), 2);
        store.set(KEY_RIDDLE_STAGE, "nope").unwrap();
        assert_eq!(flags.riddle_stage(), RiddleStage::START);
        store.set(KEY_RIDDLE_STAGE, "9").unwrap();
        assert_eq!(flags.riddle_stage(), RiddleStage::SOLVED);
    }

    #[test]
    fn results_ledger_appends() {
        let flags = PersistedFlags::new(MemoryStore::new());
        let recorded_at = DateTime::parse_from_rfc3339("2026-02-07T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        for id in [1, 3] {
            flags.record_result(GameResult {
                level_id: LevelId(id),
                score: 100,
                completed: true,
                recorded_at,
            });
        }
        let ids: Vec<_> = flags.results().iter().map(|r| r.level_id).collect();
        assert_eq!(ids, vec![LevelId(1), LevelId(3)]);
    }

    #[test]
    fn corrupt_ledger_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(KEY_RESULTS, "[{").unwrap();
        assert!(PersistedFlags::new(store).results().is_empty());
    }

    #[test]
    fn clear_removes_all_keys() {
        let store = MemoryStore::new();
        let flags = PersistedFlags::new(store.clone());
        flags.mark_intro_seen();
        flags.set_riddle_stage(RiddleStage::SOLVED);
        flags.clear();
        assert!(store.is_empty());
    }
}
