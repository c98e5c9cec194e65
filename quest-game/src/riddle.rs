//! Riddle gate guarding the finale gallery.
//!
//! Four questions answered in order. The stage lives in the injected store so
//! a reload resumes at the current riddle; wrong answers only touch in-memory
//! state (attempt counter, transient feedback).
use serde::Serialize;
use std::time::Duration;

use crate::constants::{
    RIDDLE_BYPASS_KEYWORD, RIDDLE_FEEDBACK_FOR, RIDDLE_HINT_AFTER, RIDDLE_WRONG_FEEDBACK,
};
use crate::data::{Photo, Riddle};
use crate::storage::{KeyValueStore, PersistedFlags, RiddleStage};
use crate::timer::Countdown;

/// Lowercase with every whitespace character removed.
#[must_use]
pub fn normalize_answer(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum SubmitOutcome {
    /// Correct answer; `stage` is the new, persisted stage.
    Advanced { stage: RiddleStage },
    /// Correct answer to the last riddle.
    Solved,
    Rejected { wrong_attempts: u32 },
    /// Developer bypass jumped straight to solved.
    Bypassed,
    AlreadySolved,
}

/// What the finale page should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum GateView {
    Question {
        /// 1-based riddle number.
        number: u8,
        question: String,
        feedback: Option<&'static str>,
        hint: Option<String>,
    },
    Gallery { photos: Vec<Photo> },
}

#[derive(Debug, Clone)]
pub struct RiddleGate<S> {
    riddles: Vec<Riddle>,
    photos: Vec<Photo>,
    flags: PersistedFlags<S>,
    stage: RiddleStage,
    wrong_attempts: u32,
    feedback: Option<Countdown>,
    dev_mode: bool,
}

impl<S: KeyValueStore> RiddleGate<S> {
    /// Mount the gate, resuming from the persisted stage.
    #[must_use]
    pub fn open(
        riddles: &[Riddle],
        photos: &[Photo],
        flags: PersistedFlags<S>,
        dev_mode: bool,
    ) -> Self {
        let stage = flags.riddle_stage();
        log::debug!("riddle gate opened at stage {}", stage.get());
        Self {
            riddles: riddles.to_vec(),
            photos: photos.to_vec(),
            flags,
            stage,
            wrong_attempts: 0,
            feedback: None,
            dev_mode,
        }
    }

    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        if self.is_solved() {
            return SubmitOutcome::AlreadySolved;
        }
        if self.dev_mode && input.trim().to_lowercase() == RIDDLE_BYPASS_KEYWORD {
            log::debug!("riddle gate bypassed from stage {}", self.stage.get());
            self.advance_to(RiddleStage::SOLVED);
            return SubmitOutcome::Bypassed;
        }
        let answer = normalize_answer(input);
        let expected = self
            .current_riddle()
            .map(|riddle| normalize_answer(&riddle.answer));
        if expected.as_deref() == Some(answer.as_str()) {
            self.advance_to(self.stage.next());
            if self.is_solved() {
                return SubmitOutcome::Solved;
            }
            return SubmitOutcome::Advanced { stage: self.stage };
        }
        self.wrong_attempts += 1;
        self.feedback = Some(Countdown::new(RIDDLE_FEEDBACK_FOR));
        SubmitOutcome::Rejected {
            wrong_attempts: self.wrong_attempts,
        }
    }

    fn advance_to(&mut self, stage: RiddleStage) {
        self.stage = stage;
        self.wrong_attempts = 0;
        self.feedback = None;
        self.flags.set_riddle_stage(stage);
    }

    /// Expire the wrong-answer feedback.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(feedback) = self.feedback.as_mut()
            && feedback.advance(dt)
        {
            self.feedback = None;
        }
    }

    #[must_use]
    pub fn view(&self) -> GateView {
        match self.current_riddle() {
            Some(riddle) if !self.is_solved() => GateView::Question {
                number: self.stage.get() + 1,
                question: riddle.question.clone(),
                feedback: self.feedback.map(|_| RIDDLE_WRONG_FEEDBACK),
                hint: self.hint_visible().then(|| riddle.hint.clone()),
            },
            _ => GateView::Gallery {
                photos: self.photos.clone(),
            },
        }
    }

    fn current_riddle(&self) -> Option<&Riddle> {
        self.riddles.get(usize::from(self.stage.get()))
    }

    #[must_use]
    pub const fn stage(&self) -> RiddleStage {
        self.stage
    }

    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.stage.is_solved()
    }

    #[must_use]
    pub const fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    #[must_use]
    pub const fn hint_visible(&self) -> bool {
        self.wrong_attempts >= RIDDLE_HINT_AFTER
    }

    #[must_use]
    pub const fn feedback_remaining(&self) -> Option<Duration> {
        match self.feedback {
            Some(feedback) => Some(feedback.remaining()),
            None => None,
        }
    }

    #[must_use]
    pub const fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn set_dev_mode(&mut self, dev_mode: bool) {
        self.dev_mode = dev_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuestData;
    use crate::storage::MemoryStore;

    fn gate(store: &MemoryStore, dev_mode: bool) -> RiddleGate<MemoryStore> {
        let data = QuestData::load_default();
        RiddleGate::open(
            &data.riddles,
            &data.photos,
            PersistedFlags::new(store.clone()),
            dev_mode,
        )
    }

    #[test]
    fn normalization_strips_case_and_spaces() {
        assert_eq!(normalize_answer("  I Love\tYou \n"), "iloveyou");
        assert_eq!(normalize_answer("WITH you"), "withyou");
    }

    #[test]
    fn wrong_answer_shows_feedback_until_it_expires() {
        let store = MemoryStore::new();
        let mut gate = gate(&store, false);
        assert_eq!(
            gate.submit("nope"),
            SubmitOutcome::Rejected { wrong_attempts: 1 }
        );
        let GateView::Question { feedback, hint, .. } = gate.view() else {
            panic!("expected a question");
        };
        assert_eq!(feedback, Some(RIDDLE_WRONG_FEEDBACK));
        assert_eq!(hint, None);
        gate.tick(Duration::from_millis(1_999));
        assert!(gate.feedback_remaining().is_some());
        gate.tick(Duration::from_millis(1));
        assert!(gate.feedback_remaining().is_none());
        assert_eq!(gate.stage(), RiddleStage::START);
    }

    #[test]
    fn correct_answer_resets_the_counter() {
        let store = MemoryStore::new();
        let mut gate = gate(&store, false);
        gate.submit("a");
        gate.submit("b");
        assert!(gate.hint_visible());
        assert_eq!(
            gate.submit("iloveyou"),
            SubmitOutcome::Advanced {
                stage: RiddleStage::new(1)
            }
        );
        assert_eq!(gate.wrong_attempts(), 0);
        assert!(!gate.hint_visible());
        assert!(gate.feedback_remaining().is_none());
    }

    #[test]
    fn bypass_needs_dev_mode() {
        let store = MemoryStore::new();
        let mut locked = gate(&store, false);
        assert!(matches!(locked.submit("skip"), SubmitOutcome::Rejected { .. }));

        let mut dev = gate(&store, true);
        assert!(matches!(dev.submit("s k i p"), SubmitOutcome::Rejected { .. }));
        assert_eq!(dev.submit(" SKIP "), SubmitOutcome::Bypassed);
        assert!(dev.is_solved());
        assert_eq!(dev.submit("anything"), SubmitOutcome::AlreadySolved);
        assert_eq!(
            PersistedFlags::new(store).riddle_stage(),
            RiddleStage::SOLVED
        );
    }

    #[test]
    fn unavailable_storage_still_plays() {
        let mut gate = gate(&MemoryStore::unavailable(), false);
        assert!(matches!(gate.submit("iloveyou"), SubmitOutcome::Advanced { .. }));
        assert_eq!(gate.stage().get(), 1);
    }
}
