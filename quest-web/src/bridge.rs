//! `wasm-bindgen` surface for the JavaScript presentation layer.
//!
//! Views cross the boundary as plain JS objects produced by
//! `serde-wasm-bindgen`; timers run through [`IntervalHandle`] so freeing a
//! bridge object from JS tears its loop down.
use quest_game::constants::POLL_INTERVAL;
use quest_game::{
    Clock, GameInput, GameStatus, LevelId, LevelRun, MiniGameSession, PlayArea, QuestEngine,
    RiddleGate,
};
use serde::Serialize;
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

use crate::clock::BrowserClock;
use crate::dom;
use crate::interval::IntervalHandle;
use crate::storage::LocalStorageStore;

const FRAME: Duration = Duration::from_millis(16);

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// Milliseconds from `Date.now()` readings to a tick delta; clock steps
/// backwards count as zero.
fn elapsed_between(last_ms: f64, now_ms: f64) -> Duration {
    Duration::try_from_secs_f64((now_ms - last_ms).max(0.0) / 1000.0).unwrap_or_default()
}

fn error(err: &impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// The level map, access prompt and scheduler poll for one page.
#[wasm_bindgen]
pub struct WebQuest {
    engine: Rc<RefCell<QuestEngine<LocalStorageStore>>>,
    poll: Option<IntervalHandle>,
}

#[wasm_bindgen]
impl WebQuest {
    /// # Errors
    /// Fails only if the embedded quest content is unusable.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, JsValue> {
        let engine = QuestEngine::with_default_data(LocalStorageStore)
            .map_err(|err| error(&err))?
            .with_url_query(&dom::location_search());
        Ok(Self {
            engine: Rc::new(RefCell::new(engine)),
            poll: None,
        })
    }

    /// Map snapshot at the current instant.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be converted to a JS value.
    pub fn map(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.borrow().map(BrowserClock.now()))
    }

    /// Call `on_poll(outcome)` every second until [`WebQuest::stop_polling`]
    /// or until this object is freed.
    ///
    /// # Errors
    /// Returns an error if the interval cannot be scheduled.
    pub fn start_polling(&mut self, on_poll: js_sys::Function) -> Result<(), JsValue> {
        let engine = Rc::clone(&self.engine);
        let handle = IntervalHandle::start(POLL_INTERVAL, move || {
            let outcome = engine.borrow_mut().poll(BrowserClock.now());
            match to_js(&outcome) {
                Ok(value) => {
                    if let Err(err) = on_poll.call1(&JsValue::NULL, &value) {
                        dom::console_error(&dom::js_error_message(&err));
                    }
                }
                Err(err) => dom::console_error(&dom::js_error_message(&err)),
            }
        })?;
        self.poll = Some(handle);
        Ok(())
    }

    pub fn stop_polling(&mut self) {
        self.poll = None;
    }

    #[wasm_bindgen(js_name = tapTitle)]
    pub fn tap_title(&self) -> bool {
        self.engine.borrow_mut().tap_title()
    }

    /// Returns `"dev-mode"`, `"finale"`, `"wrong-code"` or `undefined`.
    ///
    /// # Errors
    /// Returns an error if the outcome cannot be converted to a JS value.
    #[wasm_bindgen(js_name = enterCode)]
    pub fn enter_code(&self, code: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.borrow_mut().enter_code(code))
    }

    /// Transient notice text (access result or locked-level popup).
    pub fn notice(&self) -> Option<String> {
        let engine = self.engine.borrow();
        engine
            .locked_notice()
            .map(str::to_string)
            .or_else(|| engine.access().notice().map(|n| n.message().to_string()))
    }

    /// Expire notices; call from the host's frame loop.
    pub fn tick(&self, dt_ms: u32) {
        self.engine
            .borrow_mut()
            .tick(Duration::from_millis(u64::from(dt_ms)));
    }

    #[wasm_bindgen(js_name = introSeen)]
    pub fn intro_seen(&self) -> bool {
        self.engine.borrow().intro_seen()
    }

    #[wasm_bindgen(js_name = finishIntro)]
    pub fn finish_intro(&self) {
        self.engine.borrow().finish_intro();
    }

    /// Mount a mini-game level.
    ///
    /// # Errors
    /// Returns an error for unknown or locked levels and for the finale.
    #[wasm_bindgen(js_name = enterMiniGame)]
    pub fn enter_mini_game(&self, level_id: u8) -> Result<WebMiniGame, JsValue> {
        let id = LevelId(level_id);
        let run = self
            .engine
            .borrow_mut()
            .enter_level(id, BrowserClock.now(), random_seed())
            .map_err(|err| error(&err))?;
        match run {
            LevelRun::MiniGame(session) => {
                Ok(WebMiniGame::new(id, session, Rc::clone(&self.engine)))
            }
            LevelRun::Finale(_) => Err(JsValue::from_str("level hosts the riddle gate")),
        }
    }

    /// Mount the finale through the schedule.
    ///
    /// # Errors
    /// Returns an error for unknown or locked levels and for mini-game levels.
    #[wasm_bindgen(js_name = enterFinale)]
    pub fn enter_finale(&self, level_id: u8) -> Result<WebRiddleGate, JsValue> {
        let run = self
            .engine
            .borrow_mut()
            .enter_level(LevelId(level_id), BrowserClock.now(), random_seed())
            .map_err(|err| error(&err))?;
        match run {
            LevelRun::Finale(gate) => Ok(WebRiddleGate { gate }),
            LevelRun::MiniGame(_) => Err(JsValue::from_str("level hosts a mini-game")),
        }
    }

    /// Mount the finale regardless of the schedule (finale access code).
    #[wasm_bindgen(js_name = openFinale)]
    pub fn open_finale(&self) -> WebRiddleGate {
        WebRiddleGate {
            gate: self.engine.borrow().open_finale(),
        }
    }
}

/// One mounted mini-game and its frame loop.
#[wasm_bindgen]
pub struct WebMiniGame {
    level: LevelId,
    session: Rc<RefCell<MiniGameSession>>,
    engine: Rc<RefCell<QuestEngine<LocalStorageStore>>>,
    frames: Option<IntervalHandle>,
}

impl WebMiniGame {
    fn new(
        level: LevelId,
        session: MiniGameSession,
        engine: Rc<RefCell<QuestEngine<LocalStorageStore>>>,
    ) -> Self {
        Self {
            level,
            session: Rc::new(RefCell::new(session)),
            engine,
            frames: None,
        }
    }

    fn input(&self, input: GameInput) -> bool {
        self.session.borrow_mut().handle(input)
    }
}

#[wasm_bindgen]
impl WebMiniGame {
    /// Leave the idle screen and drive the game at ~60 Hz, calling
    /// `on_frame(view)` every frame. Each frame advances the session by the
    /// wall time since the previous one. Completion is recorded in the
    /// results ledger before the won frame is delivered, and the loop stops
    /// itself after that frame.
    ///
    /// # Errors
    /// Returns an error if the session was already started or the interval
    /// cannot be scheduled.
    pub fn start(&mut self, on_frame: js_sys::Function) -> Result<(), JsValue> {
        self.session.borrow_mut().start().map_err(|err| error(&err))?;
        let session = Rc::clone(&self.session);
        let engine = Rc::clone(&self.engine);
        let level = self.level;
        let mut last = js_sys::Date::now();
        let handle = IntervalHandle::start_until(FRAME, move || {
            let now = js_sys::Date::now();
            let dt = elapsed_between(last, now);
            last = now;
            let completion = session.borrow_mut().tick(dt);
            if let Some(completion) = completion {
                engine
                    .borrow()
                    .record_completion(level, completion, BrowserClock.now());
            }
            let view = session.borrow().view();
            let frame = to_js(&view).and_then(|value| on_frame.call1(&JsValue::NULL, &value));
            if let Err(err) = frame {
                dom::console_error(&dom::js_error_message(&err));
            }
            if view.status == GameStatus::Playing {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })?;
        self.frames = Some(handle);
        Ok(())
    }

    /// `true` while the frame loop is scheduled.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.frames.as_ref().is_some_and(IntervalHandle::is_running)
    }

    /// Stop the frame loop; freeing the object does the same.
    pub fn unmount(&mut self) {
        self.frames = None;
    }

    /// # Errors
    /// Returns an error if the view cannot be converted to a JS value.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.borrow().view())
    }

    pub fn tap(&self, target: u32) -> bool {
        self.input(GameInput::Tap { target })
    }

    pub fn press(&self) -> bool {
        self.input(GameInput::Press)
    }

    pub fn release(&self) -> bool {
        self.input(GameInput::Release)
    }

    #[wasm_bindgen(js_name = dragRelease)]
    pub fn drag_release(&self, token: usize, y: f32) -> bool {
        self.input(GameInput::DragRelease { token, y })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.input(GameInput::PointerMove {
            x,
            y,
            area: PlayArea::new(width, height),
        })
    }

    pub fn beat(&self) -> bool {
        self.input(GameInput::Beat)
    }
}

#[wasm_bindgen]
pub struct WebRiddleGate {
    gate: RiddleGate<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebRiddleGate {
    /// # Errors
    /// Returns an error if the outcome cannot be converted to a JS value.
    pub fn submit(&mut self, answer: &str) -> Result<JsValue, JsValue> {
        to_js(&self.gate.submit(answer))
    }

    pub fn tick(&mut self, dt_ms: u32) {
        self.gate.tick(Duration::from_millis(u64::from(dt_ms)));
    }

    /// # Errors
    /// Returns an error if the view cannot be converted to a JS value.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.gate.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_delta_follows_the_wall_clock() {
        assert_eq!(elapsed_between(1_000.0, 1_016.0), Duration::from_millis(16));
        assert_eq!(elapsed_between(1_000.0, 31_000.0), Duration::from_secs(30));
    }

    #[test]
    fn backwards_clock_steps_do_not_tick() {
        assert_eq!(elapsed_between(5_000.0, 4_000.0), Duration::ZERO);
        assert_eq!(elapsed_between(0.0, f64::NAN), Duration::ZERO);
    }
}
