//! `setInterval` owned by a Rust value.
//!
//! Mini-game loops and the unlock poll must stop when their view goes away;
//! dropping the handle clears the interval and frees the closure. A loop can
//! also end itself by returning `ControlFlow::Break` from its callback.
use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::dom;

fn clear(id: &Cell<Option<i32>>) {
    if let Some(id) = id.take() {
        if let Some(window) = dom::window() {
            window.clear_interval_with_handle(id);
        }
        log::debug!("interval {id} cleared");
    }
}

pub struct IntervalHandle {
    id: i32,
    running: Rc<Cell<Option<i32>>>,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    /// Schedule `callback` every `period`.
    ///
    /// # Errors
    /// Returns an error if there is no window or the browser refuses the timer.
    pub fn start(period: Duration, mut callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        Self::start_until(period, move || {
            callback();
            ControlFlow::Continue(())
        })
    }

    /// Schedule `callback` every `period` until it returns `Break`.
    ///
    /// # Errors
    /// Returns an error if there is no window or the browser refuses the timer.
    pub fn start_until(
        period: Duration,
        mut callback: impl FnMut() -> ControlFlow<()> + 'static,
    ) -> Result<Self, JsValue> {
        let window = dom::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let timeout = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        let running = Rc::new(Cell::new(None));
        let slot = Rc::clone(&running);
        let closure = Closure::wrap(Box::new(move || {
            if slot.get().is_some() && callback().is_break() {
                clear(&slot);
            }
        }) as Box<dyn FnMut()>);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            timeout,
        )?;
        running.set(Some(id));
        log::debug!("interval {id} started every {timeout} ms");
        Ok(Self {
            id,
            running,
            _closure: closure,
        })
    }

    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    /// `false` once the callback broke out or the handle was dropped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.get().is_some()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        clear(&self.running);
    }
}
