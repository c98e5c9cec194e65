#![forbid(unsafe_code)]
//! Browser adapter for the quest engine.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod clock;
pub mod dom;
pub mod interval;
pub mod storage;

pub use bridge::{WebMiniGame, WebQuest, WebRiddleGate};
pub use clock::BrowserClock;
pub use interval::IntervalHandle;
pub use storage::{LocalStorageStore, WebStorageError};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
