//! Drag collect: drop each floating memory into the jar.
use serde::Serialize;

use super::Progress;
use crate::constants::{DRAG_DROP_LINE_Y, DRAG_PROGRESS_PER_TOKEN, DRAG_TOKEN_COUNT};

const GLYPHS: [&str; DRAG_TOKEN_COUNT] = ["🍬", "🍫", "✨", "🧸", "💌"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DragToken {
    pub slot: usize,
    pub glyph: &'static str,
}

#[derive(Debug, Clone)]
pub struct DragState {
    tokens: Vec<DragToken>,
    collected: usize,
}

impl DragState {
    pub(crate) fn new() -> Self {
        Self {
            tokens: GLYPHS
                .iter()
                .enumerate()
                .map(|(slot, &glyph)| DragToken { slot, glyph })
                .collect(),
            collected: 0,
        }
    }

    /// A release above the drop line springs the token back into place.
    pub(crate) fn release(&mut self, slot: usize, y: f32, progress: &mut Progress) -> bool {
        if y <= DRAG_DROP_LINE_Y {
            return false;
        }
        let Some(index) = self.tokens.iter().position(|token| token.slot == slot) else {
            return false;
        };
        self.tokens.remove(index);
        self.collected += 1;
        progress.advance(DRAG_PROGRESS_PER_TOKEN);
        true
    }

    #[must_use]
    pub fn tokens(&self) -> &[DragToken] {
        &self.tokens
    }

    #[must_use]
    pub const fn collected(&self) -> usize {
        self.collected
    }
}
