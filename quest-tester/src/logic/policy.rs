//! Scripted player used for the playability sweep.
use quest_game::minigame::VariantView;
use quest_game::{GameInput, PlayArea};

/// Drop height comfortably past the jar line.
const DROP_Y: f32 = 260.0;
const EDGE_INSET: f32 = 5.0;

/// An attentive player: taps every target on screen, holds the heart,
/// drops every token in the jar, drags the thread to the far edge and taps
/// only on the beat. The shield needs no input.
#[must_use]
pub fn player_moves(view: &VariantView, area: PlayArea) -> Vec<GameInput> {
    match view {
        VariantView::Bloom { sparks, .. } => sparks
            .iter()
            .map(|spark| GameInput::Tap { target: spark.id })
            .collect(),
        VariantView::SteadyHold { holding: false } => vec![GameInput::Press],
        VariantView::SteadyHold { holding: true } | VariantView::AngleShield { .. } => Vec::new(),
        VariantView::DragCollect { tokens } => tokens
            .iter()
            .map(|token| GameInput::DragRelease {
                token: token.slot,
                y: DROP_Y,
            })
            .collect(),
        VariantView::ThreadConnect { .. } => vec![GameInput::PointerMove {
            x: area.width - EDGE_INSET,
            y: area.height / 2.0,
            area,
        }],
        VariantView::RhythmTap { pulsing: true } => vec![GameInput::Beat],
        VariantView::RhythmTap { pulsing: false } => Vec::new(),
        VariantView::CatchFalling { targets } => targets
            .iter()
            .map(|target| GameInput::Tap { target: target.id })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: PlayArea = PlayArea::new(400.0, 320.0);

    #[test]
    fn holds_only_once() {
        assert_eq!(
            player_moves(&VariantView::SteadyHold { holding: false }, AREA),
            vec![GameInput::Press]
        );
        assert!(player_moves(&VariantView::SteadyHold { holding: true }, AREA).is_empty());
    }

    #[test]
    fn taps_only_on_the_beat() {
        assert!(player_moves(&VariantView::RhythmTap { pulsing: false }, AREA).is_empty());
        assert_eq!(
            player_moves(&VariantView::RhythmTap { pulsing: true }, AREA),
            vec![GameInput::Beat]
        );
    }
}
