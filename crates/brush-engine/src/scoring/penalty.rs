use super::score::{Classification, StrokeScore};
use crate::api::config::EngineConfig;
use crate::strokes::model::CharacterStrokeModel;

/// Raw punishment for a scored gesture that consumed `strokes_consumed`
/// strokes starting at `stroke_index`. Always ≥ 0.
///
/// Perfect and unscoreable gestures cost nothing. Otherwise a near-reversal
/// is measured against 180° instead of 0°, errors inside the perfect
/// tolerance cost nothing, and the rest scale with the number of strokes.
/// Two special cases apply first: dragging far past a long run of strokes
/// costs a flat amount per stroke, and a long stroke followed by a short
/// flick is free.
pub fn punishment(
    score: &StrokeScore,
    strokes_consumed: usize,
    stroke_index: usize,
    drag_distance: f32,
    model: &CharacterStrokeModel,
    scale: f32,
    config: &EngineConfig,
) -> f32 {
    if score.classification != Classification::Mismatch || strokes_consumed == 0 {
        return 0.0;
    }

    let mut error = score.angle_error;
    if error > config.opposite_threshold_deg {
        error = (error - 180.0).abs();
    }
    if error <= config.perfect_tolerance_deg {
        return 0.0;
    }

    let consumed = strokes_consumed as f32;

    if strokes_consumed > config.over_drag_min_strokes && stroke_index < model.total_strokes() {
        let remaining = model.remaining_screen_length(stroke_index, scale);
        if drag_distance > remaining * config.over_drag_ratio {
            log::debug!(
                "over-drag: {:.1}px across {:.1}px of strokes, {} strokes",
                drag_distance,
                remaining,
                strokes_consumed
            );
            return consumed * config.over_drag_punishment_per_stroke;
        }
    }

    if strokes_consumed == 2 {
        let length = |i: usize| model.stroke(i).and_then(|s| s.length).filter(|&l| l != 0.0);
        if let (Some(first), Some(second)) = (length(stroke_index), length(stroke_index + 1)) {
            if second < first * config.short_second_stroke_ratio {
                return 0.0;
            }
        }
    }

    (error - config.perfect_tolerance_deg).abs() * consumed
}
