use crate::api::config::EngineConfig;
use crate::input::gesture::DragGesture;
use crate::strokes::model::CharacterStrokeModel;

/// Shortest drag (screen px) that counts as a gesture at `cursor`:
/// a fraction of the targeted stroke's screen length, or a fixed floor
/// when that stroke has no length.
pub fn minimum_drag(
    model: &CharacterStrokeModel,
    cursor: usize,
    scale: f32,
    config: &EngineConfig,
) -> f32 {
    model
        .stroke(cursor)
        .and_then(|s| s.screen_length(scale))
        .map_or(config.fallback_min_drag, |l| l * config.min_drag_ratio)
}

/// Number of consecutive strokes, starting at `cursor`, that the drag's
/// path length covers. Each further stroke costs the gap from the previous
/// stroke plus its own length. A drag below [`minimum_drag`] covers
/// nothing; any other drag covers at least one stroke.
pub fn segment(
    drag: &DragGesture,
    model: &CharacterStrokeModel,
    cursor: usize,
    scale: f32,
    config: &EngineConfig,
) -> usize {
    let total = model.total_strokes();
    if cursor >= total {
        return 0;
    }
    let distance = drag.total_distance();
    if distance < minimum_drag(model, cursor, scale, config) {
        return 0;
    }

    let strokes = model.strokes();
    let mut cumulative = 0.0;
    let mut count = 0;
    for i in cursor..total {
        let Some(length) = strokes[i].screen_length(scale) else {
            break;
        };
        let candidate = if count == 0 {
            length
        } else {
            let gap = strokes[i - 1].distance_to_next.unwrap_or(0.0) * scale;
            cumulative + gap + length
        };
        if distance < candidate {
            break;
        }
        cumulative = candidate;
        count += 1;
    }
    count.max(1).min(total - cursor)
}
