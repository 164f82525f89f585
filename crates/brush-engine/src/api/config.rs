use serde::{Deserialize, Serialize};

/// Height of the reference square stroke data is authored in.
/// Data space has its origin bottom-left; screen space flips y against this.
pub const REFERENCE_HEIGHT: f32 = 900.0;

/// Tuning for stroke judgement, provided once to the session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed height used for the data → screen y flip (default: 900).
    pub reference_height: f32,
    /// Maximum wrapped angle error (degrees) that still counts as perfect.
    pub perfect_tolerance_deg: f32,
    /// Inclusive band of raw angle differences accepted as a clean reversal.
    pub reversal_band_deg: (f32, f32),
    /// Wrapped differences above this are measured against 180° instead of 0°.
    pub opposite_threshold_deg: f32,
    /// A drag shorter than this fraction of the targeted stroke is not a gesture.
    pub min_drag_ratio: f32,
    /// Minimum drag (screen px) when the targeted stroke has no length.
    pub fallback_min_drag: f32,
    /// Over-drag rule: applies when more than this many strokes are consumed.
    pub over_drag_min_strokes: usize,
    /// Over-drag rule: drag must exceed this multiple of the remaining strokes.
    pub over_drag_ratio: f32,
    /// Over-drag rule: punishment per consumed stroke.
    pub over_drag_punishment_per_stroke: f32,
    /// A second stroke shorter than this fraction of the first goes unpunished.
    pub short_second_stroke_ratio: f32,
    /// Seconds one stroke takes to animate on screen.
    pub stroke_animation_secs: f32,
    /// Maximum number of bridge events per frame (default: 32).
    pub max_events: usize,
    /// Stroke animations one tick may finish (default: 10).
    pub max_strokes_per_tick: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_height: REFERENCE_HEIGHT,
            perfect_tolerance_deg: 30.0,
            reversal_band_deg: (170.0, 190.0),
            opposite_threshold_deg: 150.0,
            min_drag_ratio: 0.8,
            fallback_min_drag: 30.0,
            over_drag_min_strokes: 5,
            over_drag_ratio: 1.3,
            over_drag_punishment_per_stroke: 60.0,
            short_second_stroke_ratio: 0.5,
            stroke_animation_secs: 0.4,
            max_events: 32,
            max_strokes_per_tick: 10,
        }
    }
}

/// How the renderer fits the reference square into a square canvas.
/// The scale it produces converts data-space lengths into screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct CanvasLayout {
    /// Line width for characters with many strokes.
    pub thin_line_width: f32,
    /// Line width for everything else.
    pub line_width: f32,
    /// Characters with more strokes than this are drawn thin.
    pub thin_above_strokes: usize,
    /// Minimum padding as a fraction of the canvas size.
    pub padding_ratio: f32,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            thin_line_width: 18.0,
            line_width: 25.0,
            thin_above_strokes: 10,
            padding_ratio: 0.1,
        }
    }
}

impl CanvasLayout {
    /// Pixels per data unit for a canvas `canvas_size` px wide showing a
    /// `reference_height` tall data square.
    pub fn scale(&self, canvas_size: f32, total_strokes: usize, reference_height: f32) -> f32 {
        let line_width = if total_strokes > self.thin_above_strokes {
            self.thin_line_width
        } else {
            self.line_width
        };
        let padding = (line_width / 2.0 + 10.0).max(canvas_size * self.padding_ratio);
        let available = (canvas_size - padding * 2.0).max(0.0);
        if reference_height <= 0.0 {
            return 0.0;
        }
        available / reference_height
    }
}

/// Per-difficulty health tuning, as found in level configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySettings {
    /// Multiplier applied to HP deductions.
    pub punishment_multiplier: f32,
    /// HP restored by a perfect stroke.
    #[serde(rename = "perfectHPBonus")]
    pub perfect_hp_bonus: f32,
}

impl DifficultySettings {
    pub const EASY: Self = Self { punishment_multiplier: 1.0, perfect_hp_bonus: 1.0 };
    pub const MEDIUM: Self = Self { punishment_multiplier: 1.5, perfect_hp_bonus: 1.0 };
    pub const HARD: Self = Self { punishment_multiplier: 2.0, perfect_hp_bonus: 2.0 };

    /// Look up a preset by name ("easy", "medium", "hard").
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::EASY),
            "medium" => Some(Self::MEDIUM),
            "hard" => Some(Self::HARD),
            _ => None,
        }
    }
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self::EASY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_uses_ten_percent_padding_on_large_canvas() {
        let layout = CanvasLayout::default();
        // 1000 px canvas: padding = max(22.5, 100) = 100, available = 800
        let scale = layout.scale(1000.0, 5, REFERENCE_HEIGHT);
        assert!((scale - 800.0 / 900.0).abs() < 1e-6, "scale was {}", scale);
    }

    #[test]
    fn scale_uses_line_width_padding_on_small_canvas() {
        let layout = CanvasLayout::default();
        // 200 px canvas, thin lines: padding = max(19, 20) = 20
        let thin = layout.scale(200.0, 12, REFERENCE_HEIGHT);
        assert!((thin - 160.0 / 900.0).abs() < 1e-6);
        // 100 px canvas, thick lines: padding = max(22.5, 10) = 22.5
        let thick = layout.scale(100.0, 3, REFERENCE_HEIGHT);
        assert!((thick - 55.0 / 900.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_canvas_has_zero_scale() {
        assert_eq!(CanvasLayout::default().scale(10.0, 1, REFERENCE_HEIGHT), 0.0);
        assert_eq!(CanvasLayout::default().scale(1000.0, 1, 0.0), 0.0);
    }

    #[test]
    fn scale_follows_reference_height() {
        let layout = CanvasLayout::default();
        // 1000 px canvas leaves 800 px for a 400 unit tall data square
        let scale = layout.scale(1000.0, 5, 400.0);
        assert!((scale - 2.0).abs() < 1e-6, "scale was {}", scale);
    }

    #[test]
    fn difficulty_presets() {
        assert_eq!(DifficultySettings::preset("medium"), Some(DifficultySettings::MEDIUM));
        assert_eq!(DifficultySettings::preset("nightmare"), None);
        assert_eq!(DifficultySettings::default(), DifficultySettings::EASY);
    }

    #[test]
    fn difficulty_parses_level_config_shape() {
        let json = r#"{ "punishmentMultiplier": 1.5, "perfectHPBonus": 1 }"#;
        let d: DifficultySettings = serde_json::from_str(json).unwrap();
        assert_eq!(d, DifficultySettings::MEDIUM);
    }
}
