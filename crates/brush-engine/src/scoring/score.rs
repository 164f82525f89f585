use serde::Serialize;

use crate::api::config::EngineConfig;
use crate::input::gesture::DragGesture;
use crate::strokes::model::CharacterStrokeModel;

/// How a drag's direction relates to the targeted reference stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Within tolerance of the reference direction, or a clean reversal.
    Perfect { reversed: bool },
    Mismatch,
    /// The drag or the stroke has no direction. Never punished.
    Unscoreable,
}

/// Result of comparing one drag with one reference stroke. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeScore {
    pub classification: Classification,
    pub user_angle: Option<f32>,
    pub reference_angle: Option<f32>,
    /// `|user - reference|`, unwrapped, in [0, 360).
    pub raw_diff: f32,
    /// `raw_diff` folded into [0, 180].
    pub wrapped_diff: f32,
    /// Error carried into punishment: zero for reversals and unscoreable
    /// strokes, `wrapped_diff` otherwise.
    pub angle_error: f32,
}

impl StrokeScore {
    fn unscoreable(user_angle: Option<f32>, reference_angle: Option<f32>) -> Self {
        Self {
            classification: Classification::Unscoreable,
            user_angle,
            reference_angle,
            raw_diff: 0.0,
            wrapped_diff: 0.0,
            angle_error: 0.0,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self.classification, Classification::Perfect { .. })
    }
}

/// Smallest angle between two directions given in degrees.
pub fn wrapped_difference(a: f32, b: f32) -> f32 {
    let raw = (a - b).abs();
    if raw > 180.0 {
        360.0 - raw
    } else {
        raw
    }
}

/// Compare the drag's net direction (first to last sample) with the
/// reference angle of stroke `stroke_index`.
pub fn score(
    drag: &DragGesture,
    stroke_index: usize,
    model: &CharacterStrokeModel,
    config: &EngineConfig,
) -> StrokeScore {
    let user = drag.net_angle_degrees();
    let reference = model.stroke(stroke_index).and_then(|s| s.angle_degrees());
    let (Some(user_angle), Some(reference_angle)) = (user, reference) else {
        return StrokeScore::unscoreable(user, reference);
    };

    let raw_diff = (user_angle - reference_angle).abs();
    let wrapped_diff = wrapped_difference(user_angle, reference_angle);
    let (lo, hi) = config.reversal_band_deg;
    let reversed = raw_diff >= lo && raw_diff <= hi;

    let (classification, angle_error) = if reversed {
        (Classification::Perfect { reversed: true }, 0.0)
    } else if wrapped_diff <= config.perfect_tolerance_deg {
        (Classification::Perfect { reversed: false }, wrapped_diff)
    } else {
        (Classification::Mismatch, wrapped_diff)
    };

    StrokeScore {
        classification,
        user_angle: Some(user_angle),
        reference_angle: Some(reference_angle),
        raw_diff,
        wrapped_diff,
        angle_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::REFERENCE_HEIGHT as H;
    use crate::strokes::source::{RawCharacter, RawPoint, RawStroke};
    use glam::Vec2;

    fn horizontal() -> CharacterStrokeModel {
        let stroke = RawStroke {
            medians: Some(vec![RawPoint::Pair([0.0, 0.0]), RawPoint::Pair([100.0, 0.0])]),
            ..RawStroke::default()
        };
        CharacterStrokeModel::build(RawCharacter::from_strokes("一", vec![stroke]), H)
    }

    fn drag_at(degrees: f32) -> DragGesture {
        let r = degrees.to_radians();
        let start = Vec2::new(0.0, 900.0);
        DragGesture::new(vec![start, start + Vec2::new(r.cos(), r.sin()) * 100.0])
    }

    #[test]
    fn matching_drag_is_perfect() {
        let m = horizontal();
        let drag = DragGesture::new(vec![Vec2::new(0.0, 900.0), Vec2::new(100.0, 900.0)]);
        let s = score(&drag, 0, &m, &EngineConfig::default());
        assert_eq!(s.classification, Classification::Perfect { reversed: false });
        assert_eq!(s.angle_error, 0.0);
    }

    #[test]
    fn ninety_five_degrees_is_a_mismatch() {
        let s = score(&drag_at(95.0), 0, &horizontal(), &EngineConfig::default());
        assert_eq!(s.classification, Classification::Mismatch);
        assert!((s.wrapped_diff - 95.0).abs() < 1e-3);
        assert!((s.angle_error - 95.0).abs() < 1e-3);
    }

    #[test]
    fn reversal_within_five_degrees_is_perfect() {
        let m = horizontal();
        let cfg = EngineConfig::default();
        for offset in [-5.0f32, -2.5, 0.0, 2.5, 5.0] {
            let s = score(&drag_at(180.0 + offset), 0, &m, &cfg);
            assert_eq!(
                s.classification,
                Classification::Perfect { reversed: true },
                "offset {}",
                offset
            );
            assert_eq!(s.angle_error, 0.0);
        }
    }

    #[test]
    fn wrapped_difference_is_symmetric() {
        let angles = [-179.0f32, -120.0, -45.0, 0.0, 10.0, 90.0, 135.0, 179.5];
        for &a in &angles {
            for &b in &angles {
                assert_eq!(wrapped_difference(a, b), wrapped_difference(b, a));
                assert!(wrapped_difference(a, b) <= 180.0);
            }
        }
        assert_eq!(wrapped_difference(-179.0, 179.0), 2.0);
    }

    #[test]
    fn short_drag_is_unscoreable() {
        let drag = DragGesture::new(vec![Vec2::new(3.0, 4.0)]);
        let s = score(&drag, 0, &horizontal(), &EngineConfig::default());
        assert_eq!(s.classification, Classification::Unscoreable);
        assert_eq!(s.angle_error, 0.0);
    }

    #[test]
    fn missing_stroke_is_unscoreable() {
        let s = score(&drag_at(0.0), 7, &horizontal(), &EngineConfig::default());
        assert_eq!(s.classification, Classification::Unscoreable);
        assert!(s.user_angle.is_some());
        assert!(s.reference_angle.is_none());
    }
}
