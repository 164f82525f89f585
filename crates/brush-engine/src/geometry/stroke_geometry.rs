use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::polyline::{angle_of, farthest_from, path_length, to_screen};

/// Derived geometry of one reference stroke.
///
/// `start` and `end` stay in data space (as authored). `direction` and
/// `angle` are computed in screen space so they compare directly against
/// drag input, which arrives with y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeGeometry {
    /// First point of the stroke (data space).
    pub start: Vec2,
    /// Point farthest from `start` (data space).
    pub end: Vec2,
    /// `end - start` after conversion to screen space.
    pub direction: Vec2,
    /// `atan2(direction.y, direction.x)` in radians.
    pub angle: f32,
    /// Polyline length over every point (data units).
    pub length: f32,
}

impl StrokeGeometry {
    /// Compute geometry for a canonical point sequence.
    /// Needs at least two points; anything shorter has no direction.
    pub fn compute(points: &[Vec2], reference_height: f32) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let start = points[0];
        let end = farthest_from(start, points);
        let direction = to_screen(end, reference_height) - to_screen(start, reference_height);
        Some(Self {
            start,
            end,
            direction,
            angle: angle_of(direction),
            length: path_length(points),
        })
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }

    /// Straight-line distance from start to end.
    pub fn chord(&self) -> f32 {
        self.direction.length()
    }

    /// Direction canonicalization used when baking stroke tables offline:
    /// start and end swap when the end sits closer to the screen origin
    /// (smaller `x + y` in screen space). Runtime scoring never applies this.
    pub fn canonicalized(&self, reference_height: f32) -> Self {
        let s = to_screen(self.start, reference_height);
        let e = to_screen(self.end, reference_height);
        if e.x + e.y >= s.x + s.y {
            return *self;
        }
        let direction = s - e;
        Self {
            start: self.end,
            end: self.start,
            direction,
            angle: angle_of(direction),
            length: self.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 900.0;

    #[test]
    fn horizontal_stroke_in_data_space() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)];
        let g = StrokeGeometry::compute(&pts, H).unwrap();
        assert_eq!(to_screen(g.start, H), Vec2::new(0.0, 900.0));
        assert_eq!(to_screen(g.end, H), Vec2::new(100.0, 900.0));
        assert_eq!(g.angle_degrees(), 0.0);
        assert_eq!(g.length, 100.0);
    }

    #[test]
    fn upward_data_stroke_points_up_on_screen() {
        // y grows upward in data space, so on screen the stroke heads to -90°.
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 50.0)];
        let g = StrokeGeometry::compute(&pts, H).unwrap();
        assert!((g.angle_degrees() + 90.0).abs() < 1e-4);
    }

    #[test]
    fn fewer_than_two_points_has_no_geometry() {
        assert!(StrokeGeometry::compute(&[], H).is_none());
        assert!(StrokeGeometry::compute(&[Vec2::ONE], H).is_none());
    }

    #[test]
    fn coincident_points_fall_back_to_zero_angle() {
        let g = StrokeGeometry::compute(&[Vec2::ONE, Vec2::ONE, Vec2::ONE], H).unwrap();
        assert_eq!(g.angle, 0.0);
        assert_eq!(g.length, 0.0);
        assert_eq!(g.start, g.end);
    }

    #[test]
    fn length_dominates_chord() {
        let shapes: [&[Vec2]; 4] = [
            &[Vec2::ZERO, Vec2::new(10.0, 0.0)],
            &[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            &[Vec2::new(5.0, 5.0), Vec2::new(300.0, 40.0), Vec2::new(250.0, 60.0), Vec2::new(20.0, 400.0)],
            &[Vec2::ZERO, Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0)],
        ];
        for pts in shapes {
            let g = StrokeGeometry::compute(pts, H).unwrap();
            assert!(g.length + 1e-3 >= g.chord(), "length {} < chord {}", g.length, g.chord());
        }
        // A single straight segment: equality.
        let g = StrokeGeometry::compute(shapes[0], H).unwrap();
        assert_eq!(g.length, g.chord());
    }

    #[test]
    fn canonicalization_swaps_strokes_heading_to_origin() {
        // Screen: from (100, 100) to (10, 10), i.e. toward top-left.
        let pts = [Vec2::new(100.0, 800.0), Vec2::new(10.0, 890.0)];
        let g = StrokeGeometry::compute(&pts, H).unwrap();
        let c = g.canonicalized(H);
        assert_eq!(c.start, g.end);
        assert_eq!(c.end, g.start);
        assert_eq!(c.direction, -g.direction);
        assert_eq!(c.length, g.length);

        // Already heading away from the origin: unchanged.
        assert_eq!(c.canonicalized(H), c);
    }
}
