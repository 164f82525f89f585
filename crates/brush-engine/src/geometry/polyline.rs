//! Polyline helpers shared by reference strokes and drag gestures.

use glam::Vec2;

/// Flip a data-space point (origin bottom-left, y up) into screen space
/// (origin top-left, y down) against the fixed reference height.
pub fn to_screen(p: Vec2, reference_height: f32) -> Vec2 {
    Vec2::new(p.x, reference_height - p.y)
}

/// Sum of segment lengths walking the points in order.
/// Fewer than two points have zero length.
pub fn path_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// The point farthest from `origin`. Ties keep the earliest point.
/// Returns `origin` itself when no point is strictly farther away.
pub fn farthest_from(origin: Vec2, points: &[Vec2]) -> Vec2 {
    let mut best = origin;
    let mut best_dist = 0.0;
    for &p in points {
        let d = origin.distance(p);
        if d > best_dist {
            best_dist = d;
            best = p;
        }
    }
    best
}

/// Radians in (-π, π] of the vector `dir`, measured with `atan2(y, x)`.
/// A zero vector has angle 0.
pub fn angle_of(dir: Vec2) -> f32 {
    if dir.x == 0.0 && dir.y == 0.0 {
        return 0.0;
    }
    dir.y.atan2(dir.x)
}
