//! Press-move-release recording.
//!
//! A gesture lives from pointer-down to pointer-up (or cancel). Samples are
//! kept at whatever density the platform delivers; nothing is smoothed.

use glam::Vec2;

use super::queue::InputEvent;
use crate::geometry::path_length;

/// One completed drag, in screen pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragGesture {
    pub points: Vec<Vec2>,
}

impl DragGesture {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Actual path length, not displacement.
    pub fn total_distance(&self) -> f32 {
        path_length(&self.points)
    }

    /// Direction of the net displacement from the first to the last sample,
    /// in degrees. `None` with fewer than two samples.
    pub fn net_angle_degrees(&self) -> Option<f32> {
        match (self.points.first(), self.points.last()) {
            (Some(&a), Some(&b)) if self.points.len() >= 2 => {
                let d = b - a;
                Some(d.y.atan2(d.x).to_degrees())
            }
            _ => None,
        }
    }
}

/// Turns a stream of [`InputEvent`]s into completed [`DragGesture`]s.
#[derive(Debug, Default)]
pub struct GestureRecorder {
    active: Option<Vec<Vec2>>,
}

impl GestureRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Feed one event. Returns the gesture when this event completes one.
    pub fn feed(&mut self, event: InputEvent) -> Option<DragGesture> {
        match event {
            InputEvent::PointerDown { x, y } => {
                if self.active.is_some() {
                    log::debug!("gesture: pointer down while recording, restarting");
                }
                self.active = Some(vec![Vec2::new(x, y)]);
                None
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(points) = self.active.as_mut() {
                    points.push(Vec2::new(x, y));
                }
                None
            }
            InputEvent::PointerUp { x, y } | InputEvent::PointerCancel { x, y } => {
                let mut points = self.active.take()?;
                let end = Vec2::new(x, y);
                if points.last() != Some(&end) {
                    points.push(end);
                }
                Some(DragGesture::new(points))
            }
        }
    }

    /// Abandon any gesture in progress.
    pub fn reset(&mut self) {
        self.active = None;
    }
}
