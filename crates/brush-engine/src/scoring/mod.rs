//! Judging one drag against the character's reference strokes:
//! how many strokes it covers, how well its direction matches, and the
//! resulting punishment.

pub mod penalty;
pub mod score;
pub mod segment;

pub use penalty::punishment;
pub use score::{score, wrapped_difference, Classification, StrokeScore};
pub use segment::{minimum_drag, segment};
