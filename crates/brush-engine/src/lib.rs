pub mod api;
pub mod bridge;
pub mod geometry;
pub mod input;
pub mod progression;
pub mod scoring;
pub mod strokes;

// Re-export key types at crate root for convenience
pub use api::config::{CanvasLayout, DifficultySettings, EngineConfig, REFERENCE_HEIGHT};
pub use api::types::{event_kind, BridgeEvent};
pub use bridge::protocol::ProtocolLayout;
pub use geometry::StrokeGeometry;
pub use input::{DragGesture, GestureRecorder, InputEvent, InputQueue};
pub use progression::{
    ControllerState, GestureOutcome, HealthSink, HpPool, IgnoreReason, LevelScore,
    ProgressionController, Session, SessionEvent, SessionSnapshot, StrokeTally, StrokeVerdict,
};
pub use scoring::{Classification, StrokeScore};
pub use strokes::{CharacterStrokeModel, PointSource, RawCharacter, RawStroke, Stroke, StrokeLibrary};
