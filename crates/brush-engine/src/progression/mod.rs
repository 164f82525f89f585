pub mod controller;
pub mod health;
pub mod session;

pub use controller::{
    ControllerState, GestureOutcome, IgnoreReason, Progress, ProgressionController, StrokeTally,
    StrokeVerdict,
};
pub use health::{HealthSink, HpPool};
pub use session::{LevelScore, Session, SessionEvent, SessionSnapshot};
