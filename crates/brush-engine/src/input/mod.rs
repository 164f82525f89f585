pub mod gesture;
pub mod queue;

pub use gesture::{DragGesture, GestureRecorder};
pub use queue::{InputEvent, InputQueue};
