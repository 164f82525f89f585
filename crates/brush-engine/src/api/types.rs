use bytemuck::{Pod, Zeroable};

/// Numeric event kinds written into [`BridgeEvent::kind`].
/// The values are part of the wire format read by the JavaScript side.
pub mod event_kind {
    /// a = strokes consumed, b = punishment, c = 1.0 if perfect.
    pub const STROKE_SCORED: f32 = 1.0;
    /// a = stroke index that finished animating.
    pub const STROKE_ANIMATED: f32 = 2.0;
    /// a = current HP, b = max HP.
    pub const HP_CHANGED: f32 = 3.0;
    /// a = index of the completed character within the level.
    pub const CHARACTER_COMPLETE: f32 = 4.0;
    /// a = level score (percent), b = accuracy (percent), c = HP (percent).
    pub const LEVEL_COMPLETE: f32 = 5.0;
    pub const GAME_OVER: f32 = 6.0;
    /// a = index of the newly loaded character, b = its stroke count.
    pub const CHARACTER_STARTED: f32 = 7.0;
}

/// An event communicated from Rust to JavaScript as four floats.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BridgeEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl BridgeEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_is_four_floats_on_the_wire() {
        assert_eq!(std::mem::size_of::<BridgeEvent>(), BridgeEvent::FLOATS * 4);
        let events = [
            BridgeEvent::new(event_kind::STROKE_SCORED, 2.0, 65.0, 0.0),
            BridgeEvent::new(event_kind::GAME_OVER, 0.0, 0.0, 0.0),
        ];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[1.0, 2.0, 65.0, 0.0, 6.0, 0.0, 0.0, 0.0]);
    }
}
