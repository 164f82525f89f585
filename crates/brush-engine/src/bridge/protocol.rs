//! Shared buffer layout read by the JavaScript side.
//! Must stay in sync with the TypeScript reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written once into the header at init.

use crate::api::config::EngineConfig;
use crate::api::types::BridgeEvent;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_EVENTS: usize = 2;
pub const HEADER_EVENT_COUNT: usize = 3;
pub const HEADER_CHARACTER_INDEX: usize = 4;
pub const HEADER_CHARACTER_COUNT: usize = 5;
pub const HEADER_STROKE_CURSOR: usize = 6;
pub const HEADER_TOTAL_STROKES: usize = 7;
pub const HEADER_HP: usize = 8;
pub const HEADER_MAX_HP: usize = 9;
pub const HEADER_PERFECT: usize = 10;
pub const HEADER_NOT_GOOD: usize = 11;
/// Controller state code: 0 idle, 1 awaiting gesture, 2 animating, 3 complete.
pub const HEADER_CONTROLLER_STATE: usize = 12;
/// 0 playing, 1 level complete, 2 game over.
pub const HEADER_LEVEL_STATE: usize = 13;
/// Pixels per data unit for the current canvas.
pub const HEADER_SCALE: usize = 14;
pub const HEADER_CANVAS_SIZE: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per event: kind, a, b, c (wire format; never changes).
pub const EVENT_FLOATS: usize = BridgeEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum events per frame.
    pub max_events: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,
    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_events: usize) -> Self {
        let event_data_floats = max_events * EVENT_FLOATS;
        let event_data_offset = HEADER_FLOATS;
        let buffer_total_floats = event_data_offset + event_data_floats;
        Self {
            max_events,
            event_data_floats,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_events)
    }

    /// Write `events` into the event section of `buffer`, truncated to
    /// capacity. Returns the number written.
    pub fn write_events(&self, buffer: &mut [f32], events: &[BridgeEvent]) -> usize {
        let count = events.len().min(self.max_events);
        let end = self.event_data_offset + count * EVENT_FLOATS;
        if buffer.len() < end {
            return 0;
        }
        let floats: &[f32] = bytemuck::cast_slice(&events[..count]);
        buffer[self.event_data_offset..end].copy_from_slice(floats);
        buffer[HEADER_EVENT_COUNT] = count as f32;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::event_kind;

    #[test]
    fn from_default_config() {
        let layout = ProtocolLayout::from_config(&EngineConfig::default());
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.event_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_floats, 32 * 4);
        assert_eq!(layout.buffer_total_floats, 16 + 128);
        assert_eq!(layout.buffer_total_bytes, (16 + 128) * 4);
    }

    #[test]
    fn header_indices_fit() {
        let indices = [
            HEADER_PROTOCOL_VERSION,
            HEADER_FRAME_COUNTER,
            HEADER_MAX_EVENTS,
            HEADER_EVENT_COUNT,
            HEADER_CHARACTER_INDEX,
            HEADER_CHARACTER_COUNT,
            HEADER_STROKE_CURSOR,
            HEADER_TOTAL_STROKES,
            HEADER_HP,
            HEADER_MAX_HP,
            HEADER_PERFECT,
            HEADER_NOT_GOOD,
            HEADER_CONTROLLER_STATE,
            HEADER_LEVEL_STATE,
            HEADER_SCALE,
            HEADER_CANVAS_SIZE,
        ];
        for (i, &idx) in indices.iter().enumerate() {
            assert_eq!(idx, i);
        }
    }

    #[test]
    fn events_are_truncated_to_capacity() {
        let layout = ProtocolLayout::new(2);
        let mut buffer = vec![0.0; layout.buffer_total_floats];
        let events = [
            BridgeEvent::new(event_kind::STROKE_SCORED, 1.0, 65.0, 0.0),
            BridgeEvent::new(event_kind::HP_CHANGED, 93.5, 100.0, 0.0),
            BridgeEvent::new(event_kind::GAME_OVER, 0.0, 0.0, 0.0),
        ];
        assert_eq!(layout.write_events(&mut buffer, &events), 2);
        assert_eq!(buffer[HEADER_EVENT_COUNT], 2.0);
        assert_eq!(&buffer[16..20], &[event_kind::STROKE_SCORED, 1.0, 65.0, 0.0]);
        assert_eq!(&buffer[20..24], &[event_kind::HP_CHANGED, 93.5, 100.0, 0.0]);
    }
}
