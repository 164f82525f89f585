use brush_engine::bridge::protocol::*;
use brush_engine::{
    BridgeEvent, DifficultySettings, EngineConfig, GestureRecorder, InputEvent, InputQueue,
    ProtocolLayout, RawCharacter, Session, SessionSnapshot, StrokeLibrary,
};

/// Wires a [`Session`] to the browser.
///
/// Lives in a `thread_local!` in `lib.rs`; pointer events are queued as they
/// arrive and consumed on the next tick, after which the shared buffer holds
/// the header and that frame's events.
pub struct SessionRunner {
    session: Session,
    input: InputQueue,
    recorder: GestureRecorder,
    layout: ProtocolLayout,
    /// Header followed by the event section, read by JavaScript.
    buffer: Vec<f32>,
    /// Events that did not fit in the last frame's event section.
    pending: Vec<BridgeEvent>,
    frame: u32,
}

impl SessionRunner {
    pub fn new(session: Session, config: &EngineConfig) -> Self {
        let layout = ProtocolLayout::from_config(config);
        let buffer = vec![0.0; layout.buffer_total_floats];
        let mut runner = Self {
            session,
            input: InputQueue::new(),
            recorder: GestureRecorder::new(),
            layout,
            buffer,
            pending: Vec::new(),
            frame: 0,
        };
        runner.write_header();
        runner
    }

    /// Build from a stroke table and a level's characters.
    /// Unknown difficulty names fall back to easy.
    pub fn from_json(
        strokes_json: &str,
        characters: &str,
        difficulty: &str,
    ) -> Result<Self, serde_json::Error> {
        let config = EngineConfig::default();
        let library = StrokeLibrary::from_json(strokes_json, config.reference_height)?;
        let missing = library.missing(characters);
        if !missing.is_empty() {
            log::warn!("runner: no stroke data for {}", missing.concat());
        }
        let difficulty = DifficultySettings::preset(difficulty).unwrap_or_else(|| {
            log::warn!("runner: unknown difficulty '{}', using easy", difficulty);
            DifficultySettings::EASY
        });
        let mut session = Session::new(library, config.clone(), difficulty);
        session.start_level(characters);
        Ok(Self::new(session, &config))
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn set_canvas_size(&mut self, size: f32) {
        self.session.set_canvas_size(size);
        self.write_header();
    }

    pub fn start_level(&mut self, characters: &str) {
        self.recorder.reset();
        self.input.drain();
        self.pending.clear();
        self.session.start_level(characters);
        self.write_header();
    }

    /// Consume queued input, advance animations, then publish this frame.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            if let Some(drag) = self.recorder.feed(event) {
                self.session.handle_gesture(&drag);
            }
        }
        self.session.tick(dt);
        self.publish();
    }

    /// The renderer finished the stroke it was animating.
    pub fn animation_done(&mut self) {
        self.session.finish_stroke();
        self.publish();
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        self.session.snapshot().to_json()
    }

    pub fn restore_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let snapshot = SessionSnapshot::from_json(json)?;
        self.recorder.reset();
        self.input.drain();
        self.pending.clear();
        self.session.restore(&snapshot);
        self.write_header();
        Ok(())
    }

    /// A fully precomputed stroke-table entry for `character`.
    pub fn bake_character(&mut self, character: &str) -> Option<RawCharacter> {
        self.session.library_mut().bake_character(character)
    }

    pub fn missing_characters(&self, characters: &str) -> Vec<String> {
        self.session.library().missing(characters)
    }

    /// Write this frame's events, oldest first. Whatever does not fit waits
    /// for the next frame.
    fn publish(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        let drained = self.session.drain_events();
        self.pending.extend(drained.iter().map(|e| e.to_bridge()));
        let written = self.layout.write_events(&mut self.buffer, &self.pending);
        self.pending.drain(..written);
        if !self.pending.is_empty() {
            log::debug!("runner: {} events deferred to next frame", self.pending.len());
        }
        self.write_header();
        self.buffer[HEADER_EVENT_COUNT] = written as f32;
    }

    fn write_header(&mut self) {
        let s = &self.session;
        let controller = s.controller();
        let tally = s.tally();
        let level_state = if s.is_game_over() {
            2.0
        } else if s.is_level_complete() {
            1.0
        } else {
            0.0
        };
        let h = &mut self.buffer;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_FRAME_COUNTER] = self.frame as f32;
        h[HEADER_MAX_EVENTS] = self.layout.max_events as f32;
        h[HEADER_CHARACTER_INDEX] = s.character_index() as f32;
        h[HEADER_CHARACTER_COUNT] = s.characters().len() as f32;
        h[HEADER_STROKE_CURSOR] = controller.cursor() as f32;
        h[HEADER_TOTAL_STROKES] = controller.total_strokes() as f32;
        h[HEADER_HP] = s.hp().hp();
        h[HEADER_MAX_HP] = s.hp().max_hp();
        h[HEADER_PERFECT] = tally.perfect as f32;
        h[HEADER_NOT_GOOD] = tally.not_good as f32;
        h[HEADER_CONTROLLER_STATE] = controller.state().code();
        h[HEADER_LEVEL_STATE] = level_state;
        h[HEADER_SCALE] = s.scale();
        h[HEADER_CANVAS_SIZE] = s.canvas_size();
    }

    // ---- Accessors for JavaScript reads ----

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn event_data_offset(&self) -> u32 {
        self.layout.event_data_offset as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn event_count(&self) -> u32 {
        self.buffer[HEADER_EVENT_COUNT] as u32
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
