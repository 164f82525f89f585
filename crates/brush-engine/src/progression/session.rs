//! Level progression: the characters of one level, drawn in order, with a
//! shared health pool and tally.

use serde::{Deserialize, Serialize};

use super::controller::{
    ControllerState, GestureOutcome, IgnoreReason, Progress, ProgressionController, StrokeTally,
};
use super::health::HpPool;
use crate::api::config::{CanvasLayout, DifficultySettings, EngineConfig};
use crate::api::types::{event_kind, BridgeEvent};
use crate::input::gesture::DragGesture;
use crate::strokes::library::StrokeLibrary;

pub const DEFAULT_MAX_HP: f32 = 100.0;

/// Result of a finished level. Percentages in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelScore {
    pub score: f32,
    pub accuracy: f32,
    pub hp_percent: f32,
    pub tally: StrokeTally,
}

impl LevelScore {
    /// `accuracy × hp%`. All zero when nothing was scored.
    pub fn compute(tally: StrokeTally, hp_percent: f32) -> Self {
        if tally.total() == 0 {
            return Self::default();
        }
        let accuracy = tally.perfect as f32 / tally.total() as f32 * 100.0;
        Self {
            score: accuracy / 100.0 * hp_percent,
            accuracy,
            hp_percent,
            tally,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    CharacterStarted { index: usize, strokes: usize },
    StrokeScored { strokes: usize, punishment: f32, perfect: bool },
    StrokeAnimated { stroke: usize },
    HpChanged { hp: f32, max_hp: f32 },
    CharacterComplete { index: usize },
    LevelComplete(LevelScore),
    GameOver,
}

impl SessionEvent {
    pub fn to_bridge(&self) -> BridgeEvent {
        match *self {
            Self::CharacterStarted { index, strokes } => {
                BridgeEvent::new(event_kind::CHARACTER_STARTED, index as f32, strokes as f32, 0.0)
            }
            Self::StrokeScored { strokes, punishment, perfect } => BridgeEvent::new(
                event_kind::STROKE_SCORED,
                strokes as f32,
                punishment,
                if perfect { 1.0 } else { 0.0 },
            ),
            Self::StrokeAnimated { stroke } => {
                BridgeEvent::new(event_kind::STROKE_ANIMATED, stroke as f32, 0.0, 0.0)
            }
            Self::HpChanged { hp, max_hp } => BridgeEvent::new(event_kind::HP_CHANGED, hp, max_hp, 0.0),
            Self::CharacterComplete { index } => {
                BridgeEvent::new(event_kind::CHARACTER_COMPLETE, index as f32, 0.0, 0.0)
            }
            Self::LevelComplete(s) => {
                BridgeEvent::new(event_kind::LEVEL_COMPLETE, s.score, s.accuracy, s.hp_percent)
            }
            Self::GameOver => BridgeEvent::new(event_kind::GAME_OVER, 0.0, 0.0, 0.0),
        }
    }
}

/// Flat save state for a level in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub characters: String,
    pub character_index: usize,
    pub stroke_index: usize,
    pub hp: f32,
    pub max_hp: f32,
    pub perfect: u32,
    pub not_good: u32,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub struct Session {
    library: StrokeLibrary,
    controller: ProgressionController,
    hp: HpPool,
    layout: CanvasLayout,
    canvas_size: f32,
    characters: Vec<String>,
    index: usize,
    /// Tally of characters already completed this level.
    level_tally: StrokeTally,
    events: Vec<SessionEvent>,
    game_over: bool,
    level_complete: bool,
}

impl Session {
    pub fn new(library: StrokeLibrary, config: EngineConfig, difficulty: DifficultySettings) -> Self {
        Self {
            library,
            controller: ProgressionController::new(config),
            hp: HpPool::new(DEFAULT_MAX_HP, difficulty),
            layout: CanvasLayout::default(),
            canvas_size: 0.0,
            characters: Vec::new(),
            index: 0,
            level_tally: StrokeTally::default(),
            events: Vec::new(),
            game_over: false,
            level_complete: false,
        }
    }

    /// Begin a level drawing the characters of `text` in order.
    /// Whitespace is ignored; HP is refilled.
    pub fn start_level(&mut self, text: &str) {
        self.characters = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect();
        self.level_tally = StrokeTally::default();
        self.game_over = false;
        self.level_complete = false;
        self.hp.refill();
        self.events.clear();
        log::info!("session: level of {} characters", self.characters.len());
        self.enter_character(0, 0);
    }

    pub fn set_canvas_size(&mut self, size: f32) {
        self.canvas_size = size.max(0.0);
    }

    pub fn set_layout(&mut self, layout: CanvasLayout) {
        self.layout = layout;
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultySettings) {
        self.hp.set_difficulty(difficulty);
    }

    /// Pixels per data unit for the character on screen.
    pub fn scale(&self) -> f32 {
        let reference_height = self.controller.config().reference_height;
        self.layout.scale(self.canvas_size, self.controller.total_strokes(), reference_height)
    }

    pub fn handle_gesture(&mut self, drag: &DragGesture) -> GestureOutcome {
        if self.game_over {
            return GestureOutcome::Ignored(IgnoreReason::GameOver);
        }
        let scale = self.scale();
        let hp_before = self.hp.hp();
        let outcome = self.controller.handle_gesture(drag, scale, &mut self.hp);
        let GestureOutcome::Scored(verdict) = outcome else {
            return outcome;
        };

        self.events.push(SessionEvent::StrokeScored {
            strokes: verdict.strokes_consumed,
            punishment: verdict.punishment,
            perfect: verdict.perfect(),
        });
        if self.hp.hp() != hp_before {
            self.events.push(SessionEvent::HpChanged {
                hp: self.hp.hp(),
                max_hp: self.hp.max_hp(),
            });
        }
        if self.hp.is_depleted() {
            log::info!("session: game over at character {}", self.index);
            self.game_over = true;
            self.events.push(SessionEvent::GameOver);
        }
        outcome
    }

    /// Advance stroke animations by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let progress = self.controller.tick(dt);
        self.apply_progress(progress);
    }

    /// The renderer finished animating the current stroke.
    pub fn finish_stroke(&mut self) {
        let progress = self.controller.finish_stroke();
        self.apply_progress(progress);
    }

    fn apply_progress(&mut self, progress: Vec<Progress>) {
        for p in progress {
            match p {
                Progress::StrokeAnimated(stroke) => {
                    self.events.push(SessionEvent::StrokeAnimated { stroke });
                }
                Progress::CharacterComplete => self.complete_character(),
            }
        }
    }

    fn complete_character(&mut self) {
        log::info!("session: character {} complete", self.index);
        self.level_tally.add(self.controller.tally());
        self.events.push(SessionEvent::CharacterComplete { index: self.index });
        if self.game_over {
            return;
        }
        self.enter_character(self.index + 1, 0);
    }

    /// Load the first drawable character at or after `index`, resuming at
    /// `stroke`. Unknown and stroke-less characters are skipped, as is a
    /// character resumed with every stroke already drawn.
    fn enter_character(&mut self, index: usize, stroke: usize) {
        let mut index = index;
        let mut stroke = stroke;
        while let Some(ch) = self.characters.get(index) {
            match self.library.model(ch) {
                Some(model) if model.total_strokes() > 0 && stroke >= model.total_strokes() => {
                    log::info!("session: {} already drawn, moving on", ch);
                    stroke = 0;
                }
                Some(model) if model.total_strokes() > 0 => {
                    self.index = index;
                    let strokes = model.total_strokes();
                    if stroke == 0 {
                        self.controller.load_character(model);
                    } else {
                        self.controller.resume_character(model, stroke);
                    }
                    self.events.push(SessionEvent::CharacterStarted { index, strokes });
                    return;
                }
                Some(_) => {
                    log::warn!("session: {} has no strokes, skipping", ch);
                    stroke = 0;
                }
                None => {
                    log::warn!("session: no stroke data for {}, skipping", ch);
                    stroke = 0;
                }
            }
            index += 1;
        }
        self.index = index.min(self.characters.len());
        self.controller.unload();
        self.level_complete = true;
        let score = self.level_score();
        log::info!(
            "session: level complete, score {:.1} (accuracy {:.1}%, hp {:.1}%)",
            score.score,
            score.accuracy,
            score.hp_percent
        );
        self.events.push(SessionEvent::LevelComplete(score));
    }

    /// Score over everything judged so far this level.
    pub fn level_score(&self) -> LevelScore {
        LevelScore::compute(self.tally(), self.hp.percent())
    }

    /// Level tally including the character in progress.
    pub fn tally(&self) -> StrokeTally {
        let mut tally = self.level_tally;
        if !self.level_complete {
            tally.add(self.controller.tally());
        }
        tally
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tally = self.tally();
        SessionSnapshot {
            characters: self.characters.concat(),
            character_index: self.index,
            stroke_index: self.controller.cursor(),
            hp: self.hp.hp(),
            max_hp: self.hp.max_hp(),
            perfect: tally.perfect,
            not_good: tally.not_good,
        }
    }

    /// Resume a level from a snapshot. In-flight animation is discarded.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.start_level(&snapshot.characters);
        self.events.clear();
        self.hp = HpPool::new(snapshot.max_hp, self.hp.difficulty());
        self.hp.set_hp(snapshot.hp);
        self.level_tally = StrokeTally {
            perfect: snapshot.perfect,
            not_good: snapshot.not_good,
        };
        self.level_complete = false;
        self.enter_character(snapshot.character_index, snapshot.stroke_index);
        self.game_over = self.hp.is_depleted();
    }

    pub fn controller(&self) -> &ProgressionController {
        &self.controller
    }

    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn hp(&self) -> &HpPool {
        &self.hp
    }

    pub fn library(&self) -> &StrokeLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut StrokeLibrary {
        &mut self.library
    }

    pub fn canvas_size(&self) -> f32 {
        self.canvas_size
    }

    /// The level's characters in drawing order.
    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    pub fn character_index(&self) -> usize {
        self.index
    }

    pub fn current_character(&self) -> Option<&str> {
        self.controller.model().map(|m| m.character())
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }
}
