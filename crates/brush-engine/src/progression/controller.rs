//! Per-character stroke progression.
//!
//! Idle → AwaitingGesture → Animating → AwaitingGesture … → CharacterComplete.
//! One gesture is judged at a time: the cursor advances by the number of
//! strokes the gesture covered, then each covered stroke animates in turn.
//! Gestures arriving mid-animation are dropped, not queued.

use std::rc::Rc;

use serde::Serialize;

use super::health::HealthSink;
use crate::api::config::EngineConfig;
use crate::input::gesture::DragGesture;
use crate::scoring::{punishment, score, segment, Classification, StrokeScore};
use crate::strokes::model::CharacterStrokeModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerState {
    /// No character loaded.
    Idle,
    AwaitingGesture,
    /// Strokes `next..end` still have to finish animating.
    Animating { next: usize, end: usize, elapsed: f32 },
    CharacterComplete,
}

impl ControllerState {
    /// Numeric code written into the bridge header.
    pub fn code(&self) -> f32 {
        match self {
            Self::Idle => 0.0,
            Self::AwaitingGesture => 1.0,
            Self::Animating { .. } => 2.0,
            Self::CharacterComplete => 3.0,
        }
    }
}

/// Why a gesture was not judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NoCharacter,
    Animating,
    CharacterComplete,
    /// Shorter than the minimum drag for the targeted stroke.
    BelowMinimum,
    GameOver,
}

/// The judgement of one accepted gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeVerdict {
    /// Cursor before the gesture.
    pub first_stroke: usize,
    pub strokes_consumed: usize,
    pub score: StrokeScore,
    pub punishment: f32,
    /// HP the health sink actually removed.
    pub hp_deducted: f32,
}

impl StrokeVerdict {
    pub fn perfect(&self) -> bool {
        self.score.is_perfect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Ignored(IgnoreReason),
    Scored(StrokeVerdict),
}

/// What happened while animations advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    StrokeAnimated(usize),
    CharacterComplete,
}

/// Perfect and not-good gesture counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrokeTally {
    pub perfect: u32,
    pub not_good: u32,
}

impl StrokeTally {
    pub fn total(&self) -> u32 {
        self.perfect + self.not_good
    }

    pub fn add(&mut self, other: StrokeTally) {
        self.perfect += other.perfect;
        self.not_good += other.not_good;
    }
}

/// Owns the stroke cursor and counters for the character in progress.
pub struct ProgressionController {
    config: EngineConfig,
    model: Option<Rc<CharacterStrokeModel>>,
    cursor: usize,
    state: ControllerState,
    tally: StrokeTally,
}

impl ProgressionController {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            model: None,
            cursor: 0,
            state: ControllerState::Idle,
            tally: StrokeTally::default(),
        }
    }

    /// Start a character from its first stroke. Any animation in flight is
    /// abandoned and the counters reset.
    pub fn load_character(&mut self, model: Rc<CharacterStrokeModel>) {
        self.resume_character(model, 0);
        self.tally = StrokeTally::default();
    }

    /// Start a character at `cursor` (clamped), keeping the counters.
    pub fn resume_character(&mut self, model: Rc<CharacterStrokeModel>, cursor: usize) {
        let total = model.total_strokes();
        self.cursor = cursor.min(total);
        self.state = if self.cursor >= total {
            ControllerState::CharacterComplete
        } else {
            ControllerState::AwaitingGesture
        };
        log::debug!(
            "progression: {} at stroke {}/{}",
            model.character(),
            self.cursor,
            total
        );
        self.model = Some(model);
    }

    /// Drop the current character.
    pub fn unload(&mut self) {
        self.model = None;
        self.cursor = 0;
        self.state = ControllerState::Idle;
    }

    /// Judge one completed drag. `scale` converts reference lengths to
    /// screen pixels for the current canvas.
    pub fn handle_gesture(
        &mut self,
        drag: &DragGesture,
        scale: f32,
        health: &mut dyn HealthSink,
    ) -> GestureOutcome {
        let model = match (&self.state, &self.model) {
            (ControllerState::AwaitingGesture, Some(model)) => Rc::clone(model),
            (ControllerState::Animating { .. }, _) => {
                return GestureOutcome::Ignored(IgnoreReason::Animating)
            }
            (ControllerState::CharacterComplete, _) => {
                return GestureOutcome::Ignored(IgnoreReason::CharacterComplete)
            }
            _ => return GestureOutcome::Ignored(IgnoreReason::NoCharacter),
        };

        let first = self.cursor;
        let consumed = segment(drag, &model, first, scale, &self.config);
        if consumed == 0 {
            return GestureOutcome::Ignored(IgnoreReason::BelowMinimum);
        }

        let score = score(drag, first, &model, &self.config);
        match score.classification {
            Classification::Perfect { .. } => {
                self.tally.perfect += 1;
                health.on_perfect();
            }
            Classification::Mismatch => self.tally.not_good += 1,
            Classification::Unscoreable => {
                log::debug!("progression: stroke {} unscoreable", first);
            }
        }

        let distance = drag.total_distance();
        let punishment = punishment(&score, consumed, first, distance, &model, scale, &self.config);
        let hp_deducted = if punishment > 0.0 {
            health.on_punishment(punishment)
        } else {
            0.0
        };

        self.cursor = (first + consumed).min(model.total_strokes());
        self.state = ControllerState::Animating {
            next: first,
            end: self.cursor,
            elapsed: 0.0,
        };
        log::debug!(
            "progression: strokes {}..{} {:?}, punishment {:.1}",
            first,
            self.cursor,
            score.classification,
            punishment
        );

        GestureOutcome::Scored(StrokeVerdict {
            first_stroke: first,
            strokes_consumed: consumed,
            score,
            punishment,
            hp_deducted,
        })
    }

    /// Advance animations by `dt` seconds. At most `max_strokes_per_tick`
    /// strokes finish per call; the rest carry over to later ticks.
    pub fn tick(&mut self, dt: f32) -> Vec<Progress> {
        let mut progress = Vec::new();
        let secs = self.config.stroke_animation_secs;
        let cap = self.config.max_strokes_per_tick.max(1);
        if let ControllerState::Animating { elapsed, .. } = &mut self.state {
            // Cap the backlog so a long stall cannot flood one frame
            *elapsed = (*elapsed + dt.max(0.0)).min(secs * cap as f32);
        }
        for _ in 0..cap {
            match self.state {
                ControllerState::Animating { elapsed, .. } if elapsed >= secs => {
                    progress.extend(self.finish_stroke());
                }
                _ => break,
            }
        }
        progress
    }

    /// Complete the stroke currently animating, as signalled by a renderer
    /// that drives its own animation clock.
    pub fn finish_stroke(&mut self) -> Vec<Progress> {
        let ControllerState::Animating { next, end, elapsed } = self.state else {
            return Vec::new();
        };
        let mut progress = vec![Progress::StrokeAnimated(next)];
        let next = next + 1;
        if next < end {
            self.state = ControllerState::Animating {
                next,
                end,
                elapsed: (elapsed - self.config.stroke_animation_secs).max(0.0),
            };
        } else if self.cursor >= self.total_strokes() {
            self.state = ControllerState::CharacterComplete;
            progress.push(Progress::CharacterComplete);
        } else {
            self.state = ControllerState::AwaitingGesture;
        }
        progress
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn model(&self) -> Option<&Rc<CharacterStrokeModel>> {
        self.model.as_ref()
    }

    pub fn total_strokes(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.total_strokes())
    }

    pub fn tally(&self) -> StrokeTally {
        self.tally
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
