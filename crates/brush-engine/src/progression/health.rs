use crate::api::config::DifficultySettings;

/// Receives the health effects of judged strokes.
pub trait HealthSink {
    /// A stroke was drawn perfectly.
    fn on_perfect(&mut self);
    /// A gesture earned `punishment`. Returns the HP actually deducted.
    fn on_punishment(&mut self, punishment: f32) -> f32;
}

/// Punishments below this deduct nothing.
pub const PUNISHMENT_THRESHOLD: f32 = 50.0;

/// Player health with difficulty-scaled bonus and damage.
#[derive(Debug, Clone, PartialEq)]
pub struct HpPool {
    hp: f32,
    max_hp: f32,
    difficulty: DifficultySettings,
}

impl HpPool {
    pub fn new(max_hp: f32, difficulty: DifficultySettings) -> Self {
        let max_hp = max_hp.max(1.0);
        Self {
            hp: max_hp,
            max_hp,
            difficulty,
        }
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Current HP as a percentage of the maximum.
    pub fn percent(&self) -> f32 {
        self.hp / self.max_hp * 100.0
    }

    pub fn difficulty(&self) -> DifficultySettings {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultySettings) {
        self.difficulty = difficulty;
    }

    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    /// Set HP, clamped to `[0, max]`.
    pub fn set_hp(&mut self, hp: f32) {
        self.hp = hp.clamp(0.0, self.max_hp);
    }

    pub fn refill(&mut self) {
        self.hp = self.max_hp;
    }

    /// HP lost for a raw punishment at the current difficulty.
    pub fn deduction_for(&self, punishment: f32) -> f32 {
        if punishment < PUNISHMENT_THRESHOLD {
            0.0
        } else {
            punishment / 10.0 * self.difficulty.punishment_multiplier
        }
    }
}

impl HealthSink for HpPool {
    fn on_perfect(&mut self) {
        self.set_hp(self.hp + self.difficulty.perfect_hp_bonus);
    }

    fn on_punishment(&mut self, punishment: f32) -> f32 {
        let deduction = self.deduction_for(punishment);
        if deduction > 0.0 {
            let before = self.hp;
            self.set_hp(self.hp - deduction);
            log::debug!("hp: -{:.1} ({:.1} -> {:.1})", deduction, before, self.hp);
        }
        deduction
    }
}
