//! Player stats and progression.
//!
//! Health and experience are mutated synchronously by click resolution.
//! Leveling up is a manual action: once the experience bar fills the player
//! chooses when to spend it, excess experience carries over, and max health
//! grows slowly with level.

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub experience: u32,
    pub exp_to_next_level: u32,
    /// Base values the level curves grow from; kept so reset and level-up
    /// reuse the config the session was started with.
    base_max_health: u32,
    base_max_experience: u32,
}

impl PlayerStats {
    pub fn new(config: &PlayerConfig) -> Self {
        let level = config.starting_level;
        let max_health = max_health_for_level(config.starting_max_health, level);

        Self {
            level,
            health: max_health,
            max_health,
            experience: 0,
            exp_to_next_level: exp_requirement_for_level(config.starting_max_experience, level),
            base_max_health: config.starting_max_health,
            base_max_experience: config.starting_max_experience,
        }
    }

    /// Applies damage, saturating at zero. Returns the remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Restores health, capped at the maximum. Returns the amount actually
    /// restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn add_experience(&mut self, amount: u32) {
        self.experience += amount;
    }

    pub fn can_level_up(&self) -> bool {
        self.experience >= self.exp_to_next_level
    }

    /// Spends a full experience bar: +1 level, excess experience carried
    /// over, max health recalculated and fully restored. Returns false when
    /// the bar is not full yet.
    pub fn level_up(&mut self) -> bool {
        if !self.can_level_up() {
            return false;
        }

        let excess = self.experience - self.exp_to_next_level;
        self.level += 1;
        self.experience = excess;
        self.exp_to_next_level = exp_requirement_for_level(self.base_max_experience, self.level);
        self.max_health = max_health_for_level(self.base_max_health, self.level);
        self.health = self.max_health;

        true
    }
}

/// Max health grows by one point every other level.
pub fn max_health_for_level(base: u32, level: u32) -> u32 {
    base + level / 2
}

/// Experience requirement grows linearly with level.
pub fn exp_requirement_for_level(base: u32, level: u32) -> u32 {
    base + level
}
