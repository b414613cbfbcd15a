//! Tile animation data: phases, their fixed durations, and the per-tile
//! animation record.
//!
//! Animations are purely cosmetic sequencing. Game state is mutated
//! synchronously at click time; the only thing an animation gates is input,
//! via its `blocks_input` flag. Advancement happens in `animation_logic` on
//! each tick against a caller-supplied monotonic clock.

use std::time::{Duration, Instant};

use crate::constants::{
    COMBAT_ANIMATION_MS, COMBAT_STAGE2_ANIMATION_MS, DYING_ANIMATION_MS,
    ENTITY_TRANSITION_ANIMATION_MS, REVEAL_ANIMATION_MS, TREASURE_CLAIM_ANIMATION_MS,
};

/// Visual phase a tile can be in. `None` is represented by the absence of a
/// [`TileAnimation`] on the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Hidden tile flipping over to show its occupant.
    Revealing,
    /// Opening swing of a fight started from a hidden tile.
    Combat,
    /// Impact frame; entry point when a revealed hostile is fought.
    CombatStage2,
    /// Cosmetic terminal fade, played by the presentation layer.
    Dying,
    /// Loot pickup flash.
    TreasureClaim,
    /// Occupant swap to the transition target.
    EntityTransition,
}

impl AnimationPhase {
    pub fn duration(&self) -> Duration {
        let ms = match self {
            AnimationPhase::Revealing => REVEAL_ANIMATION_MS,
            AnimationPhase::Combat => COMBAT_ANIMATION_MS,
            AnimationPhase::CombatStage2 => COMBAT_STAGE2_ANIMATION_MS,
            AnimationPhase::Dying => DYING_ANIMATION_MS,
            AnimationPhase::TreasureClaim => TREASURE_CLAIM_ANIMATION_MS,
            AnimationPhase::EntityTransition => ENTITY_TRANSITION_ANIMATION_MS,
        };
        Duration::from_millis(ms)
    }

    /// Revealing is the only phase that leaves the tile clickable; everything
    /// in the combat/claim chains swallows clicks until it resolves.
    pub fn blocks_input(&self) -> bool {
        !matches!(self, AnimationPhase::Revealing)
    }
}

/// Active animation record on a tile. Created when a phase starts, replaced
/// when the next phase of a chain starts, dropped when the chain ends.
#[derive(Debug, Clone, Copy)]
pub struct TileAnimation {
    pub phase: AnimationPhase,
    pub started_at: Instant,
    pub duration: Duration,
    pub blocks_input: bool,
}

impl TileAnimation {
    pub fn new(phase: AnimationPhase, now: Instant) -> Self {
        Self {
            phase,
            started_at: now,
            duration: phase.duration(),
            blocks_input: phase.blocks_input(),
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.duration_since(self.started_at) >= self.duration
    }
}
