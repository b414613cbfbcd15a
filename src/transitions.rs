//! Transition policy: which entity occupies a tile after its occupant is
//! defeated or claimed.
//!
//! The rules are keyed by entity id. A handful of entities have fixed or
//! weighted-random replacements; everything else falls back to its
//! catalog-defined `next_entity_id`, or to the empty entity when none is
//! defined. Random rolls come from the caller's RNG so the binary gets
//! per-session variety while tests can seed.

use rand::Rng;

use crate::constants::{
    ANCIENT_DRAGON_ENTITY_ID, BAT_ECHO_ENTITY_ID, CHEST_ELIXIR_PERCENT, CHEST_ENTITY_ID,
    EMPTY_ENTITY_ID, EXPERIENCE_CACHE_ENTITY_ID, FIREFLY_ENTITY_ID, FIREFLY_VANISH_PERCENT,
    HEALTH_ELIXIR_ENTITY_ID, MIMIC_ENTITY_ID, MYSTERIOUS_MAN_ENTITY_ID, RAT_KING_ENTITY_ID,
    RAT_SCROLL_ENTITY_ID, SEISMIC_SCROLL_ENTITY_ID, TOME_ENTITY_ID, VICTORY_CROWN_ENTITY_ID,
};
use crate::entities::EntityDefinition;

/// Resolves the replacement entity for a cleared occupant.
///
/// A result equal to `def.id` means "no transition"; the animation layer
/// skips the swap phase entirely in that case.
pub fn resolve_transition<R: Rng>(def: &EntityDefinition, rng: &mut R) -> u32 {
    match def.id {
        // Chest: elixir or an experience cache, even odds
        CHEST_ENTITY_ID => {
            if rng.gen_range(0..100) < CHEST_ELIXIR_PERCENT {
                HEALTH_ELIXIR_ENTITY_ID
            } else {
                EXPERIENCE_CACHE_ENTITY_ID
            }
        }
        // Fireflies: usually scatter to nothing, sometimes leave an echo
        FIREFLY_ENTITY_ID => {
            if rng.gen_range(0..100) < FIREFLY_VANISH_PERCENT {
                EMPTY_ENTITY_ID
            } else {
                BAT_ECHO_ENTITY_ID
            }
        }
        // Bosses drop their fixed rewards
        RAT_KING_ENTITY_ID => RAT_SCROLL_ENTITY_ID,
        MYSTERIOUS_MAN_ENTITY_ID => SEISMIC_SCROLL_ENTITY_ID,
        ANCIENT_DRAGON_ENTITY_ID => VICTORY_CROWN_ENTITY_ID,
        MIMIC_ENTITY_ID => TOME_ENTITY_ID,
        _ => def.next_entity_id.unwrap_or(EMPTY_ENTITY_ID),
    }
}
