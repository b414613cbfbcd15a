//! Animation advancement: walks every tile once per tick and moves expired
//! phases along their chains.
//!
//! Chains:
//!   Revealing → done
//!   Combat → CombatStage2 → EntityTransition → done
//!   TreasureClaim → EntityTransition → done
//!   Dying → done
//!
//! Entering `EntityTransition` consults the transition policy first and
//! installs the replacement occupant immediately, so the phase's visual
//! matches the entity the tile will hold. When the policy resolves to the
//! entity itself there is nothing to show and the chain ends early.

use std::time::Instant;

use rand::Rng;

use crate::animation::AnimationPhase;
use crate::board::Board;
use crate::click_logic::BoardEvent;
use crate::entities::EntityCatalog;
use crate::transitions::resolve_transition;

/// Advances every expired animation by one phase. Bounded per-tile scan, no
/// blocking; call once per frame with the current monotonic time.
pub fn update_animations<R: Rng>(
    board: &mut Board,
    catalog: &EntityCatalog,
    now: Instant,
    rng: &mut R,
) -> Vec<BoardEvent> {
    let mut events = Vec::new();

    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let Some(anim) = board.animation(row, col).copied() else {
                continue;
            };
            if !anim.is_finished(now) {
                continue;
            }

            match anim.phase {
                AnimationPhase::Revealing
                | AnimationPhase::Dying
                | AnimationPhase::EntityTransition => {
                    board.clear_animation(row, col);
                }
                AnimationPhase::Combat => {
                    board.start_animation(row, col, AnimationPhase::CombatStage2, now);
                }
                AnimationPhase::CombatStage2 | AnimationPhase::TreasureClaim => {
                    begin_entity_transition(board, catalog, row, col, now, rng, &mut events);
                }
            }
        }
    }

    events
}

/// Resolves the cleared occupant's replacement and starts the swap phase,
/// or ends the chain when no transition is defined.
fn begin_entity_transition<R: Rng>(
    board: &mut Board,
    catalog: &EntityCatalog,
    row: usize,
    col: usize,
    now: Instant,
    rng: &mut R,
    events: &mut Vec<BoardEvent>,
) {
    let entity_id = board.entity_id(row, col);
    let Some(def) = catalog.lookup(entity_id) else {
        board.clear_animation(row, col);
        return;
    };

    let target = resolve_transition(def, rng);
    if target == entity_id {
        // No defined transition: the cleared occupant stays as an inert
        // corpse and the chain ends without a swap phase.
        board.clear_animation(row, col);
        return;
    }

    board.set_entity_id(row, col, target);
    board.revive(row, col);
    board.start_animation(row, col, AnimationPhase::EntityTransition, now);
    events.push(BoardEvent::EntityTransitioned {
        row,
        col,
        entity_id: target,
    });
}
