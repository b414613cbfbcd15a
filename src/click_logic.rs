//! Click resolution: the game-logic entry point for a tile click.
//!
//! Decision order, first match wins:
//!
//! 1. input-blocking animation on the tile → click swallowed
//! 2. live hostile occupant (hidden or revealed) → combat
//! 3. hidden tile → reveal
//! 4. revealed, unclaimed item → claim and apply its tag effects
//! 5. anything else → acknowledged no-op
//!
//! All game-state mutation happens here, synchronously; the animations
//! started along the way are cosmetic sequencing on top.

use std::time::Instant;

use rand::Rng;

use crate::animation::AnimationPhase;
use crate::board::{Board, TileState};
use crate::constants::{MINE_ENTITY_ID, RAT_ENTITY_ID, WEAKENED_MINE_ENTITY_ID};
use crate::entities::{EntityCatalog, EntityDefinition};
use crate::player::PlayerStats;

/// Something observable that happened while resolving a click or advancing
/// animations. The binary maps these to message-log lines; tests assert on
/// them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Click landed on a tile whose animation swallows input.
    InputBlocked { row: usize, col: usize },
    /// A hidden tile was flipped by a direct click.
    TileRevealed { row: usize, col: usize },
    /// A hostile was engaged: damage taken, experience earned.
    CombatResolved {
        name: String,
        damage: u32,
        experience: u32,
    },
    /// Player health reached zero; `cause` names the killer.
    PlayerDied { cause: String },
    /// The win condition fired.
    VictoryAchieved { source: String },
    /// A revealed item was claimed.
    TreasureClaimed { name: String },
    /// Health restored by an item (amount actually applied).
    Healed { amount: u32 },
    /// Experience granted by an item.
    ExperienceGained { amount: u32 },
    /// A board-wide effect revealed this many hidden tiles.
    TilesRevealed { count: usize },
    /// Every live mine was swapped for its weakened counterpart.
    MinesWeakened { count: usize },
    /// A cleared tile's occupant was replaced by the transition policy.
    EntityTransitioned {
        row: usize,
        col: usize,
        entity_id: u32,
    },
    /// Manual level-up succeeded.
    LeveledUp { level: u32 },
}

/// Resolves a click on `(row, col)`.
///
/// Out-of-bounds clicks return no events. The caller is responsible for
/// ignoring clicks after game over and for recomputing threat levels
/// afterwards.
pub fn handle_click<R: Rng>(
    board: &mut Board,
    catalog: &EntityCatalog,
    player: &mut PlayerStats,
    row: usize,
    col: usize,
    now: Instant,
    rng: &mut R,
) -> Vec<BoardEvent> {
    let mut events = Vec::new();

    if !board.in_bounds(row, col) {
        return events;
    }

    if board.blocks_input(row, col) {
        events.push(BoardEvent::InputBlocked { row, col });
        return events;
    }

    let Some(def) = catalog.lookup(board.entity_id(row, col)) else {
        return events;
    };

    let was_hidden = board.tile_state(row, col) == TileState::Hidden;

    // Hostile engagement happens whether the tile is hidden or revealed.
    if def.is_enemy() && !board.is_dead(row, col) {
        let damage = def.level;
        let experience = if def.grants_no_experience() {
            0
        } else {
            def.level
        };

        player.take_damage(damage);
        player.add_experience(experience);
        board.mark_dead(row, col);
        events.push(BoardEvent::CombatResolved {
            name: def.name.clone(),
            damage,
            experience,
        });

        if !player.is_alive() {
            // Death ordering: the kill sticks, but no reveal and no
            // animation happen for this click.
            events.push(BoardEvent::PlayerDied {
                cause: def.name.clone(),
            });
            return events;
        }

        if was_hidden {
            board.set_tile_state(row, col, TileState::Revealed);
        }
        // A fight on an already-revealed hostile opens on the impact frame;
        // the hidden-click variant plays the full sequence.
        let phase = if was_hidden {
            AnimationPhase::Combat
        } else {
            AnimationPhase::CombatStage2
        };
        board.start_animation(row, col, phase, now);

        if def.triggers_win() {
            events.push(BoardEvent::VictoryAchieved {
                source: def.name.clone(),
            });
        }
        return events;
    }

    // First reveal of a non-hostile hidden tile.
    if was_hidden {
        board.set_tile_state(row, col, TileState::Revealed);
        board.start_animation(row, col, AnimationPhase::Revealing, now);
        events.push(BoardEvent::TileRevealed { row, col });
        return events;
    }

    // Claiming a revealed item.
    if def.is_item() && !def.is_indestructible() && !board.is_dead(row, col) {
        events.push(BoardEvent::TreasureClaimed {
            name: def.name.clone(),
        });
        events.extend(apply_item_effects(def, board, player, rng));
        board.mark_dead(row, col);
        board.start_animation(row, col, AnimationPhase::TreasureClaim, now);

        if def.triggers_win() {
            events.push(BoardEvent::VictoryAchieved {
                source: def.name.clone(),
            });
        }
        return events;
    }

    // Revealed empties, neutral obstacles, spent tiles: acknowledged only.
    events
}

/// Effect categories. An item applies at most one effect per category, in
/// tag order; extra tags of an already-consumed category are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectCategory {
    Heal,
    ExperienceReward,
    BoardTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemEffect {
    Heal(u32),
    RewardExperience(u32),
    RevealRats,
    WeakenMines,
    RevealRandomTile,
    RevealRandomBlock,
}

/// The ordered tag rule table. Unknown tags (including pure markers like
/// `item` or `trigger-win-game`) resolve to no effect here.
fn parse_effect_tag(tag: &str) -> Option<(EffectCategory, ItemEffect)> {
    if let Some(amount) = tag.strip_prefix("heal-").and_then(|n| n.parse().ok()) {
        return Some((EffectCategory::Heal, ItemEffect::Heal(amount)));
    }

    if let Some(amount) = tag
        .strip_prefix("reward-experience=")
        .and_then(|n| n.parse().ok())
    {
        return Some((
            EffectCategory::ExperienceReward,
            ItemEffect::RewardExperience(amount),
        ));
    }

    let trigger = match tag {
        "trigger-reveal-E1" => ItemEffect::RevealRats,
        "trigger-weakening-E7" => ItemEffect::WeakenMines,
        "reveal-1" => ItemEffect::RevealRandomTile,
        "reveal-3x3" => ItemEffect::RevealRandomBlock,
        _ => return None,
    };
    Some((EffectCategory::BoardTrigger, trigger))
}

fn apply_item_effects<R: Rng>(
    def: &EntityDefinition,
    board: &mut Board,
    player: &mut PlayerStats,
    rng: &mut R,
) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    let mut consumed: Vec<EffectCategory> = Vec::new();

    for tag in &def.tags {
        let Some((category, effect)) = parse_effect_tag(tag) else {
            continue;
        };
        if consumed.contains(&category) {
            continue;
        }
        consumed.push(category);

        match effect {
            ItemEffect::Heal(amount) => {
                let applied = player.heal(amount);
                events.push(BoardEvent::Healed { amount: applied });
            }
            ItemEffect::RewardExperience(amount) => {
                player.add_experience(amount);
                events.push(BoardEvent::ExperienceGained { amount });
            }
            ItemEffect::RevealRats => {
                let count = reveal_all_of_entity(board, RAT_ENTITY_ID);
                events.push(BoardEvent::TilesRevealed { count });
            }
            ItemEffect::WeakenMines => {
                let count = weaken_all_mines(board);
                events.push(BoardEvent::MinesWeakened { count });
            }
            ItemEffect::RevealRandomTile => {
                let count = reveal_random_tile(board, rng);
                events.push(BoardEvent::TilesRevealed { count });
            }
            ItemEffect::RevealRandomBlock => {
                let count = reveal_random_block(board, rng);
                events.push(BoardEvent::TilesRevealed { count });
            }
        }
    }

    events
}

/// Reveals every hidden tile holding the given entity, board-wide.
fn reveal_all_of_entity(board: &mut Board, entity_id: u32) -> usize {
    let mut count = 0;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if board.entity_id(row, col) == entity_id
                && board.tile_state(row, col) == TileState::Hidden
            {
                board.set_tile_state(row, col, TileState::Revealed);
                count += 1;
            }
        }
    }
    count
}

/// Replaces every mine on the board, hidden or revealed, with the weakened
/// variant. A one-shot global transformation, not randomized.
fn weaken_all_mines(board: &mut Board) -> usize {
    let mut count = 0;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if board.entity_id(row, col) == MINE_ENTITY_ID {
                board.set_entity_id(row, col, WEAKENED_MINE_ENTITY_ID);
                count += 1;
            }
        }
    }
    count
}

/// Reveals one uniformly-random hidden tile. No-op on a fully revealed
/// board.
fn reveal_random_tile<R: Rng>(board: &mut Board, rng: &mut R) -> usize {
    let hidden = board.hidden_positions();
    if hidden.is_empty() {
        return 0;
    }

    let (row, col) = hidden[rng.gen_range(0..hidden.len())];
    board.set_tile_state(row, col, TileState::Revealed);
    1
}

/// Reveals a random 3x3 block, its center clamped so the block stays in
/// bounds. Returns how many tiles were newly revealed.
fn reveal_random_block<R: Rng>(board: &mut Board, rng: &mut R) -> usize {
    let (rows, cols) = (board.rows(), board.cols());
    if rows == 0 || cols == 0 {
        return 0;
    }

    let center_row = if rows < 3 {
        rows / 2
    } else {
        rng.gen_range(1..rows - 1)
    };
    let center_col = if cols < 3 {
        cols / 2
    } else {
        rng.gen_range(1..cols - 1)
    };

    let mut count = 0;
    for row in center_row.saturating_sub(1)..=(center_row + 1).min(rows - 1) {
        for col in center_col.saturating_sub(1)..=(center_col + 1).min(cols - 1) {
            if board.tile_state(row, col) == TileState::Hidden {
                board.set_tile_state(row, col, TileState::Revealed);
                count += 1;
            }
        }
    }
    count
}
