//! Built-in game data: the default entity catalog and a couple of authored
//! map layouts. Used whenever no external config files are present, and by
//! tests that need a realistic catalog.

use uuid::Uuid;

use crate::config::{GameConfig, MapLayout, PlayerConfig};
use crate::constants::{DEFAULT_BOARD_COLS, DEFAULT_BOARD_ROWS};
use crate::entities::EntityDefinition;

fn entity(
    id: u32,
    name: &str,
    description: &str,
    level: u32,
    tags: &[&str],
    next_entity_id: Option<u32>,
) -> EntityDefinition {
    EntityDefinition {
        id,
        name: name.to_string(),
        description: description.to_string(),
        level,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        next_entity_id,
    }
}

/// The default entity roster.
///
/// Ids 1 (rat), 7 (mine) and 23 (weakened mine) are wired into the scroll
/// trigger effects; ids 2, 8, 10, 12, 13 and 17 carry special transition
/// rules. Everything else is driven purely by tags.
pub fn builtin_entities() -> Vec<EntityDefinition> {
    vec![
        entity(0, "Empty", "Nothing here but dust.", 0, &["empty"], None),
        entity(1, "Cave Rat", "Weak but numerous.", 1, &["enemy"], None),
        entity(
            2,
            "Fireflies",
            "A glowing swarm. Mostly harmless, occasionally echoes.",
            1,
            &["enemy"],
            None,
        ),
        entity(3, "Cave Bat", "Swoops from the dark.", 2, &["enemy"], None),
        entity(
            4,
            "Restless Skeleton",
            "Still clutching a rusty sword.",
            3,
            &["enemy"],
            None,
        ),
        entity(
            5,
            "Crimson Ooze",
            "Dissolves boots on contact.",
            4,
            &["enemy"],
            None,
        ),
        entity(
            6,
            "Stone Gargoyle",
            "Pretends to be architecture.",
            5,
            &["enemy"],
            None,
        ),
        entity(
            7,
            "Explosive Mine",
            "Do not tap. Do not prod.",
            10,
            &["enemy"],
            None,
        ),
        entity(
            8,
            "Treasure Chest",
            "Holds an elixir or a cache of experience.",
            0,
            &["item"],
            None,
        ),
        entity(
            9,
            "Health Elixir",
            "Restores a good swig of health.",
            0,
            &["item", "heal-8"],
            None,
        ),
        entity(
            10,
            "Rat King",
            "Commands the swarms below.",
            6,
            &["enemy"],
            None,
        ),
        entity(
            11,
            "Onyx Monolith",
            "Ancient, inert, and impossible to move.",
            0,
            &["onReveal-neutral", "no-experience", "indestructible"],
            None,
        ),
        entity(
            12,
            "Mysterious Man",
            "He was here before the caves were.",
            7,
            &["enemy"],
            None,
        ),
        entity(
            13,
            "Ancient Dragon",
            "The end of every expedition, one way or another.",
            13,
            &["enemy", "trigger-win-game"],
            None,
        ),
        entity(
            14,
            "Cave Crystals",
            "Hums faintly when approached.",
            1,
            &["item", "reward-experience=1"],
            None,
        ),
        entity(
            15,
            "Spyglass",
            "Surveys a patch of unexplored ground.",
            0,
            &["item", "reveal-3x3"],
            None,
        ),
        entity(
            16,
            "Gnome Thief",
            "Drops his loot when caught.",
            3,
            &["enemy"],
            Some(8),
        ),
        entity(
            17,
            "Treasure Mimic",
            "A chest with teeth.",
            8,
            &["enemy"],
            None,
        ),
        entity(
            18,
            "Tome of Echoes",
            "Dense reading, generous lessons.",
            0,
            &["item", "reward-experience=3"],
            None,
        ),
        entity(
            19,
            "Rat Scroll",
            "Marks every rat nest on the map.",
            0,
            &["item", "trigger-reveal-E1"],
            None,
        ),
        entity(
            20,
            "Seismic Scroll",
            "A controlled tremor defuses every mine.",
            0,
            &["item", "trigger-weakening-E7"],
            None,
        ),
        entity(
            21,
            "Experience Cache",
            "Someone else's hard-won lessons.",
            0,
            &["item", "reward-experience=5"],
            None,
        ),
        entity(
            22,
            "Bat Echo",
            "A lingering sound that maps one hidden tile.",
            0,
            &["item", "reveal-1"],
            None,
        ),
        entity(
            23,
            "Weakened Mine",
            "Fizzing quietly. Barely dangerous now.",
            1,
            &["enemy"],
            None,
        ),
        entity(
            24,
            "Victory Crown",
            "Proof the dragon is gone.",
            0,
            &["item", "reward-experience=10", "trigger-win-game"],
            None,
        ),
    ]
}

/// Default configuration: 10x14 board, standard starting stats, the roster
/// above.
pub fn builtin_game_config() -> GameConfig {
    GameConfig {
        rows: DEFAULT_BOARD_ROWS,
        cols: DEFAULT_BOARD_COLS,
        game_state: PlayerConfig::default(),
        entities: builtin_entities(),
    }
}

const LAYOUT_A: [[u32; DEFAULT_BOARD_COLS]; DEFAULT_BOARD_ROWS] = [
    [0, 1, 0, 0, 2, 0, 0, 7, 0, 0, 1, 0, 0, 0],
    [3, 0, 0, 14, 0, 0, 1, 0, 0, 15, 0, 2, 0, 1],
    [0, 0, 8, 0, 0, 4, 0, 0, 3, 0, 0, 0, 11, 0],
    [1, 0, 0, 0, 16, 0, 0, 2, 0, 0, 8, 0, 0, 5],
    [0, 2, 0, 7, 0, 0, 10, 0, 0, 1, 0, 0, 3, 0],
    [0, 0, 12, 0, 0, 1, 0, 0, 17, 0, 0, 7, 0, 0],
    [4, 0, 0, 1, 0, 0, 14, 0, 0, 0, 6, 0, 2, 0],
    [0, 0, 15, 0, 3, 0, 0, 5, 0, 4, 0, 0, 0, 1],
    [0, 1, 0, 0, 0, 8, 0, 0, 11, 0, 0, 14, 0, 3],
    [13, 0, 0, 2, 0, 0, 1, 0, 0, 16, 0, 0, 8, 0],
];

const LAYOUT_B: [[u32; DEFAULT_BOARD_COLS]; DEFAULT_BOARD_ROWS] = [
    [0, 0, 3, 0, 0, 1, 0, 0, 8, 0, 0, 2, 0, 0],
    [1, 0, 0, 0, 15, 0, 0, 4, 0, 0, 1, 0, 0, 7],
    [0, 2, 0, 1, 0, 0, 11, 0, 0, 3, 0, 0, 14, 0],
    [0, 0, 7, 0, 0, 8, 0, 0, 16, 0, 0, 5, 0, 1],
    [4, 0, 0, 0, 2, 0, 0, 1, 0, 0, 12, 0, 0, 0],
    [0, 1, 0, 14, 0, 0, 6, 0, 0, 7, 0, 0, 3, 0],
    [0, 0, 17, 0, 0, 1, 0, 0, 2, 0, 0, 8, 0, 0],
    [3, 0, 0, 10, 0, 0, 14, 0, 0, 1, 0, 0, 4, 0],
    [0, 0, 1, 0, 0, 11, 0, 5, 0, 0, 15, 0, 0, 2],
    [0, 8, 0, 0, 16, 0, 0, 0, 1, 0, 0, 0, 13, 0],
];

fn layout_from(id: Uuid, rows: &[[u32; DEFAULT_BOARD_COLS]; DEFAULT_BOARD_ROWS]) -> MapLayout {
    MapLayout {
        id,
        cells: rows.iter().map(|row| row.to_vec()).collect(),
    }
}

/// The authored built-in maps.
pub fn builtin_layouts() -> Vec<MapLayout> {
    vec![
        layout_from(
            Uuid::from_u128(0x7d0c_1b5e_4a2f_4d8a_9b1e_3c6f_8a2d_5e01),
            &LAYOUT_A,
        ),
        layout_from(
            Uuid::from_u128(0x2f8e_6a1c_9d4b_4e7f_8c3a_1b5d_7e9f_2a02),
            &LAYOUT_B,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ANCIENT_DRAGON_ENTITY_ID, EMPTY_ENTITY_ID};

    #[test]
    fn test_builtin_config_is_valid() {
        let config = builtin_game_config();
        let catalog = config.catalog().expect("builtin catalog must validate");

        assert!(catalog.contains(EMPTY_ENTITY_ID));
        assert!(catalog.lookup(ANCIENT_DRAGON_ENTITY_ID).is_some());
    }

    #[test]
    fn test_builtin_layouts_validate_against_config() {
        let config = builtin_game_config();
        let catalog = config.catalog().unwrap();

        let layouts = builtin_layouts();
        assert!(!layouts.is_empty());

        for layout in &layouts {
            layout
                .validate(config.rows, config.cols, &catalog)
                .expect("builtin layout must validate");
        }
    }

    #[test]
    fn test_builtin_layouts_have_one_dragon_each() {
        for layout in builtin_layouts() {
            let dragons = layout
                .cells
                .iter()
                .flatten()
                .filter(|&&id| id == ANCIENT_DRAGON_ENTITY_ID)
                .count();
            assert_eq!(dragons, 1, "layout {} should have one dragon", layout.id);
        }
    }

    #[test]
    fn test_builtin_layout_ids_are_distinct() {
        let layouts = builtin_layouts();
        assert_ne!(layouts[0].id, layouts[1].id);
    }
}
