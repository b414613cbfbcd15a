//! Threat-level computation.
//!
//! Every empty tile carries a numeric hint: the sum of the levels of its
//! live Moore-neighborhood occupants. Dead occupants and neutral-tagged
//! occupants contribute nothing; board-edge neighbors are simply absent.
//! The whole grid is recomputed in one pass whenever a placement, reveal or
//! kill marks the cache stale — at interactive sizes the full O(rows·cols·8)
//! sweep is cheaper than tracking incremental deltas.

use crate::board::Board;
use crate::constants::EMPTY_ENTITY_ID;
use crate::entities::EntityCatalog;

/// Valid neighbor coordinates of a cell, up to 8 directions.
pub fn get_neighbors(row: usize, col: usize, rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut neighbors = Vec::with_capacity(8);

    for d_row in -1i32..=1 {
        for d_col in -1i32..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }

            let new_row = row as i32 + d_row;
            let new_col = col as i32 + d_col;

            if new_row >= 0 && new_row < rows as i32 && new_col >= 0 && new_col < cols as i32 {
                neighbors.push((new_row as usize, new_col as usize));
            }
        }
    }

    neighbors
}

/// Threat weight one occupant projects onto its neighbors.
fn occupant_weight(board: &Board, catalog: &EntityCatalog, row: usize, col: usize) -> u32 {
    let entity_id = board.entity_id(row, col);
    if entity_id == EMPTY_ENTITY_ID || board.is_dead(row, col) {
        return 0;
    }

    match catalog.lookup(entity_id) {
        Some(def) if !def.is_neutral() => def.level,
        _ => 0,
    }
}

/// Recomputes the cached threat level of every tile and clears the stale
/// flag. Pure with respect to the grid snapshot: no randomness, no partial
/// updates.
pub fn recompute_threat_levels(board: &mut Board, catalog: &EntityCatalog) {
    let (rows, cols) = (board.rows(), board.cols());

    for row in 0..rows {
        for col in 0..cols {
            let value = if board.entity_id(row, col) == EMPTY_ENTITY_ID {
                get_neighbors(row, col, rows, cols)
                    .into_iter()
                    .map(|(n_row, n_col)| occupant_weight(board, catalog, n_row, n_col))
                    .sum()
            } else {
                // Occupied tiles never display a hint
                0
            };
            board.set_threat_level(row, col, value);
        }
    }

    board.clear_threat_stale();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityDefinition;

    fn catalog() -> EntityCatalog {
        let def = |id: u32, level: u32, tags: &[&str]| EntityDefinition {
            id,
            name: format!("entity-{id}"),
            description: String::new(),
            level,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            next_entity_id: None,
        };

        EntityCatalog::new(vec![
            def(0, 0, &["empty"]),
            def(1, 1, &["enemy"]),
            def(3, 2, &["enemy"]),
            def(6, 5, &["enemy"]),
            def(11, 4, &["onReveal-neutral", "no-experience"]),
            def(14, 1, &["item"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_get_neighbors_center_edge_corner() {
        assert_eq!(get_neighbors(1, 1, 3, 3).len(), 8);
        assert_eq!(get_neighbors(0, 1, 3, 3).len(), 5);
        assert_eq!(get_neighbors(0, 0, 3, 3).len(), 3);
        assert_eq!(get_neighbors(2, 2, 3, 3).len(), 3);
    }

    #[test]
    fn test_center_surrounded_by_level_one_enemies() {
        let catalog = catalog();
        let mut board = Board::new(3, 3);

        for (row, col) in get_neighbors(1, 1, 3, 3) {
            board.set_entity_id(row, col, 1);
        }

        recompute_threat_levels(&mut board, &catalog);
        assert_eq!(board.threat_level(1, 1), 8);

        // Killing one neighbor drops the hint by exactly its level
        board.mark_dead(0, 0);
        recompute_threat_levels(&mut board, &catalog);
        assert_eq!(board.threat_level(1, 1), 7);
    }

    #[test]
    fn test_levels_are_summed_not_counted() {
        let catalog = catalog();
        let mut board = Board::new(3, 3);
        board.set_entity_id(0, 0, 3); // level 2
        board.set_entity_id(2, 2, 6); // level 5

        recompute_threat_levels(&mut board, &catalog);

        assert_eq!(board.threat_level(1, 1), 7);
        assert_eq!(board.threat_level(0, 1), 2);
        assert_eq!(board.threat_level(1, 2), 5);
        assert_eq!(board.threat_level(2, 0), 0);
    }

    #[test]
    fn test_neutral_occupants_do_not_contribute() {
        let catalog = catalog();
        let mut board = Board::new(3, 3);
        board.set_entity_id(0, 0, 11); // level 4, but neutral-tagged

        recompute_threat_levels(&mut board, &catalog);
        assert_eq!(board.threat_level(1, 1), 0);
        assert_eq!(board.threat_level(0, 1), 0);
    }

    #[test]
    fn test_leveled_items_do_contribute() {
        // Exclusion is strictly tag-based, not category-based: a leveled
        // occupant without neutral tags weighs on its neighbors.
        let catalog = catalog();
        let mut board = Board::new(3, 3);
        board.set_entity_id(0, 0, 14); // level 1 item, no neutral tags

        recompute_threat_levels(&mut board, &catalog);
        assert_eq!(board.threat_level(1, 1), 1);
    }

    #[test]
    fn test_occupied_tiles_have_zero_hint() {
        let catalog = catalog();
        let mut board = Board::new(2, 2);
        board.set_entity_id(0, 0, 1);
        board.set_entity_id(0, 1, 3);

        recompute_threat_levels(&mut board, &catalog);

        assert_eq!(board.threat_level(0, 0), 0);
        assert_eq!(board.threat_level(0, 1), 0);
    }

    #[test]
    fn test_placement_only_affects_adjacent_hints() {
        let catalog = catalog();
        let mut board = Board::new(5, 5);
        board.set_entity_id(0, 0, 1);
        recompute_threat_levels(&mut board, &catalog);
        let before: Vec<u32> = (0..5)
            .flat_map(|r| (0..5).map(move |c| (r, c)))
            .map(|(r, c)| board.threat_level(r, c))
            .collect();

        board.set_entity_id(4, 4, 6);
        recompute_threat_levels(&mut board, &catalog);

        for row in 0usize..5 {
            for col in 0usize..5 {
                let adjacent = row.abs_diff(4) <= 1 && col.abs_diff(4) <= 1;
                let old = before[row * 5 + col];
                let new = board.threat_level(row, col);
                if adjacent && !(row == 4 && col == 4) {
                    assert_eq!(new, old + 5, "neighbor ({row},{col}) should change");
                } else {
                    assert_eq!(new, old, "non-neighbor ({row},{col}) should not change");
                }
            }
        }
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let catalog = catalog();
        let mut board = Board::new(4, 4);
        board.set_entity_id(1, 1, 3);
        board.set_entity_id(2, 3, 1);
        board.mark_dead(2, 3);

        recompute_threat_levels(&mut board, &catalog);
        let first: Vec<u32> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .map(|(r, c)| board.threat_level(r, c))
            .collect();

        recompute_threat_levels(&mut board, &catalog);
        let second: Vec<u32> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .map(|(r, c)| board.threat_level(r, c))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_recompute_clears_stale_flag() {
        let catalog = catalog();
        let mut board = Board::new(2, 2);
        board.set_entity_id(0, 0, 1);
        assert!(board.is_threat_stale());

        recompute_threat_levels(&mut board, &catalog);
        assert!(!board.is_threat_stale());
    }
}
