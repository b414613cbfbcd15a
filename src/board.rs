//! Board data structures: tile records and the coordinate-checked grid.
//!
//! The board owns per-tile state only. Rules about what a click does live in
//! `click_logic`; threat numbers are computed in `threat`; animation
//! advancement lives in `animation_logic`. Out-of-range coordinates are
//! never errors: reads return neutral defaults and writes are no-ops, so
//! callers can probe neighborhoods without bounds arithmetic.

use std::time::Instant;

use crate::animation::{AnimationPhase, TileAnimation};
use crate::config::{ConfigError, MapLayout};
use crate::constants::EMPTY_ENTITY_ID;

/// Visibility of a tile to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileState {
    #[default]
    Hidden,
    Revealed,
}

/// Player-placed marker on a hidden tile. Advisory only; game logic never
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// Suspected threat level under this tile.
    Level(u8),
    Danger,
    Friendly,
}

/// Full mutable state of one grid cell.
#[derive(Debug, Clone, Default)]
pub struct Tile {
    pub entity_id: u32,
    pub state: TileState,
    /// Occupant was defeated or claimed but the tile has not transitioned
    /// yet. Dead occupants stop contributing to neighboring threat levels
    /// and cannot be fought or claimed again.
    pub dead: bool,
    /// Cached threat number; meaningful only while `entity_id == 0`.
    pub threat_level: u32,
    pub annotation: Option<Annotation>,
    pub animation: Option<TileAnimation>,
}

/// The tile grid, indexed as `[row][col]`.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Vec<Vec<Tile>>,
    rows: usize,
    cols: usize,
    threat_stale: bool,
}

impl Board {
    /// Creates a board of hidden, empty tiles.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: vec![vec![Tile::default(); cols]; rows],
            rows,
            cols,
            threat_stale: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.grid.get(row)?.get(col)
    }

    fn tile_mut(&mut self, row: usize, col: usize) -> Option<&mut Tile> {
        self.grid.get_mut(row)?.get_mut(col)
    }

    /// Resets every tile to hidden/empty/not-dead with no annotation or
    /// animation.
    pub fn reset(&mut self) {
        for row in &mut self.grid {
            for tile in row.iter_mut() {
                *tile = Tile::default();
            }
        }
        self.threat_stale = true;
    }

    /// Resets the board and installs a layout's entity ids, all hidden.
    ///
    /// The layout must match the board dimensions exactly; a mismatch is a
    /// hard failure that leaves the board reset but unpopulated.
    pub fn load_layout(&mut self, layout: &MapLayout) -> Result<(), ConfigError> {
        self.reset();

        if layout.rows() != self.rows || layout.cols() != self.cols {
            return Err(ConfigError::LayoutDimensionMismatch {
                id: layout.id,
                rows: layout.rows(),
                cols: layout.cols(),
                expected_rows: self.rows,
                expected_cols: self.cols,
            });
        }

        for (row, cells) in layout.cells.iter().enumerate() {
            for (col, &entity_id) in cells.iter().enumerate() {
                self.set_entity_id(row, col, entity_id);
            }
        }

        Ok(())
    }

    // ---- entity occupancy ----

    /// Out-of-bounds reads return the empty entity.
    pub fn entity_id(&self, row: usize, col: usize) -> u32 {
        self.tile(row, col)
            .map_or(EMPTY_ENTITY_ID, |t| t.entity_id)
    }

    /// Out-of-bounds writes are no-ops. Any placement change invalidates the
    /// cached threat levels (it affects up to 8 neighbors).
    pub fn set_entity_id(&mut self, row: usize, col: usize, entity_id: u32) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.entity_id = entity_id;
            self.threat_stale = true;
        }
    }

    // ---- reveal state ----

    /// Out-of-bounds reads report hidden.
    pub fn tile_state(&self, row: usize, col: usize) -> TileState {
        self.tile(row, col).map_or(TileState::Hidden, |t| t.state)
    }

    /// Revealing a tile is the synchronization point after which stale
    /// threat values must not be observed, so it marks the cache stale.
    pub fn set_tile_state(&mut self, row: usize, col: usize, state: TileState) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.state = state;
            if state == TileState::Revealed {
                self.threat_stale = true;
            }
        }
    }

    // ---- dead flag ----

    pub fn is_dead(&self, row: usize, col: usize) -> bool {
        self.tile(row, col).is_some_and(|t| t.dead)
    }

    /// Dead occupants no longer weigh on neighboring threat levels.
    pub fn mark_dead(&mut self, row: usize, col: usize) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.dead = true;
            self.threat_stale = true;
        }
    }

    /// Clears the dead flag when a transition installs a fresh occupant.
    pub(crate) fn revive(&mut self, row: usize, col: usize) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.dead = false;
            self.threat_stale = true;
        }
    }

    // ---- threat cache ----

    pub fn threat_level(&self, row: usize, col: usize) -> u32 {
        self.tile(row, col).map_or(0, |t| t.threat_level)
    }

    pub(crate) fn set_threat_level(&mut self, row: usize, col: usize, value: u32) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.threat_level = value;
        }
    }

    pub(crate) fn is_threat_stale(&self) -> bool {
        self.threat_stale
    }

    pub(crate) fn clear_threat_stale(&mut self) {
        self.threat_stale = false;
    }

    // ---- animations ----

    pub fn animation(&self, row: usize, col: usize) -> Option<&TileAnimation> {
        self.tile(row, col)?.animation.as_ref()
    }

    /// Starts a phase on a tile. Always overwrites whatever was running
    /// there (last-writer-wins); there is no queuing.
    pub fn start_animation(&mut self, row: usize, col: usize, phase: AnimationPhase, now: Instant) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.animation = Some(TileAnimation::new(phase, now));
        }
    }

    pub fn clear_animation(&mut self, row: usize, col: usize) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.animation = None;
        }
    }

    pub fn is_animating(&self, row: usize, col: usize) -> bool {
        self.animation(row, col).is_some()
    }

    /// True when an active animation on this tile swallows clicks.
    pub fn blocks_input(&self, row: usize, col: usize) -> bool {
        self.animation(row, col).is_some_and(|a| a.blocks_input)
    }

    // ---- annotations ----

    pub fn annotation(&self, row: usize, col: usize) -> Option<Annotation> {
        self.tile(row, col)?.annotation
    }

    pub fn set_annotation(&mut self, row: usize, col: usize, annotation: Annotation) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.annotation = Some(annotation);
        }
    }

    pub fn clear_annotation(&mut self, row: usize, col: usize) {
        if let Some(tile) = self.tile_mut(row, col) {
            tile.annotation = None;
        }
    }

    // ---- bulk operations ----

    /// Admin reveal: flips every tile to revealed and cancels animations.
    pub fn reveal_all(&mut self) {
        for row in &mut self.grid {
            for tile in row.iter_mut() {
                tile.state = TileState::Revealed;
                tile.animation = None;
            }
        }
        self.threat_stale = true;
    }

    /// Coordinates of all currently hidden tiles, in row-major order.
    pub fn hidden_positions(&self) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.tile_state(row, col) == TileState::Hidden {
                    positions.push((row, col));
                }
            }
        }
        positions
    }
}
