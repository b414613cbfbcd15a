//! The game session: one board, one player, one catalog, and the public
//! surface the presentation layer drives.
//!
//! All mutation funnels through `handle_click`, `tick` and the explicit
//! admin/reset operations, each of which leaves the threat cache fresh
//! before returning — callers never observe stale hint numbers.

use std::time::Instant;

use rand::Rng;

use crate::animation::AnimationPhase;
use crate::animation_logic::update_animations;
use crate::board::{Annotation, Board, TileState};
use crate::click_logic::{self, BoardEvent};
use crate::config::{ConfigError, GameConfig, MapLayout, PlayerConfig};
use crate::entities::{EntityCatalog, EntityDefinition};
use crate::player::PlayerStats;
use crate::threat::recompute_threat_levels;

/// Terminal defeat state; set once, cleared only by reset.
#[derive(Debug, Clone)]
pub struct GameOverInfo {
    pub cause: String,
}

pub struct GameSession {
    catalog: EntityCatalog,
    board: Board,
    player: PlayerStats,
    player_config: PlayerConfig,
    layouts: Vec<MapLayout>,
    current_layout: usize,
    game_over: Option<GameOverInfo>,
    victory: Option<String>,
    /// Unix timestamp of session start; display only.
    started_at: i64,
}

impl GameSession {
    /// Builds a session from a validated config and at least one layout.
    ///
    /// Every layout is checked against the board dimensions and the catalog
    /// up front; any failure aborts construction with no partial state.
    pub fn new(
        config: GameConfig,
        layouts: Vec<MapLayout>,
        current_time: i64,
    ) -> Result<Self, ConfigError> {
        let catalog = config.catalog()?;

        if layouts.is_empty() {
            return Err(ConfigError::NoLayouts);
        }
        for layout in &layouts {
            layout.validate(config.rows, config.cols, &catalog)?;
        }

        let mut session = Self {
            catalog,
            board: Board::new(config.rows, config.cols),
            player: PlayerStats::new(&config.game_state),
            player_config: config.game_state,
            layouts,
            current_layout: 0,
            game_over: None,
            victory: None,
            started_at: current_time,
        };
        session.install_layout(0)?;

        Ok(session)
    }

    fn install_layout(&mut self, index: usize) -> Result<(), ConfigError> {
        let layout = self
            .layouts
            .get(index)
            .ok_or(ConfigError::LayoutIndexOutOfRange(index))?;
        self.board.load_layout(layout)?;
        self.current_layout = index;
        self.sync_threat();
        Ok(())
    }

    fn sync_threat(&mut self) {
        if self.board.is_threat_stale() {
            recompute_threat_levels(&mut self.board, &self.catalog);
        }
    }

    /// Moves defeat/victory occurrences into the session flags. Each flag is
    /// raised at most once; a repeat occurrence is dropped from the event
    /// list so callers never see a second raise.
    fn absorb_terminal_events(&mut self, events: &mut Vec<BoardEvent>) {
        events.retain(|event| match event {
            BoardEvent::PlayerDied { cause } => {
                if self.game_over.is_none() {
                    self.game_over = Some(GameOverInfo {
                        cause: cause.clone(),
                    });
                    true
                } else {
                    false
                }
            }
            BoardEvent::VictoryAchieved { source } => {
                if self.victory.is_none() {
                    self.victory = Some(source.clone());
                    true
                } else {
                    false
                }
            }
            _ => true,
        });
    }

    // ---- entry points ----

    /// Resolves a click. Clicks are inert once the game is over; everything
    /// else is delegated to the click rules.
    pub fn handle_click<R: Rng>(
        &mut self,
        row: usize,
        col: usize,
        now: Instant,
        rng: &mut R,
    ) -> Vec<BoardEvent> {
        if self.game_over.is_some() {
            return Vec::new();
        }

        let mut events = click_logic::handle_click(
            &mut self.board,
            &self.catalog,
            &mut self.player,
            row,
            col,
            now,
            rng,
        );
        self.absorb_terminal_events(&mut events);
        self.sync_threat();
        events
    }

    /// Advances animations against the given clock. Runs even after game
    /// over so in-flight chains finish instead of freezing mid-phase; they
    /// can no longer touch player state.
    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Vec<BoardEvent> {
        let mut events = update_animations(&mut self.board, &self.catalog, now, rng);
        self.absorb_terminal_events(&mut events);
        self.sync_threat();
        events
    }

    /// Manual level-up; succeeds only when the experience bar is full.
    pub fn level_up(&mut self) -> Vec<BoardEvent> {
        if self.game_over.is_some() || !self.player.level_up() {
            return Vec::new();
        }
        vec![BoardEvent::LeveledUp {
            level: self.player.level,
        }]
    }

    // ---- map management ----

    /// Starts a fresh run on a random layout, preferring a different map
    /// from the current one when more than one is available.
    pub fn reset<R: Rng>(&mut self, current_time: i64, rng: &mut R) -> Result<(), ConfigError> {
        let index = if self.layouts.len() > 1 {
            let mut index = self.current_layout;
            while index == self.current_layout {
                index = rng.gen_range(0..self.layouts.len());
            }
            index
        } else {
            0
        };

        self.start_on_layout(index, current_time)
    }

    /// Starts a fresh run on a specific layout.
    pub fn load_map(&mut self, index: usize, current_time: i64) -> Result<(), ConfigError> {
        self.start_on_layout(index, current_time)
    }

    fn start_on_layout(&mut self, index: usize, current_time: i64) -> Result<(), ConfigError> {
        self.install_layout(index)?;
        self.player = PlayerStats::new(&self.player_config);
        self.game_over = None;
        self.victory = None;
        self.started_at = current_time;
        Ok(())
    }

    // ---- queries ----

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    pub fn entity_id(&self, row: usize, col: usize) -> u32 {
        self.board.entity_id(row, col)
    }

    pub fn tile_state(&self, row: usize, col: usize) -> TileState {
        self.board.tile_state(row, col)
    }

    pub fn is_dead(&self, row: usize, col: usize) -> bool {
        self.board.is_dead(row, col)
    }

    pub fn threat_level(&self, row: usize, col: usize) -> u32 {
        self.board.threat_level(row, col)
    }

    pub fn animation_phase(&self, row: usize, col: usize) -> Option<AnimationPhase> {
        self.board.animation(row, col).map(|a| a.phase)
    }

    pub fn annotation(&self, row: usize, col: usize) -> Option<Annotation> {
        self.board.annotation(row, col)
    }

    pub fn definition(&self, entity_id: u32) -> Option<&EntityDefinition> {
        self.catalog.lookup(entity_id)
    }

    pub fn definition_at(&self, row: usize, col: usize) -> Option<&EntityDefinition> {
        self.catalog.lookup(self.board.entity_id(row, col))
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn game_over(&self) -> Option<&GameOverInfo> {
        self.game_over.as_ref()
    }

    pub fn victory(&self) -> Option<&str> {
        self.victory.as_deref()
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    pub fn current_layout_index(&self) -> usize {
        self.current_layout
    }

    /// `(revealed, total)` tiles currently holding the entity, for the
    /// entities screen.
    pub fn entity_counts(&self, entity_id: u32) -> (usize, usize) {
        let mut revealed = 0;
        let mut total = 0;
        for row in 0..self.board.rows() {
            for col in 0..self.board.cols() {
                if self.board.entity_id(row, col) == entity_id {
                    total += 1;
                    if self.board.tile_state(row, col) == TileState::Revealed {
                        revealed += 1;
                    }
                }
            }
        }
        (revealed, total)
    }

    // ---- annotations ----

    /// Annotations only make sense on hidden tiles; anything else is a
    /// silent no-op.
    pub fn set_annotation(&mut self, row: usize, col: usize, annotation: Annotation) {
        if self.board.tile_state(row, col) == TileState::Hidden {
            self.board.set_annotation(row, col, annotation);
        }
    }

    pub fn clear_annotation(&mut self, row: usize, col: usize) {
        self.board.clear_annotation(row, col);
    }

    // ---- admin / testing operations ----

    /// Reveals the whole board immediately, cancelling animations.
    pub fn reveal_all(&mut self) {
        self.board.reveal_all();
        self.sync_threat();
    }

    /// Places an entity directly. Unknown ids are rejected so the board can
    /// never reference something the catalog cannot describe.
    pub fn force_set_entity(&mut self, row: usize, col: usize, entity_id: u32) -> bool {
        if !self.catalog.contains(entity_id) {
            return false;
        }
        self.board.set_entity_id(row, col, entity_id);
        self.sync_threat();
        true
    }

    /// Starts a cosmetic animation phase on a tile; used by the presentation
    /// layer (e.g. the dying fade on the killer tile).
    pub fn start_animation(&mut self, row: usize, col: usize, phase: AnimationPhase, now: Instant) {
        self.board.start_animation(row, col, phase, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{builtin_game_config, builtin_layouts};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn session() -> GameSession {
        GameSession::new(builtin_game_config(), builtin_layouts(), 0).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_new_session() {
        let session = session();

        assert_eq!(session.rows(), 10);
        assert_eq!(session.cols(), 14);
        assert!(session.game_over().is_none());
        assert!(session.victory().is_none());
        assert_eq!(session.player().level, 1);
        assert_eq!(session.layout_count(), 2);

        // Everything starts hidden
        for row in 0..session.rows() {
            for col in 0..session.cols() {
                assert_eq!(session.tile_state(row, col), TileState::Hidden);
            }
        }
    }

    #[test]
    fn test_new_rejects_empty_layouts() {
        let result = GameSession::new(builtin_game_config(), Vec::new(), 0);
        assert!(matches!(result, Err(ConfigError::NoLayouts)));
    }

    #[test]
    fn test_new_rejects_mismatched_layout() {
        let bad = MapLayout {
            id: Uuid::new_v4(),
            cells: vec![vec![0, 0], vec![0, 0]],
        };
        let result = GameSession::new(builtin_game_config(), vec![bad], 0);
        assert!(matches!(
            result,
            Err(ConfigError::LayoutDimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_threat_levels_fresh_after_construction() {
        let session = session();

        // Spot-check one hint against a manual recount
        let mut expected = 0;
        for (n_row, n_col) in crate::threat::get_neighbors(0, 0, 10, 14) {
            let def = session.definition_at(n_row, n_col).unwrap();
            if !def.is_neutral() {
                expected += def.level;
            }
        }
        assert_eq!(session.threat_level(0, 0), expected);
    }

    #[test]
    fn test_game_over_blocks_further_clicks() {
        let mut session = session();
        let mut rng = rng();
        let now = Instant::now();

        // A mine (level 10) against 8 starting health is always lethal
        session.force_set_entity(0, 0, crate::constants::MINE_ENTITY_ID);
        let events = session.handle_click(0, 0, now, &mut rng);
        assert!(events
            .iter()
            .any(|e| matches!(e, BoardEvent::PlayerDied { .. })));
        assert_eq!(session.game_over().unwrap().cause, "Explosive Mine");

        // Subsequent clicks do nothing at all
        let events = session.handle_click(0, 1, now, &mut rng);
        assert!(events.is_empty());
        assert_eq!(session.tile_state(0, 1), TileState::Hidden);
    }

    #[test]
    fn test_reset_clears_flags_and_switches_layout() {
        let mut session = session();
        let mut rng = rng();

        session.force_set_entity(0, 0, crate::constants::MINE_ENTITY_ID);
        session.handle_click(0, 0, Instant::now(), &mut rng);
        assert!(session.game_over().is_some());

        let before = session.current_layout_index();
        session.reset(100, &mut rng).unwrap();

        assert!(session.game_over().is_none());
        assert!(session.victory().is_none());
        assert_ne!(session.current_layout_index(), before);
        assert_eq!(session.player().health, session.player().max_health);
        assert_eq!(session.started_at(), 100);
        assert_eq!(hidden_count(&session), session.rows() * session.cols());
    }

    #[test]
    fn test_load_map_out_of_range() {
        let mut session = session();
        assert!(matches!(
            session.load_map(99, 0),
            Err(ConfigError::LayoutIndexOutOfRange(99))
        ));
        // Session still usable on the old map
        assert_eq!(session.current_layout_index(), 0);
    }

    #[test]
    fn test_entity_counts() {
        let mut session = session();
        let rat = crate::constants::RAT_ENTITY_ID;

        let (revealed, total) = session.entity_counts(rat);
        assert!(total > 0);
        assert_eq!(revealed, 0);

        session.reveal_all();
        let (revealed_after, total_after) = session.entity_counts(rat);
        assert_eq!(total_after, total);
        assert_eq!(revealed_after, total);
    }

    #[test]
    fn test_annotations_only_on_hidden_tiles() {
        let mut session = session();

        session.set_annotation(0, 0, Annotation::Danger);
        assert_eq!(session.annotation(0, 0), Some(Annotation::Danger));

        session.reveal_all();
        session.set_annotation(0, 1, Annotation::Friendly);
        assert!(session.annotation(0, 1).is_none());
    }

    #[test]
    fn test_force_set_entity_rejects_unknown_ids() {
        let mut session = session();
        assert!(!session.force_set_entity(0, 0, 999));
        assert!(session.force_set_entity(0, 0, crate::constants::RAT_ENTITY_ID));
        assert_eq!(session.entity_id(0, 0), crate::constants::RAT_ENTITY_ID);
    }

    #[test]
    fn test_kill_updates_neighbor_threat() {
        let mut session = session();
        let mut rng = rng();

        // Build a known neighborhood: a lone bat next to an empty tile
        for row in 0..3 {
            for col in 0..3 {
                session.force_set_entity(row, col, 0);
            }
        }
        session.force_set_entity(0, 0, 3); // bat, level 2
        assert_eq!(session.threat_level(1, 1), 2);

        session.handle_click(0, 0, Instant::now(), &mut rng);
        assert_eq!(
            session.threat_level(1, 1),
            0,
            "dead neighbor stops contributing"
        );
    }

    #[test]
    fn test_level_up_through_session() {
        let mut session = session();
        assert!(session.level_up().is_empty(), "bar not full yet");

        // Six rat kills fill the level-1 bar exactly
        for col in 0..6 {
            session.force_set_entity(9, col, crate::constants::RAT_ENTITY_ID);
            session.handle_click(9, col, Instant::now(), &mut rng());
        }
        assert!(session.player().can_level_up());
        let events = session.level_up();
        assert_eq!(events, vec![BoardEvent::LeveledUp { level: 2 }]);
    }

    fn hidden_count(session: &GameSession) -> usize {
        let mut count = 0;
        for row in 0..session.rows() {
            for col in 0..session.cols() {
                if session.tile_state(row, col) == TileState::Hidden {
                    count += 1;
                }
            }
        }
        count
    }
}
