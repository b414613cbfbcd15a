//! Game configuration and map layout loading.
//!
//! Two JSON files drive a session: the game config (board dimensions,
//! starting player stats, the entity catalog) and a map file holding one or
//! more pre-authored board layouts. All validation happens at load time;
//! a bad file is a hard failure and never leaves partial state behind.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{
    DEFAULT_STARTING_LEVEL, DEFAULT_STARTING_MAX_EXPERIENCE, DEFAULT_STARTING_MAX_HEALTH,
};
use crate::entities::{EntityCatalog, EntityDefinition};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate entity id {0} in catalog")]
    DuplicateEntity(u32),
    #[error("catalog does not define the empty entity (id 0)")]
    MissingEmptyEntity,
    #[error("map {id} has ragged rows")]
    RaggedLayout { id: Uuid },
    #[error("map {id} is {rows}x{cols} but the board is {expected_rows}x{expected_cols}")]
    LayoutDimensionMismatch {
        id: Uuid,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("map {id} references unknown entity id {entity_id}")]
    UnknownEntity { id: Uuid, entity_id: u32 },
    #[error("no map layouts available")]
    NoLayouts,
    #[error("map index {0} out of range")]
    LayoutIndexOutOfRange(usize),
}

/// Starting player stats, nested under `game_state` in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_max_health")]
    pub starting_max_health: u32,
    #[serde(default = "default_max_experience")]
    pub starting_max_experience: u32,
    #[serde(default = "default_level")]
    pub starting_level: u32,
}

fn default_max_health() -> u32 {
    DEFAULT_STARTING_MAX_HEALTH
}

fn default_max_experience() -> u32 {
    DEFAULT_STARTING_MAX_EXPERIENCE
}

fn default_level() -> u32 {
    DEFAULT_STARTING_LEVEL
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_max_health: default_max_health(),
            starting_max_experience: default_max_experience(),
            starting_level: default_level(),
        }
    }
}

/// Top-level game configuration: board size, player start, entity catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub game_state: PlayerConfig,
    pub entities: Vec<EntityDefinition>,
}

impl GameConfig {
    /// Builds the validated entity catalog from this config.
    pub fn catalog(&self) -> Result<EntityCatalog, ConfigError> {
        EntityCatalog::new(self.entities.clone())
    }
}

/// One pre-authored board: a grid of entity ids under a stable identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLayout {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(rename = "board")]
    pub cells: Vec<Vec<u32>>,
}

impl MapLayout {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }

    /// Checks shape and entity references against the active config.
    pub fn validate(
        &self,
        expected_rows: usize,
        expected_cols: usize,
        catalog: &EntityCatalog,
    ) -> Result<(), ConfigError> {
        let cols = self.cols();
        if self.cells.iter().any(|row| row.len() != cols) {
            return Err(ConfigError::RaggedLayout { id: self.id });
        }

        if self.rows() != expected_rows || cols != expected_cols {
            return Err(ConfigError::LayoutDimensionMismatch {
                id: self.id,
                rows: self.rows(),
                cols,
                expected_rows,
                expected_cols,
            });
        }

        for row in &self.cells {
            for &entity_id in row {
                if !catalog.contains(entity_id) {
                    return Err(ConfigError::UnknownEntity {
                        id: self.id,
                        entity_id,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Parses a game config from JSON text; `origin` names the source in errors.
pub fn parse_game_config(json: &str, origin: &str) -> Result<GameConfig, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })
}

/// Parses a JSON array of map layouts; `origin` names the source in errors.
pub fn parse_layouts(json: &str, origin: &str) -> Result<Vec<MapLayout>, ConfigError> {
    let layouts: Vec<MapLayout> =
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;

    if layouts.is_empty() {
        return Err(ConfigError::NoLayouts);
    }

    Ok(layouts)
}

pub fn load_game_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_game_config(&contents, &path.display().to_string())
}

pub fn load_layouts(path: &Path) -> Result<Vec<MapLayout>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_layouts(&contents, &path.display().to_string())
}
