//! Entity definitions and the immutable catalog they live in.
//!
//! Every tile on the board holds an entity id; the catalog maps ids to the
//! definition that drives combat, claiming, threat contribution and
//! transitions. Behavior is described by a small set of string tags so new
//! entities can be added through config without code changes.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::EMPTY_ENTITY_ID;

/// A single catalog entry describing one occupant type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Hostile strength: damage dealt, experience granted, and threat weight.
    /// Zero means non-hostile.
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fixed replacement installed once the entity is cleared, unless the
    /// transition policy has a special rule for this id.
    #[serde(default)]
    pub next_entity_id: Option<u32>,
}

impl EntityDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Clicking this entity fights it.
    pub fn is_enemy(&self) -> bool {
        self.has_tag("enemy")
    }

    /// Clicking this entity while revealed claims it.
    pub fn is_item(&self) -> bool {
        self.has_tag("item")
    }

    /// Revealed clicks are inert regardless of other tags.
    pub fn is_indestructible(&self) -> bool {
        self.has_tag("indestructible")
    }

    /// Neutral occupants never weigh on neighboring threat levels.
    pub fn is_neutral(&self) -> bool {
        self.has_tag("onReveal-neutral") || self.has_tag("no-experience")
    }

    /// Defeating this entity grants no experience.
    pub fn grants_no_experience(&self) -> bool {
        self.has_tag("no-experience")
    }

    /// Defeating or claiming this entity wins the game.
    pub fn triggers_win(&self) -> bool {
        self.has_tag("trigger-win-game")
    }
}

/// Immutable, validated table of entity definitions.
///
/// Built once at startup and passed by reference into the board logic; there
/// is no global catalog state.
#[derive(Debug, Clone)]
pub struct EntityCatalog {
    entities: Vec<EntityDefinition>,
}

impl EntityCatalog {
    /// Validates and wraps a list of definitions.
    ///
    /// Fails if two definitions share an id or if the empty entity (id 0)
    /// is missing — every hidden tile starts as empty, so a catalog without
    /// it cannot describe any board.
    pub fn new(entities: Vec<EntityDefinition>) -> Result<Self, ConfigError> {
        for (i, entity) in entities.iter().enumerate() {
            if entities[..i].iter().any(|other| other.id == entity.id) {
                return Err(ConfigError::DuplicateEntity(entity.id));
            }
        }

        if !entities.iter().any(|e| e.id == EMPTY_ENTITY_ID) {
            return Err(ConfigError::MissingEmptyEntity);
        }

        Ok(Self { entities })
    }

    pub fn lookup(&self, entity_id: u32) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.id == entity_id)
    }

    pub fn contains(&self, entity_id: u32) -> bool {
        self.lookup(entity_id).is_some()
    }

    /// All definitions in declaration order (for the entities screen).
    pub fn definitions(&self) -> &[EntityDefinition] {
        &self.entities
    }
}
