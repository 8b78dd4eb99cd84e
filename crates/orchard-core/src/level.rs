//! Level layouts.
//!
//! A [`LevelLayout`] is the serializable description of a level: static
//! entities, patrolling enemies and the player spawn. Building it yields a
//! fresh [`Level`] (registry plus enemy agents). Restarting a level rebuilds
//! it from the same layout, so collected items and defeated enemies return.
//!
//! # Example
//!
//! ```
//! use orchard_core::config::Tuning;
//! use orchard_core::entity::EntityTag;
//! use orchard_core::level::{LevelLayout, Placement};
//! use glam::Vec2;
//!
//! let layout = LevelLayout {
//!     entities: vec![Placement::named("apple-1", EntityTag::Item, Vec2::new(3.0, 1.0))],
//!     ..LevelLayout::default()
//! };
//! let level = layout.build(&Tuning::default());
//!
//! let apple = level.entity_named("apple-1").unwrap();
//! assert_eq!(level.registry.get(apple).unwrap().tag(), EntityTag::Item);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::enemy::{EnemyAgent, Ninja};
use crate::entity::{EntityId, EntityTag};
use crate::registry::EntityRegistry;

/// A static entity in a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Optional name hosts use to refer to the entity
    #[serde(default)]
    pub name: Option<String>,
    /// Gameplay tag
    pub tag: EntityTag,
    /// World position
    pub position: Vec2,
}

impl Placement {
    /// An unnamed placement.
    #[must_use]
    pub fn new(tag: EntityTag, position: Vec2) -> Self {
        Self {
            name: None,
            tag,
            position,
        }
    }

    /// A named placement.
    #[must_use]
    pub fn named(name: &str, tag: EntityTag, position: Vec2) -> Self {
        Self {
            name: Some(name.to_string()),
            tag,
            position,
        }
    }
}

fn default_enemy_tag() -> EntityTag {
    EntityTag::ActiveEnemy
}

fn default_true() -> bool {
    true
}

/// A patrolling enemy in a layout.
///
/// The enemy starts on its first waypoint and heads for the second. Each
/// waypoint also becomes a `Waypoint` entity in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NinjaPlacement {
    /// Optional name hosts use to refer to the enemy
    #[serde(default)]
    pub name: Option<String>,
    /// `ActiveEnemy` (stompable) or `PassiveEnemy`
    #[serde(default = "default_enemy_tag")]
    pub tag: EntityTag,
    /// Ordered patrol points
    pub waypoints: Vec<Vec2>,
    /// Spawn a defeat effect when stomped
    #[serde(default = "default_true")]
    pub effect: bool,
}

/// Serializable description of a level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Player spawn point
    #[serde(default)]
    pub player_spawn: Vec2,
    /// Static entities
    #[serde(default)]
    pub entities: Vec<Placement>,
    /// Patrolling enemies
    #[serde(default)]
    pub ninjas: Vec<NinjaPlacement>,
}

impl LevelLayout {
    /// Builds a fresh level. Entity ids are assigned in layout order, so the
    /// same layout always yields the same ids.
    #[must_use]
    pub fn build(&self, tuning: &Tuning) -> Level {
        let mut level = Level {
            registry: EntityRegistry::new(),
            enemies: BTreeMap::new(),
            names: BTreeMap::new(),
            player_spawn: self.player_spawn,
        };

        for placement in &self.entities {
            let id = level.registry.spawn(placement.tag, placement.position);
            level.name(placement.name.as_deref(), id);
        }

        for ninja in &self.ninjas {
            let start = ninja.waypoints.first().copied().unwrap_or(Vec2::ZERO);
            let id = level.registry.spawn(ninja.tag, start);
            for waypoint in &ninja.waypoints {
                level.registry.spawn(EntityTag::Waypoint, *waypoint);
            }
            // Patrol begins by heading for the second waypoint, still facing left.
            let mut agent = Ninja::new(id, start, ninja.waypoints.clone(), tuning.ninja_speed)
                .with_effect(ninja.effect)
                .with_removal_delay(tuning.enemy_removal_delay);
            if ninja.waypoints.len() > 1 {
                agent.advance_waypoint();
            }
            level.enemies.insert(id, Box::new(agent));
            level.name(ninja.name.as_deref(), id);
        }

        level
    }
}

/// A built level: registry, enemy agents and entity names.
pub struct Level {
    /// Every non-player entity
    pub registry: EntityRegistry,
    /// Enemy agents keyed by their entity
    pub enemies: BTreeMap<EntityId, Box<dyn EnemyAgent>>,
    names: BTreeMap<String, EntityId>,
    player_spawn: Vec2,
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("registry", &self.registry)
            .field("enemies", &format!("[{} enemies]", self.enemies.len()))
            .field("names", &self.names)
            .field("player_spawn", &self.player_spawn)
            .finish()
    }
}

impl Level {
    fn name(&mut self, name: Option<&str>, id: EntityId) {
        if let Some(name) = name {
            self.names.insert(name.to_string(), id);
        }
    }

    /// Looks up an entity by its layout name.
    #[must_use]
    pub fn entity_named(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Player spawn point.
    #[must_use]
    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn
    }

    /// Removes an entity and its agent, if any.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.enemies.remove(&id);
        self.registry.despawn(id).is_some()
    }
}
