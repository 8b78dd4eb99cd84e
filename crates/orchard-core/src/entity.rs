//! Entity module for the level registry.
//!
//! This module provides the core entity types the gameplay core reasons about:
//! - [`EntityId`]: Unique identifier for entities
//! - [`EntityTag`]: Gameplay classification used to route contacts
//! - [`Capabilities`]: Typed capability set resolved once per entity
//! - [`Entity`]: The complete entity record
//!
//! # Architecture
//!
//! The host engine only ever hands the core an [`EntityId`]. Everything else
//! (what the entity is, whether it can still collide, where it stands) is
//! looked up in the [`EntityRegistry`](crate::registry::EntityRegistry) when a
//! [`CollisionEvent`](crate::event::CollisionEvent) is built, never queried
//! ad hoc by the resolver.
//!
//! # Example
//!
//! ```
//! use orchard_core::entity::{Capabilities, Entity, EntityId, EntityTag};
//! use glam::Vec2;
//!
//! let ninja = Entity::new(EntityId::new(7), EntityTag::ActiveEnemy, Vec2::ZERO);
//!
//! assert_eq!(ninja.id().as_u64(), 7);
//! assert!(ninja.capabilities().contains(Capabilities::STOMPABLE));
//! ```

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Ids are assigned
/// monotonically by the registry and never reused within a level, so a stale
/// id simply resolves to nothing.
///
/// # Example
///
/// ```
/// use orchard_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Gameplay tag of an entity.
///
/// The tag decides which contact rule the resolver applies. `Untagged`
/// covers scenery the player may touch but that carries no rule; contacts
/// with it are ignored. Unrecognized tags on the wire also decode to
/// `Untagged`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTag {
    /// Walkable surface; touching it grounds the player
    Ground,
    /// Enemy that always hurts on contact unless landed on squarely
    PassiveEnemy,
    /// Enemy that can be defeated by a stomp
    ActiveEnemy,
    /// Patrol turn-around marker for enemies
    Waypoint,
    /// Collectible (apple)
    Item,
    /// Anything without a gameplay rule
    #[serde(other)]
    Untagged,
}

impl EntityTag {
    /// Returns the default capability set for entities with this tag.
    #[must_use]
    pub const fn default_capabilities(self) -> Capabilities {
        match self {
            Self::Ground => Capabilities::SOLID,
            Self::PassiveEnemy => Capabilities::SOLID.union(Capabilities::DAMAGING),
            Self::ActiveEnemy => Capabilities::SOLID
                .union(Capabilities::DAMAGING)
                .union(Capabilities::STOMPABLE),
            Self::Waypoint => Capabilities::PATROL_MARKER,
            Self::Item => Capabilities::COLLECTIBLE,
            Self::Untagged => Capabilities::SOLID,
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => write!(f, "Ground"),
            Self::PassiveEnemy => write!(f, "PassiveEnemy"),
            Self::ActiveEnemy => write!(f, "ActiveEnemy"),
            Self::Waypoint => write!(f, "Waypoint"),
            Self::Item => write!(f, "Item"),
            Self::Untagged => write!(f, "Untagged"),
        }
    }
}

bitflags! {
    /// Capabilities an entity currently exposes to the player.
    ///
    /// Capabilities start from [`EntityTag::default_capabilities`] and can
    /// only be taken away (a stomped ninja loses `SOLID`, `DAMAGING` and
    /// `STOMPABLE` at once).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Produces collision contacts with the player
        const SOLID = 0b0000_0001;
        /// Costs the player a life on contact
        const DAMAGING = 0b0000_0010;
        /// Can be defeated from above
        const STOMPABLE = 0b0000_0100;
        /// Produces trigger contacts that award an item
        const COLLECTIBLE = 0b0000_1000;
        /// Reverses patrolling enemies
        const PATROL_MARKER = 0b0001_0000;
    }
}

impl Capabilities {
    /// Returns `true` if the player can currently touch this entity at all.
    #[must_use]
    pub const fn is_touchable(self) -> bool {
        self.intersects(Self::SOLID.union(Self::COLLECTIBLE))
    }
}

/// A single entity in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    capabilities: Capabilities,
    /// World position, kept in sync by the host.
    pub position: Vec2,
}

impl Entity {
    /// Creates an entity with the default capabilities of its tag.
    #[must_use]
    pub const fn new(id: EntityId, tag: EntityTag, position: Vec2) -> Self {
        Self {
            id,
            tag,
            capabilities: tag.default_capabilities(),
            position,
        }
    }

    /// Returns the entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Returns the entity's current capability set.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Removes capabilities from the entity.
    pub fn revoke(&mut self, caps: Capabilities) {
        self.capabilities.remove(caps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod entity_id_tests {
        use super::*;

        #[test]
        fn ordering_follows_raw_value() {
            assert!(EntityId::new(1) < EntityId::new(2));
            assert_eq!(u64::from(EntityId::from(5)), 5);
        }

        #[test]
        fn debug_and_display() {
            let id = EntityId::new(42);
            assert_eq!(format!("{id:?}"), "EntityId(42)");
            assert_eq!(format!("{id}"), "42");
        }
    }

    mod capability_tests {
        use super::*;

        #[test]
        fn active_enemy_is_stompable() {
            let caps = EntityTag::ActiveEnemy.default_capabilities();
            assert!(caps.contains(Capabilities::STOMPABLE | Capabilities::DAMAGING));
        }

        #[test]
        fn passive_enemy_is_not_stompable() {
            let caps = EntityTag::PassiveEnemy.default_capabilities();
            assert!(!caps.contains(Capabilities::STOMPABLE));
        }

        #[test]
        fn waypoint_is_not_touchable() {
            assert!(!EntityTag::Waypoint.default_capabilities().is_touchable());
            assert!(EntityTag::Item.default_capabilities().is_touchable());
        }

        #[test]
        fn revoke_removes_flags() {
            let mut ninja = Entity::new(EntityId::new(1), EntityTag::ActiveEnemy, Vec2::ZERO);
            ninja.revoke(Capabilities::all());
            assert!(ninja.capabilities().is_empty());
            assert!(!ninja.capabilities().is_touchable());
        }
    }

    #[test]
    fn tag_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&EntityTag::PassiveEnemy).unwrap();
        assert_eq!(json, "\"passive_enemy\"");
        let tag: EntityTag = serde_json::from_str("\"item\"").unwrap();
        assert_eq!(tag, EntityTag::Item);
    }

    #[test]
    fn unknown_tag_decodes_as_untagged() {
        let tag: EntityTag = serde_json::from_str("\"lava\"").unwrap();
        assert_eq!(tag, EntityTag::Untagged);
    }
}
