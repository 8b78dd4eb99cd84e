//! Entity registry for a single level.
//!
//! The registry is the container for every non-player entity in a level. It
//! provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Capability revocation (a stomped enemy stops colliding)
//! - Construction of typed [`CollisionEvent`]s from raw host contacts
//!
//! # Example
//!
//! ```
//! use orchard_core::registry::EntityRegistry;
//! use orchard_core::entity::EntityTag;
//! use orchard_core::event::ContactPhase;
//! use glam::Vec2;
//!
//! let mut registry = EntityRegistry::new();
//! let apple = registry.spawn(EntityTag::Item, Vec2::new(4.0, 1.0));
//!
//! let event = registry.contact(apple, 0.0, ContactPhase::Enter).unwrap();
//! assert_eq!(event.tag, EntityTag::Item);
//! assert_eq!(event.other_position, Vec2::new(4.0, 1.0));
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::{Capabilities, Entity, EntityId, EntityTag};
use crate::event::{CollisionEvent, ContactPhase};

/// All entities of a level, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an entity and returns its id.
    pub fn spawn(&mut self, tag: EntityTag, position: Vec2) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, tag, position));
        id
    }

    /// Removes an entity. Returns the removed record, if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns the entity with the given id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to the entity with the given id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if the entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Updates an entity's position. Returns `false` for unknown ids.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.position = position;
                true
            }
            None => false,
        }
    }

    /// Stops an entity from producing any further player contacts.
    pub fn disable_collision(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.revoke(
                Capabilities::SOLID
                    | Capabilities::DAMAGING
                    | Capabilities::STOMPABLE
                    | Capabilities::COLLECTIBLE,
            );
        }
    }

    /// Builds a typed collision event from a raw contact.
    ///
    /// Returns `None` when the entity is unknown (already removed) or can no
    /// longer be touched. Exits are still reported for entities that lost
    /// their collision so ground contact counts stay balanced.
    #[must_use]
    pub fn contact(&self, id: EntityId, normal_y: f32, phase: ContactPhase) -> Option<CollisionEvent> {
        let Some(entity) = self.entities.get(&id) else {
            trace!(entity = %id, "contact with unknown entity ignored");
            return None;
        };
        match phase {
            ContactPhase::Enter if !entity.capabilities().is_touchable() => {
                trace!(entity = %id, tag = %entity.tag(), "contact with disabled entity ignored");
                None
            }
            ContactPhase::Enter => Some(CollisionEvent::enter(
                id,
                entity.tag(),
                normal_y,
                entity.position,
            )),
            ContactPhase::Exit => Some(CollisionEvent::exit(id, entity.tag(), entity.position)),
        }
    }

    /// Returns the ids of all entities with the given tag, in id order.
    pub fn ids_with_tag(&self, tag: EntityTag) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .values()
            .filter(move |e| e.tag() == tag)
            .map(Entity::id)
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the registry holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn spawn_assigns_monotonic_ids() {
            let mut registry = EntityRegistry::new();
            let a = registry.spawn(EntityTag::Ground, Vec2::ZERO);
            let b = registry.spawn(EntityTag::Item, Vec2::ONE);
            assert!(a < b);
            assert_eq!(registry.len(), 2);
        }

        #[test]
        fn despawn_does_not_reuse_ids() {
            let mut registry = EntityRegistry::new();
            let a = registry.spawn(EntityTag::Item, Vec2::ZERO);
            assert!(registry.despawn(a).is_some());
            let b = registry.spawn(EntityTag::Item, Vec2::ZERO);
            assert_ne!(a, b);
            assert!(registry.despawn(a).is_none());
        }

        #[test]
        fn ids_with_tag_filters_in_order() {
            let mut registry = EntityRegistry::new();
            let a1 = registry.spawn(EntityTag::Item, Vec2::ZERO);
            registry.spawn(EntityTag::Ground, Vec2::ZERO);
            let a2 = registry.spawn(EntityTag::Item, Vec2::ZERO);
            let items: Vec<_> = registry.ids_with_tag(EntityTag::Item).collect();
            assert_eq!(items, vec![a1, a2]);
        }

        #[test]
        fn get_mut_edits_in_place() {
            let mut registry = EntityRegistry::new();
            let apple = registry.spawn(EntityTag::Item, Vec2::ZERO);
            if let Some(entity) = registry.get_mut(apple) {
                entity.position = Vec2::new(1.0, 2.0);
            }
            assert_eq!(registry.get(apple).map(|e| e.position), Some(Vec2::new(1.0, 2.0)));
        }

        #[test]
        fn set_position_on_unknown_id_reports_false() {
            let mut registry = EntityRegistry::new();
            assert!(!registry.set_position(EntityId::new(9), Vec2::ONE));
        }
    }

    mod contact_tests {
        use super::*;

        #[test]
        fn unknown_entity_produces_no_event() {
            let registry = EntityRegistry::new();
            assert!(registry
                .contact(EntityId::new(3), 0.0, ContactPhase::Enter)
                .is_none());
        }

        #[test]
        fn disabled_enemy_produces_no_enter() {
            let mut registry = EntityRegistry::new();
            let ninja = registry.spawn(EntityTag::ActiveEnemy, Vec2::ZERO);
            registry.disable_collision(ninja);
            assert!(registry.contact(ninja, 0.9, ContactPhase::Enter).is_none());
        }

        #[test]
        fn disabled_entity_still_reports_exit() {
            let mut registry = EntityRegistry::new();
            let ground = registry.spawn(EntityTag::Ground, Vec2::ZERO);
            registry.disable_collision(ground);
            let event = registry.contact(ground, 0.0, ContactPhase::Exit).unwrap();
            assert!(!event.is_enter());
        }

        #[test]
        fn enter_carries_normal_and_position() {
            let mut registry = EntityRegistry::new();
            let ninja = registry.spawn(EntityTag::PassiveEnemy, Vec2::new(2.0, 0.5));
            let event = registry.contact(ninja, -0.8, ContactPhase::Enter).unwrap();
            assert_eq!(event.tag, EntityTag::PassiveEnemy);
            assert!((event.contact_normal_y + 0.8).abs() < f32::EPSILON);
            assert_eq!(event.other_position, Vec2::new(2.0, 0.5));
        }
    }
}
