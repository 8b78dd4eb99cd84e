//! Physics-world contract.
//!
//! Simulation of bodies belongs to the host engine. The core only writes the
//! player's velocity and asks for entities to be disabled or removed.

use glam::Vec2;

use crate::entity::EntityId;

/// Host physics world as seen from the gameplay core.
pub trait PhysicsWorld {
    /// Overwrites the player body's velocity.
    fn set_player_velocity(&mut self, velocity: Vec2);

    /// Stops an entity's collider from producing contacts.
    fn disable_collider(&mut self, entity: EntityId);

    /// Removes an entity's body from the world.
    fn remove_entity(&mut self, entity: EntityId);

    /// Spawns a one-off visual effect at a position.
    fn spawn_effect(&mut self, position: Vec2);
}
