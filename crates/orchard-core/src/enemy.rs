//! Enemy agents.
//!
//! The resolver only needs one capability from an enemy: being hit from
//! above. [`EnemyAgent`] captures that plus the patrol hooks the session
//! drives each tick. [`Ninja`] is the shipped implementation.
//!
//! # Patrol
//!
//! A ninja walks towards its current waypoint at constant speed without ever
//! overshooting it. Each time it enters a waypoint trigger it targets the
//! next waypoint (cyclically) and turns around.
//!
//! # Example
//!
//! ```
//! use orchard_core::enemy::{EnemyAgent, Ninja};
//! use orchard_core::entity::EntityId;
//! use glam::Vec2;
//!
//! let mut ninja = Ninja::new(
//!     EntityId::new(1),
//!     Vec2::ZERO,
//!     vec![Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0)],
//!     1.0,
//! );
//! ninja.step(0.5);
//! assert_eq!(ninja.position(), Vec2::new(-0.5, 0.0));
//!
//! let reaction = ninja.hit().unwrap();
//! assert_eq!(reaction.remove_after, 0.5);
//! assert!(ninja.hit().is_none());
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::Cue;
use crate::entity::EntityId;
use crate::output::Facing;

/// Delay between a stomp and the enemy's removal, in seconds.
pub const DEFAULT_REMOVAL_DELAY: f32 = 0.5;

/// What the host must do after an enemy is hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitReaction {
    /// Cue to play
    pub cue: Cue,
    /// Where to spawn the defeat effect, if the enemy has one
    pub effect_at: Option<Vec2>,
    /// Seconds until the enemy is removed from the world
    pub remove_after: f32,
}

/// An enemy driven by the session.
pub trait EnemyAgent {
    /// The registry entity this agent animates.
    fn entity(&self) -> EntityId;

    /// Current world position.
    fn position(&self) -> Vec2;

    /// Current facing.
    fn facing(&self) -> Facing;

    /// `false` once hit.
    fn is_active(&self) -> bool;

    /// Advances the patrol by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Called when the agent enters a patrol-marker trigger.
    fn on_waypoint_enter(&mut self);

    /// Defeats the agent. Returns `None` if it was already defeated.
    ///
    /// Must not block: removal is the caller's job, after
    /// [`HitReaction::remove_after`].
    fn hit(&mut self) -> Option<HitReaction>;
}

/// Moves `from` towards `to` by at most `max_delta`.
#[must_use]
pub fn move_towards(from: Vec2, to: Vec2, max_delta: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        to
    } else {
        from + offset / distance * max_delta
    }
}

/// Patrolling ninja.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ninja {
    entity: EntityId,
    position: Vec2,
    waypoints: Vec<Vec2>,
    speed: f32,
    current: usize,
    moving_left: bool,
    active: bool,
    spawns_effect: bool,
    removal_delay: f32,
}

impl Ninja {
    /// Creates an active ninja heading for its first waypoint.
    #[must_use]
    pub fn new(entity: EntityId, position: Vec2, waypoints: Vec<Vec2>, speed: f32) -> Self {
        Self {
            entity,
            position,
            waypoints,
            speed,
            current: 0,
            moving_left: true,
            active: true,
            spawns_effect: true,
            removal_delay: DEFAULT_REMOVAL_DELAY,
        }
    }

    /// Sets whether a defeat effect is spawned on hit.
    #[must_use]
    pub fn with_effect(mut self, spawns_effect: bool) -> Self {
        self.spawns_effect = spawns_effect;
        self
    }

    /// Sets the delay between hit and removal.
    #[must_use]
    pub fn with_removal_delay(mut self, delay: f32) -> Self {
        self.removal_delay = delay;
        self
    }

    /// The waypoint currently targeted, if any.
    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.waypoints.get(self.current).copied()
    }

    /// Targets the next waypoint (cyclically) without turning around.
    pub fn advance_waypoint(&mut self) {
        if !self.waypoints.is_empty() {
            self.current = (self.current + 1) % self.waypoints.len();
        }
    }

    /// Returns `true` if the ninja stands on its target waypoint.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.target()
            .is_some_and(|target| self.position.distance_squared(target) <= f32::EPSILON)
    }
}

impl EnemyAgent for Ninja {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn facing(&self) -> Facing {
        if self.moving_left {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn step(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        if let Some(target) = self.target() {
            self.position = move_towards(self.position, target, self.speed * dt);
        }
    }

    fn on_waypoint_enter(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.advance_waypoint();
        self.moving_left = !self.moving_left;
    }

    fn hit(&mut self) -> Option<HitReaction> {
        if !self.active {
            return None;
        }
        self.active = false;
        debug!(entity = %self.entity, "ninja hit");
        Some(HitReaction {
            cue: Cue::HitEnemy,
            effect_at: self.spawns_effect.then_some(self.position),
            remove_after: self.removal_delay,
        })
    }
}
