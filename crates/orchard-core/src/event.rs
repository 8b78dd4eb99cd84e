//! Input and contact events consumed by the resolver.
//!
//! Events are transient: the host builds them once per physics step or input
//! sample, hands them to the [`Session`](crate::session::Session) and drops
//! them. Both event types are plain data and serializable so scenarios can be
//! recorded and replayed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityTag};

/// Phase of a touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapPhase {
    /// Finger just touched the screen
    Began,
    /// Finger is held still
    Stationary,
}

/// A single touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapEvent {
    /// Host clock time of the sample, in seconds
    pub timestamp: f32,
    /// Horizontal screen position in pixels
    pub screen_x: f32,
    /// Touch phase
    pub phase: TapPhase,
}

impl TapEvent {
    /// A `Began` tap at the given time and screen position.
    #[must_use]
    pub const fn began(timestamp: f32, screen_x: f32) -> Self {
        Self {
            timestamp,
            screen_x,
            phase: TapPhase::Began,
        }
    }

    /// A `Stationary` hold at the given time and screen position.
    #[must_use]
    pub const fn stationary(timestamp: f32, screen_x: f32) -> Self {
        Self {
            timestamp,
            screen_x,
            phase: TapPhase::Stationary,
        }
    }
}

/// Whether a contact started or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPhase {
    /// Contact started this step
    Enter,
    /// Contact ended this step
    Exit,
}

/// A collision or trigger contact between the player and another entity.
///
/// `contact_normal_y` is the vertical component of the contact normal as seen
/// from the player: close to `1.0` when the player lands on top of the other
/// entity, close to `-1.0` when it hits it from below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// The entity the player touched
    pub other: EntityId,
    /// Tag of that entity, resolved when the event was built
    pub tag: EntityTag,
    /// Vertical component of the first contact normal
    pub contact_normal_y: f32,
    /// Position of the other entity at contact time
    pub other_position: Vec2,
    /// Enter or exit
    pub phase: ContactPhase,
}

impl CollisionEvent {
    /// Builds an `Enter` contact.
    #[must_use]
    pub const fn enter(other: EntityId, tag: EntityTag, normal_y: f32, other_position: Vec2) -> Self {
        Self {
            other,
            tag,
            contact_normal_y: normal_y,
            other_position,
            phase: ContactPhase::Enter,
        }
    }

    /// Builds an `Exit` contact.
    #[must_use]
    pub const fn exit(other: EntityId, tag: EntityTag, other_position: Vec2) -> Self {
        Self {
            other,
            tag,
            contact_normal_y: 0.0,
            other_position,
            phase: ContactPhase::Exit,
        }
    }

    /// Returns `true` for an `Enter` contact.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.phase == ContactPhase::Enter
    }
}

/// A raw contact reported by the physics host, before registry lookup.
///
/// The host only knows which entity it touched; the
/// [`EntityRegistry`](crate::registry::EntityRegistry) turns this into a
/// [`CollisionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// The entity the player touched
    pub other: EntityId,
    /// Vertical component of the first contact normal
    pub normal_y: f32,
    /// Enter or exit
    pub phase: ContactPhase,
}

/// All host input for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Touch samples, in the order they were read
    #[serde(default)]
    pub taps: Vec<TapEvent>,
    /// Player contacts reported by physics this step
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Patrol-marker triggers hit by enemies this step, as (enemy, marker)
    #[serde(default)]
    pub waypoint_hits: Vec<(EntityId, EntityId)>,
    /// Player body state after the physics step
    #[serde(default)]
    pub player_body: Option<(Vec2, Vec2)>,
}
