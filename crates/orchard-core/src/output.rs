//! Commands the resolver emits for the host to carry out.
//!
//! The resolver never touches the physics world, the audio device or the
//! screen itself. Every side effect is described as a [`Command`] (or a
//! [`MovementCommand`] for input) and applied by the
//! [`Session`](crate::session::Session) in emission order.
//!
//! # Example
//!
//! ```
//! use orchard_core::output::{Command, Summary};
//! use orchard_core::audio::Cue;
//!
//! let commands = vec![
//!     Command::PlayCue(Cue::PlayerWin),
//!     Command::StopMusic,
//!     Command::Pause,
//!     Command::ShowWin(Summary { items: 7, lives: 2 }),
//! ];
//!
//! assert!(commands.iter().any(Command::is_terminal));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::entity::EntityId;

/// Which way the player sprite faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Facing left (sprite flipped)
    Left,
    /// Facing right
    #[default]
    Right,
}

impl Facing {
    /// Horizontal sign of this facing.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Final counts shown on a terminal overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Items collected
    pub items: u32,
    /// Lives left
    pub lives: u32,
}

/// Movement produced by a touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementCommand {
    /// Double tap while grounded.
    Jump {
        /// New player velocity (horizontal preserved)
        velocity: Vec2,
    },
    /// Held touch on one half of the screen.
    Run {
        /// New player velocity (vertical preserved)
        velocity: Vec2,
        /// New sprite facing
        facing: Facing,
    },
}

impl MovementCommand {
    /// Returns the velocity to write to the player body.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        match self {
            Self::Jump { velocity } | Self::Run { velocity, .. } => *velocity,
        }
    }

    /// Returns the cue that accompanies this movement, if any.
    #[must_use]
    pub const fn cue(&self) -> Option<Cue> {
        match self {
            Self::Jump { .. } => Some(Cue::Jump),
            Self::Run { .. } => None,
        }
    }

    /// Returns the new facing, if this movement changes it.
    #[must_use]
    pub const fn facing(&self) -> Option<Facing> {
        match self {
            Self::Jump { .. } => None,
            Self::Run { facing, .. } => Some(*facing),
        }
    }
}

/// A side effect requested by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Write a new player velocity.
    SetVelocity(Vec2),
    /// Fire a one-shot sound cue.
    PlayCue(Cue),
    /// Stop background music.
    StopMusic,
    /// Freeze all further input, collision and timer processing.
    Pause,
    /// Update the item counter.
    ShowItems(u32),
    /// Update the life counter.
    ShowLives(u32),
    /// Show the game-over overlay.
    ShowGameOver(Summary),
    /// Show the win overlay.
    ShowWin(Summary),
    /// Remove an entity from the world (collected item).
    RemoveEntity(EntityId),
    /// Defeat an enemy that was stomped.
    HitEnemy(EntityId),
}

impl Command {
    /// Returns `true` for the overlays that end a session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::ShowGameOver(_) | Self::ShowWin(_))
    }

    /// Returns the entity this command targets, if any.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::RemoveEntity(id) | Self::HitEnemy(id) => Some(*id),
            _ => None,
        }
    }
}
