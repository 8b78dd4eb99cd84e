//! # Orchard Core
//!
//! Gameplay core for Orchard, a 2D touch platformer: run, double-tap to jump,
//! stomp ninjas, collect seven apples before running out of lives.
//!
//! The crate is engine-free. Physics, rendering and sound playback live in a
//! host; the core receives typed events and answers with commands.
//!
//! ## Architecture
//!
//! - **Entities**: tagged, capability-flagged level objects in an
//!   [`EntityRegistry`](registry::EntityRegistry)
//! - **Resolver**: [`PlayerStateResolver`](resolver::PlayerStateResolver)
//!   turns taps and contacts into player state changes and [`Command`]s
//! - **Agents**: [`EnemyAgent`](enemy::EnemyAgent) implementations patrol and
//!   react to being hit
//! - **Session**: [`Session`] applies commands to the audio, presentation and
//!   physics collaborators and runs deferred removals
//!
//! ## Usage
//!
//! ```
//! use orchard_core::{FrameInput, LevelLayout, Session, TapEvent, Tuning};
//!
//! let mut session = Session::new(Tuning::default(), LevelLayout::default());
//! session.start();
//!
//! let frame = FrameInput {
//!     taps: vec![TapEvent::stationary(0.0, 900.0)],
//!     ..FrameInput::default()
//! };
//! session.tick(1.0 / 60.0, &frame);
//! assert_eq!(session.state().velocity.x, 3.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core modules
pub mod entity;
pub mod event;
pub mod output;
pub mod registry;
pub mod resolver;

// Collaborators
pub mod audio;
pub mod physics;
pub mod presentation;
pub mod settings;
pub mod sinks;

// Level and session
pub mod enemy;
pub mod level;
pub mod schedule;
pub mod session;

// Ambient
pub mod config;
pub mod error;

pub use config::Tuning;
pub use entity::{EntityId, EntityTag};
pub use error::{ConfigError, OrchardError, SettingsError};
pub use event::{CollisionEvent, Contact, ContactPhase, FrameInput, TapEvent};
pub use level::LevelLayout;
pub use output::{Command, MovementCommand};
pub use resolver::{Outcome, PlayerState, PlayerStateResolver};
pub use session::Session;

#[cfg(test)]
mod tests;
