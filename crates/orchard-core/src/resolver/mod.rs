//! Player state resolution.
//!
//! [`PlayerStateResolver`] is the single authority that turns raw contacts and
//! touch samples into player health, score and terminal outcome. It owns the
//! [`PlayerState`] and is the only code that mutates it.
//!
//! # Architecture
//!
//! The resolver is a pure reaction function over typed events:
//! - [`PlayerStateResolver::handle_input`] maps a [`TapEvent`] to at most one
//!   [`MovementCommand`] (see `input`)
//! - [`PlayerStateResolver::handle_collision`] maps a [`CollisionEvent`] to a
//!   list of [`Command`]s (see `contact`)
//!
//! Side effects are never performed here; the
//! [`Session`](crate::session::Session) applies the returned commands.
//!
//! # Invariants
//!
//! - `lives_remaining` never underflows; reaching zero moves to
//!   [`Outcome::Lost`] exactly once
//! - `items_collected` never decreases; reaching the win threshold moves to
//!   [`Outcome::Won`] exactly once
//! - Once the outcome is terminal every entry point is inert until
//!   [`PlayerStateResolver::reset`]
//!
//! # Example
//!
//! ```
//! use orchard_core::config::Tuning;
//! use orchard_core::entity::{EntityId, EntityTag};
//! use orchard_core::event::{CollisionEvent, TapEvent};
//! use orchard_core::resolver::PlayerStateResolver;
//! use glam::Vec2;
//!
//! let mut resolver = PlayerStateResolver::new(Tuning::default());
//! let ground = EntityId::new(0);
//! resolver.handle_collision(&CollisionEvent::enter(ground, EntityTag::Ground, 1.0, Vec2::ZERO));
//!
//! assert!(resolver.handle_input(TapEvent::began(0.0, 100.0)).is_none());
//! assert!(resolver.handle_input(TapEvent::began(0.2, 100.0)).is_some());
//! ```

mod contact;
mod input;

pub use input::DoubleTapDetector;

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Tuning;
use crate::entity::EntityId;
use crate::event::{CollisionEvent, TapEvent};
use crate::output::{Command, Facing, MovementCommand, Summary};

/// Session outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Game in progress
    #[default]
    Playing,
    /// Out of lives
    Lost,
    /// Enough items collected
    Won,
}

impl Outcome {
    /// Returns `true` for `Lost` and `Won`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Everything the core knows about the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Body position, as last synced from physics
    pub position: Vec2,
    /// Body velocity, as last synced or written
    pub velocity: Vec2,
    /// Touching at least one ground entity
    pub is_grounded: bool,
    /// Lives left
    pub lives_remaining: u32,
    /// Items collected this session
    pub items_collected: u32,
    /// Session outcome
    pub outcome: Outcome,
    /// Sprite facing
    pub facing: Facing,
}

impl PlayerState {
    /// Fresh state at the start of a session.
    #[must_use]
    pub fn starting(tuning: &Tuning) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            is_grounded: false,
            lives_remaining: tuning.starting_lives,
            items_collected: 0,
            outcome: Outcome::Playing,
            facing: Facing::default(),
        }
    }

    /// Current counts as shown on overlays.
    #[must_use]
    pub const fn summary(&self) -> Summary {
        Summary {
            items: self.items_collected,
            lives: self.lives_remaining,
        }
    }
}

/// Decides how contacts and input change the player.
#[derive(Debug, Clone)]
pub struct PlayerStateResolver {
    tuning: Tuning,
    state: PlayerState,
    /// Ground entities currently in contact.
    ground_contacts: BTreeSet<EntityId>,
    taps: DoubleTapDetector,
}

impl PlayerStateResolver {
    /// Creates a resolver in the starting state.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        let state = PlayerState::starting(&tuning);
        let taps = DoubleTapDetector::new(tuning.double_tap_delay);
        Self {
            tuning,
            state,
            ground_contacts: BTreeSet::new(),
            taps,
        }
    }

    /// Returns the player state.
    #[must_use]
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Returns the tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Returns the session outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    /// Returns `true` while the session accepts events.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.outcome == Outcome::Playing
    }

    /// Returns the current counts.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.state.summary()
    }

    /// Copies the player body's position and velocity from physics.
    pub fn sync_body(&mut self, position: Vec2, velocity: Vec2) {
        if !self.is_playing() {
            return;
        }
        self.state.position = position;
        self.state.velocity = velocity;
    }

    /// Returns to the starting state. The only way out of `Lost` or `Won`.
    pub fn reset(&mut self) {
        debug!(outcome = ?self.state.outcome, "player state reset");
        self.state = PlayerState::starting(&self.tuning);
        self.ground_contacts.clear();
        self.taps.reset();
    }

    /// Reacts to one touch sample.
    ///
    /// Returns `None` for single taps, double taps while airborne and any
    /// sample received after the session ended.
    pub fn handle_input(&mut self, event: TapEvent) -> Option<MovementCommand> {
        if !self.is_playing() {
            trace!(?event, "input ignored after session end");
            return None;
        }
        let command = self.resolve_tap(event)?;
        self.state.velocity = command.velocity();
        if let Some(facing) = command.facing() {
            self.state.facing = facing;
        }
        Some(command)
    }

    /// Reacts to one contact.
    ///
    /// Returns the side effects in the order they must be applied. Contacts
    /// with untagged entities, waypoints and non-ground exits produce nothing.
    pub fn handle_collision(&mut self, event: &CollisionEvent) -> Vec<Command> {
        if !self.is_playing() {
            trace!(?event, "contact ignored after session end");
            return Vec::new();
        }
        let mut commands = Vec::new();
        self.resolve_contact(event, &mut commands);
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Cue;
    use crate::entity::EntityTag;
    use crate::event::ContactPhase;

    const GROUND: EntityId = EntityId::new(100);

    fn grounded_resolver() -> PlayerStateResolver {
        let mut resolver = PlayerStateResolver::new(Tuning::default());
        resolver.handle_collision(&CollisionEvent::enter(GROUND, EntityTag::Ground, 1.0, Vec2::ZERO));
        resolver
    }

    fn hurt(resolver: &mut PlayerStateResolver) -> Vec<Command> {
        resolver.handle_collision(&CollisionEvent::enter(
            EntityId::new(1),
            EntityTag::PassiveEnemy,
            0.0,
            Vec2::new(1.0, 0.0),
        ))
    }

    mod state_tests {
        use super::*;

        #[test]
        fn starts_playing_with_three_lives() {
            let resolver = PlayerStateResolver::new(Tuning::default());
            let state = resolver.state();
            assert_eq!(state.lives_remaining, 3);
            assert_eq!(state.items_collected, 0);
            assert_eq!(state.outcome, Outcome::Playing);
            assert!(!state.is_grounded);
        }

        #[test]
        fn sync_body_copies_physics() {
            let mut resolver = PlayerStateResolver::new(Tuning::default());
            resolver.sync_body(Vec2::new(2.0, 1.0), Vec2::new(0.5, -1.0));
            assert_eq!(resolver.state().position, Vec2::new(2.0, 1.0));
            assert_eq!(resolver.state().velocity, Vec2::new(0.5, -1.0));
        }

        #[test]
        fn terminal_outcomes() {
            assert!(!Outcome::Playing.is_terminal());
            assert!(Outcome::Lost.is_terminal());
            assert!(Outcome::Won.is_terminal());
        }
    }

    mod input_tests {
        use super::*;

        #[test]
        fn double_tap_within_window_jumps_once() {
            let mut resolver = grounded_resolver();
            assert!(resolver.handle_input(TapEvent::began(0.0, 10.0)).is_none());
            let jump = resolver.handle_input(TapEvent::began(0.2, 10.0)).unwrap();
            assert_eq!(jump.velocity().y, 3.0);
            assert_eq!(jump.cue(), Some(Cue::Jump));
        }

        #[test]
        fn taps_outside_window_do_not_jump() {
            let mut resolver = grounded_resolver();
            assert!(resolver.handle_input(TapEvent::began(0.0, 10.0)).is_none());
            assert!(resolver.handle_input(TapEvent::began(0.4, 10.0)).is_none());
        }

        #[test]
        fn airborne_double_tap_does_not_jump() {
            let mut resolver = PlayerStateResolver::new(Tuning::default());
            resolver.handle_input(TapEvent::began(0.0, 10.0));
            assert!(resolver.handle_input(TapEvent::began(0.1, 10.0)).is_none());
        }

        #[test]
        fn jump_preserves_horizontal_velocity() {
            let mut resolver = grounded_resolver();
            resolver.sync_body(Vec2::ZERO, Vec2::new(-3.0, 0.0));
            resolver.handle_input(TapEvent::began(1.0, 10.0));
            let jump = resolver.handle_input(TapEvent::began(1.1, 10.0)).unwrap();
            assert_eq!(jump.velocity(), Vec2::new(-3.0, 3.0));
        }

        #[test]
        fn hold_on_right_half_runs_right() {
            let mut resolver = PlayerStateResolver::new(Tuning::default());
            resolver.sync_body(Vec2::ZERO, Vec2::new(0.0, -2.0));
            let run = resolver.handle_input(TapEvent::stationary(0.0, 900.0)).unwrap();
            assert_eq!(run.velocity(), Vec2::new(3.0, -2.0));
            assert_eq!(resolver.state().facing, Facing::Right);
        }

        #[test]
        fn hold_on_left_half_runs_left_and_flips() {
            let mut resolver = PlayerStateResolver::new(Tuning::default());
            let run = resolver.handle_input(TapEvent::stationary(0.0, 100.0)).unwrap();
            assert_eq!(run.velocity().x, -3.0);
            assert_eq!(run.facing(), Some(Facing::Left));
            assert_eq!(resolver.state().facing, Facing::Left);
        }
    }

    mod terminal_tests {
        use super::*;

        #[test]
        fn third_hit_loses_exactly_once() {
            let mut resolver = PlayerStateResolver::new(Tuning::default());
            hurt(&mut resolver);
            hurt(&mut resolver);
            let commands = hurt(&mut resolver);
            assert_eq!(resolver.outcome(), Outcome::Lost);
            assert_eq!(commands.iter().filter(|c| c.is_terminal()).count(), 1);
            assert!(hurt(&mut resolver).is_empty());
            assert_eq!(resolver.state().lives_remaining, 0);
        }

        #[test]
        fn input_is_inert_after_loss() {
            let mut resolver = grounded_resolver();
            for _ in 0..3 {
                hurt(&mut resolver);
            }
            let before = resolver.state().clone();
            assert!(resolver.handle_input(TapEvent::stationary(0.0, 900.0)).is_none());
            resolver.sync_body(Vec2::splat(9.0), Vec2::splat(9.0));
            assert_eq!(resolver.state(), &before);
        }

        #[test]
        fn reset_returns_to_playing() {
            let mut resolver = grounded_resolver();
            for _ in 0..3 {
                hurt(&mut resolver);
            }
            resolver.reset();
            assert_eq!(resolver.state(), &PlayerState::starting(resolver.tuning()));
            assert!(!hurt(&mut resolver).is_empty());
        }

        #[test]
        fn ground_exit_ignored_after_loss() {
            let mut resolver = grounded_resolver();
            for _ in 0..3 {
                hurt(&mut resolver);
            }
            resolver.handle_collision(&CollisionEvent {
                phase: ContactPhase::Exit,
                ..CollisionEvent::enter(GROUND, EntityTag::Ground, 0.0, Vec2::ZERO)
            });
            assert!(resolver.state().is_grounded);
        }
    }
}
