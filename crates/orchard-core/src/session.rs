//! Frame-synchronous host loop.
//!
//! The `Session` wires the [`PlayerStateResolver`] to a built [`Level`] and to
//! the external collaborators, and applies every command the resolver emits.
//!
//! # Frame Order
//!
//! Each [`Session::tick`] runs, in order:
//!
//! 1. **SYNC**: copy the player body state reported by physics
//! 2. **INPUT**: resolve touch samples into movement
//! 3. **CONTACTS**: resolve player contacts into commands, applied immediately
//! 4. **ENEMIES**: waypoint triggers, then patrol steps
//! 5. **TIMERS**: advance the session clock and run due deferred tasks
//!
//! A `Pause` command stops the frame where it is; nothing further is processed
//! until the level is restarted. Opening the settings menu pauses the same
//! way but is undone by closing it.
//!
//! # Collaborators
//!
//! Audio, presentation and physics are optional. A missing collaborator turns
//! the corresponding commands into no-ops.
//!
//! # Example
//!
//! ```
//! use orchard_core::config::Tuning;
//! use orchard_core::entity::EntityTag;
//! use orchard_core::event::{Contact, ContactPhase, FrameInput};
//! use orchard_core::level::{LevelLayout, Placement};
//! use orchard_core::session::Session;
//! use glam::Vec2;
//!
//! let layout = LevelLayout {
//!     entities: vec![Placement::named("apple", EntityTag::Item, Vec2::new(1.0, 0.0))],
//!     ..LevelLayout::default()
//! };
//! let mut session = Session::new(Tuning::default(), layout);
//! let apple = session.entity_named("apple").unwrap();
//!
//! let frame = FrameInput {
//!     contacts: vec![Contact { other: apple, normal_y: 0.0, phase: ContactPhase::Enter }],
//!     ..FrameInput::default()
//! };
//! session.tick(1.0 / 60.0, &frame);
//!
//! assert_eq!(session.state().items_collected, 1);
//! assert!(session.entity_named("apple").map_or(true, |id| !session.registry().contains(id)));
//! ```

use glam::Vec2;
use tracing::{debug, info, trace};

use crate::audio::{AudioController, Cue, MusicTrack};
use crate::config::Tuning;
use crate::enemy::EnemyAgent;
use crate::entity::{EntityId, EntityTag};
use crate::error::SettingsError;
use crate::event::{CollisionEvent, Contact, FrameInput, TapEvent};
use crate::level::{Level, LevelLayout};
use crate::output::{Command, MovementCommand, Summary};
use crate::physics::PhysicsWorld;
use crate::presentation::PresentationSink;
use crate::registry::EntityRegistry;
use crate::resolver::{Outcome, PlayerState, PlayerStateResolver};
use crate::schedule::{DeferredQueue, DeferredTask};

/// One play session of one level.
pub struct Session {
    layout: LevelLayout,
    level: Level,
    resolver: PlayerStateResolver,
    deferred: DeferredQueue,
    audio: Option<AudioController>,
    presentation: Option<Box<dyn PresentationSink>>,
    physics: Option<Box<dyn PhysicsWorld>>,
    /// Scaled session time; frozen while paused.
    clock: f64,
    frame: u64,
    /// Set by a `Pause` command; cleared only by a restart.
    paused: bool,
    settings_open: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("level", &self.level)
            .field("resolver", &self.resolver)
            .field("deferred", &self.deferred)
            .field("audio", &self.audio)
            .field("presentation", &self.presentation.is_some())
            .field("physics", &self.physics.is_some())
            .field("clock", &self.clock)
            .field("frame", &self.frame)
            .field("paused", &self.paused)
            .field("settings_open", &self.settings_open)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session with no collaborators attached.
    #[must_use]
    pub fn new(tuning: Tuning, layout: LevelLayout) -> Self {
        let level = layout.build(&tuning);
        let mut resolver = PlayerStateResolver::new(tuning);
        resolver.sync_body(level.player_spawn(), Vec2::ZERO);
        Self {
            layout,
            level,
            resolver,
            deferred: DeferredQueue::new(),
            audio: None,
            presentation: None,
            physics: None,
            clock: 0.0,
            frame: 0,
            paused: false,
            settings_open: false,
        }
    }

    /// Attaches an audio controller.
    #[must_use]
    pub fn with_audio(mut self, audio: AudioController) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Attaches a presentation sink.
    #[must_use]
    pub fn with_presentation(mut self, presentation: Box<dyn PresentationSink>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Attaches a physics world.
    #[must_use]
    pub fn with_physics(mut self, physics: Box<dyn PhysicsWorld>) -> Self {
        self.physics = Some(physics);
        self
    }

    /// Publishes the starting HUD and starts the level music.
    pub fn start(&mut self) {
        self.publish_counters();
        if let Some(audio) = &mut self.audio {
            audio.start(MusicTrack::Level);
        }
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Runs one frame. Does nothing while paused.
    pub fn tick(&mut self, dt: f32, input: &FrameInput) {
        if self.is_paused() {
            trace!(frame = self.frame, "tick skipped while paused");
            return;
        }

        if let Some((position, velocity)) = input.player_body {
            self.resolver.sync_body(position, velocity);
        }

        for tap in &input.taps {
            self.dispatch_tap(*tap);
        }

        for contact in &input.contacts {
            if self.paused {
                break;
            }
            self.dispatch_contact(*contact);
        }
        if self.paused {
            return;
        }

        for &(enemy, marker) in &input.waypoint_hits {
            self.waypoint_hit(enemy, marker);
        }
        self.step_enemies(dt);

        self.clock += f64::from(dt);
        for (entity, task) in self.deferred.poll(self.clock) {
            self.run_deferred(entity, task);
        }
        self.frame += 1;
    }

    /// Resolves a touch sample and applies the resulting movement.
    pub fn dispatch_tap(&mut self, tap: TapEvent) -> Option<MovementCommand> {
        if self.is_paused() {
            return None;
        }
        let movement = self.resolver.handle_input(tap)?;
        if let Some(physics) = &mut self.physics {
            physics.set_player_velocity(movement.velocity());
        }
        if let Some(facing) = movement.facing() {
            if let Some(presentation) = &mut self.presentation {
                presentation.show_facing(facing);
            }
        }
        if let Some(cue) = movement.cue() {
            self.play_cue(cue);
        }
        Some(movement)
    }

    /// Looks up a raw contact in the registry and dispatches it.
    ///
    /// Contacts with removed or disabled entities are dropped.
    pub fn dispatch_contact(&mut self, contact: Contact) -> Vec<Command> {
        match self
            .level
            .registry
            .contact(contact.other, contact.normal_y, contact.phase)
        {
            Some(event) => self.dispatch_collision(&event),
            None => Vec::new(),
        }
    }

    /// Resolves a typed collision event and applies every resulting command.
    pub fn dispatch_collision(&mut self, event: &CollisionEvent) -> Vec<Command> {
        if self.is_paused() {
            return Vec::new();
        }
        let commands = self.resolver.handle_collision(event);
        for command in &commands {
            self.apply(*command);
        }
        commands
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetVelocity(velocity) => {
                if let Some(physics) = &mut self.physics {
                    physics.set_player_velocity(velocity);
                }
            }
            Command::PlayCue(cue) => self.play_cue(cue),
            Command::StopMusic => {
                if let Some(audio) = &mut self.audio {
                    audio.stop_music();
                }
            }
            Command::Pause => {
                info!(frame = self.frame, outcome = ?self.resolver.outcome(), "session paused");
                self.paused = true;
            }
            Command::ShowItems(items) => {
                if let Some(presentation) = &mut self.presentation {
                    presentation.show_items(items);
                }
            }
            Command::ShowLives(lives) => {
                if let Some(presentation) = &mut self.presentation {
                    presentation.show_lives(lives);
                }
            }
            Command::ShowGameOver(summary) => {
                if let Some(presentation) = &mut self.presentation {
                    presentation.show_game_over(summary);
                }
            }
            Command::ShowWin(summary) => {
                if let Some(presentation) = &mut self.presentation {
                    presentation.show_win(summary);
                }
            }
            Command::RemoveEntity(entity) => self.remove_entity(entity),
            Command::HitEnemy(entity) => self.hit_enemy(entity),
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        if let Some(audio) = &mut self.audio {
            audio.play_cue(cue);
        }
    }

    fn remove_entity(&mut self, entity: EntityId) {
        self.deferred.cancel(entity);
        if self.level.remove(entity) {
            if let Some(physics) = &mut self.physics {
                physics.remove_entity(entity);
            }
        }
    }

    fn hit_enemy(&mut self, entity: EntityId) {
        let Some(agent) = self.level.enemies.get_mut(&entity) else {
            debug!(%entity, "stomped entity has no agent");
            return;
        };
        let Some(reaction) = agent.hit() else {
            return;
        };

        self.level.registry.disable_collision(entity);
        if let Some(physics) = &mut self.physics {
            physics.disable_collider(entity);
            if let Some(position) = reaction.effect_at {
                physics.spawn_effect(position);
            }
        }
        self.play_cue(reaction.cue);
        self.deferred
            .schedule(entity, self.clock, reaction.remove_after, DeferredTask::Despawn);
    }

    fn waypoint_hit(&mut self, enemy: EntityId, marker: EntityId) {
        let is_marker = self
            .level
            .registry
            .get(marker)
            .is_some_and(|e| e.tag() == EntityTag::Waypoint);
        if !is_marker {
            trace!(%enemy, %marker, "trigger is not a waypoint");
            return;
        }
        if let Some(agent) = self.level.enemies.get_mut(&enemy) {
            agent.on_waypoint_enter();
        }
    }

    fn step_enemies(&mut self, dt: f32) {
        for agent in self.level.enemies.values_mut() {
            agent.step(dt);
            self.level.registry.set_position(agent.entity(), agent.position());
        }
    }

    fn run_deferred(&mut self, entity: EntityId, task: DeferredTask) {
        match task {
            DeferredTask::Despawn => {
                debug!(%entity, "deferred despawn");
                self.remove_entity(entity);
            }
        }
    }

    // =========================================================================
    // Menu flow
    // =========================================================================

    /// Opens the in-level settings menu: pauses and silences effects.
    pub fn open_settings(&mut self) {
        self.play_cue(Cue::Click);
        self.settings_open = true;
        if let Some(audio) = &mut self.audio {
            audio.stop_sounds();
        }
    }

    /// Closes the settings menu: resumes and restores effects.
    pub fn close_settings(&mut self) {
        self.play_cue(Cue::Click);
        self.settings_open = false;
        if let Some(audio) = &mut self.audio {
            audio.play_sounds();
        }
    }

    /// Rebuilds the level from its layout and starts over.
    pub fn restart_level(&mut self) {
        self.play_cue(Cue::Click);
        info!(outcome = ?self.resolver.outcome(), "level restarted");

        self.level = self.layout.build(self.resolver.tuning());
        self.resolver.reset();
        self.resolver.sync_body(self.level.player_spawn(), Vec2::ZERO);
        self.deferred.clear();
        self.clock = 0.0;
        self.paused = false;
        self.settings_open = false;

        if let Some(presentation) = &mut self.presentation {
            presentation.hide_overlays();
        }
        self.publish_counters();
        if let Some(audio) = &mut self.audio {
            audio.play_music(MusicTrack::Level);
            audio.play_sounds();
        }
    }

    /// Toggles background music.
    pub fn switch_music(&mut self) {
        if let Some(audio) = &mut self.audio {
            audio.switch_music();
        }
    }

    /// Sets and persists the music volume.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the volume could not be persisted.
    pub fn set_music_volume(&mut self, volume: f32) -> Result<(), SettingsError> {
        match &mut self.audio {
            Some(audio) => audio.set_music_volume(volume),
            None => Ok(()),
        }
    }

    /// Sets and persists the sound-effect volume.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the volume could not be persisted.
    pub fn set_sound_volume(&mut self, volume: f32) -> Result<(), SettingsError> {
        match &mut self.audio {
            Some(audio) => audio.set_sound_volume(volume),
            None => Ok(()),
        }
    }

    fn publish_counters(&mut self) {
        let summary = self.resolver.summary();
        if let Some(presentation) = &mut self.presentation {
            presentation.show_items(summary.items);
            presentation.show_lives(summary.lives);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Player state.
    #[must_use]
    pub fn state(&self) -> &PlayerState {
        self.resolver.state()
    }

    /// Session outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.resolver.outcome()
    }

    /// Current counts.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.resolver.summary()
    }

    /// The resolver.
    #[must_use]
    pub fn resolver(&self) -> &PlayerStateResolver {
        &self.resolver
    }

    /// The level's entity registry.
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.level.registry
    }

    /// Looks up an entity by layout name.
    #[must_use]
    pub fn entity_named(&self, name: &str) -> Option<EntityId> {
        self.level.entity_named(name)
    }

    /// The agent animating an enemy entity.
    #[must_use]
    pub fn enemy(&self, entity: EntityId) -> Option<&dyn EnemyAgent> {
        self.level.enemies.get(&entity).map(AsRef::as_ref)
    }

    /// Iterates enemy agents in entity order.
    pub fn enemies(&self) -> impl Iterator<Item = &(dyn EnemyAgent + 'static)> {
        self.level.enemies.values().map(AsRef::as_ref)
    }

    /// The audio controller, if attached.
    #[must_use]
    pub fn audio(&self) -> Option<&AudioController> {
        self.audio.as_ref()
    }

    /// Pending deferred tasks.
    #[must_use]
    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    /// `true` after a terminal outcome or while the settings menu is open.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused || self.settings_open
    }

    /// `true` while the settings menu is open.
    #[must_use]
    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    /// Scaled session time in seconds.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Number of frames run.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
