//! Ready-made collaborator implementations.
//!
//! - [`Recorder`]: captures every call as a [`SinkCall`] for later inspection
//!   or serialization (transcripts, tests).
//! - [`LogSink`]: reports every call through `tracing`, for headless hosts.
//!
//! Both implement [`AudioSink`], [`PresentationSink`] and [`PhysicsWorld`], so a
//! single instance can stand in for all three collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audio::{AudioSink, Channel, Cue, MusicTrack};
use crate::entity::EntityId;
use crate::output::{Facing, Summary};
use crate::physics::PhysicsWorld;
use crate::presentation::PresentationSink;

/// One collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkCall {
    /// [`AudioSink::play_cue`]
    Cue(Cue),
    /// [`AudioSink::play_music`]
    PlayMusic(MusicTrack),
    /// [`AudioSink::stop_music`]
    StopMusic,
    /// [`AudioSink::set_channel_db`]
    ChannelDb(Channel, f32),
    /// [`PresentationSink::show_items`]
    ShowItems(u32),
    /// [`PresentationSink::show_lives`]
    ShowLives(u32),
    /// [`PresentationSink::show_facing`]
    ShowFacing(Facing),
    /// [`PresentationSink::show_game_over`]
    GameOver(Summary),
    /// [`PresentationSink::show_win`]
    Win(Summary),
    /// [`PresentationSink::hide_overlays`]
    HideOverlays,
    /// [`PhysicsWorld::set_player_velocity`]
    SetVelocity(Vec2),
    /// [`PhysicsWorld::disable_collider`]
    DisableCollider(EntityId),
    /// [`PhysicsWorld::remove_entity`]
    RemoveEntity(EntityId),
    /// [`PhysicsWorld::spawn_effect`]
    SpawnEffect(Vec2),
}

/// Shared, cloneable call log. Clones append to the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<SinkCall>>>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: SinkCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Returns a copy of every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.borrow().clone()
    }

    /// Drains the log.
    pub fn take(&self) -> Vec<SinkCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Counts calls matching a predicate.
    #[must_use]
    pub fn count(&self, pred: impl Fn(&SinkCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Returns `true` if any call equals `call`.
    #[must_use]
    pub fn contains(&self, call: &SinkCall) -> bool {
        self.calls.borrow().contains(call)
    }
}

impl AudioSink for Recorder {
    fn play_cue(&mut self, cue: Cue) {
        self.push(SinkCall::Cue(cue));
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.push(SinkCall::PlayMusic(track));
    }

    fn stop_music(&mut self) {
        self.push(SinkCall::StopMusic);
    }

    fn set_channel_db(&mut self, channel: Channel, db: f32) {
        self.push(SinkCall::ChannelDb(channel, db));
    }
}

impl PresentationSink for Recorder {
    fn show_items(&mut self, items: u32) {
        self.push(SinkCall::ShowItems(items));
    }

    fn show_lives(&mut self, lives: u32) {
        self.push(SinkCall::ShowLives(lives));
    }

    fn show_facing(&mut self, facing: Facing) {
        self.push(SinkCall::ShowFacing(facing));
    }

    fn show_game_over(&mut self, summary: Summary) {
        self.push(SinkCall::GameOver(summary));
    }

    fn show_win(&mut self, summary: Summary) {
        self.push(SinkCall::Win(summary));
    }

    fn hide_overlays(&mut self) {
        self.push(SinkCall::HideOverlays);
    }
}

impl PhysicsWorld for Recorder {
    fn set_player_velocity(&mut self, velocity: Vec2) {
        self.push(SinkCall::SetVelocity(velocity));
    }

    fn disable_collider(&mut self, entity: EntityId) {
        self.push(SinkCall::DisableCollider(entity));
    }

    fn remove_entity(&mut self, entity: EntityId) {
        self.push(SinkCall::RemoveEntity(entity));
    }

    fn spawn_effect(&mut self, position: Vec2) {
        self.push(SinkCall::SpawnEffect(position));
    }
}

/// Collaborator that logs every call at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_cue(&mut self, cue: Cue) {
        info!(target: "orchard::audio", %cue, "cue");
    }

    fn play_music(&mut self, track: MusicTrack) {
        info!(target: "orchard::audio", ?track, "music started");
    }

    fn stop_music(&mut self) {
        info!(target: "orchard::audio", "music stopped");
    }

    fn set_channel_db(&mut self, channel: Channel, db: f32) {
        info!(target: "orchard::audio", ?channel, db, "channel gain");
    }
}

impl PresentationSink for LogSink {
    fn show_items(&mut self, items: u32) {
        info!(target: "orchard::hud", items, "items");
    }

    fn show_lives(&mut self, lives: u32) {
        info!(target: "orchard::hud", lives, "lives");
    }

    fn show_facing(&mut self, facing: Facing) {
        info!(target: "orchard::hud", ?facing, "facing");
    }

    fn show_game_over(&mut self, summary: Summary) {
        info!(target: "orchard::hud", items = summary.items, lives = summary.lives, "GAME OVER");
    }

    fn show_win(&mut self, summary: Summary) {
        info!(target: "orchard::hud", items = summary.items, lives = summary.lives, "WIN");
    }

    fn hide_overlays(&mut self) {
        info!(target: "orchard::hud", "overlays hidden");
    }
}

impl PhysicsWorld for LogSink {
    fn set_player_velocity(&mut self, velocity: Vec2) {
        info!(target: "orchard::physics", x = velocity.x, y = velocity.y, "player velocity");
    }

    fn disable_collider(&mut self, entity: EntityId) {
        info!(target: "orchard::physics", %entity, "collider disabled");
    }

    fn remove_entity(&mut self, entity: EntityId) {
        info!(target: "orchard::physics", %entity, "entity removed");
    }

    fn spawn_effect(&mut self, position: Vec2) {
        info!(target: "orchard::physics", x = position.x, y = position.y, "effect spawned");
    }
}
