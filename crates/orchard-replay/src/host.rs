//! Headless stand-ins for the engine side of a session.

use std::collections::BTreeSet;

use glam::Vec2;

use orchard_core::audio::{AudioSink, Channel, Cue, MusicTrack};
use orchard_core::entity::{EntityId, EntityTag};
use orchard_core::output::{Facing, Summary};
use orchard_core::physics::PhysicsWorld;
use orchard_core::presentation::PresentationSink;
use orchard_core::session::Session;
use orchard_core::sinks::{LogSink, Recorder};

/// Trigger overlap distance.
const TRIGGER_RADIUS: f32 = 1e-3;

/// Collaborator that logs every call and optionally records it.
#[derive(Debug, Clone, Default)]
pub struct ReplayHost {
    log: LogSink,
    recorder: Option<Recorder>,
}

impl ReplayHost {
    pub fn new(recorder: Option<Recorder>) -> Self {
        Self {
            log: LogSink,
            recorder,
        }
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn Sink)) {
        f(&mut self.log);
        if let Some(recorder) = &mut self.recorder {
            f(recorder);
        }
    }
}

trait Sink: AudioSink + PresentationSink + PhysicsWorld {}

impl<T: AudioSink + PresentationSink + PhysicsWorld> Sink for T {}

impl AudioSink for ReplayHost {
    fn play_cue(&mut self, cue: Cue) {
        self.each(|s| s.play_cue(cue));
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.each(|s| s.play_music(track));
    }

    fn stop_music(&mut self) {
        self.each(|s| AudioSink::stop_music(s));
    }

    fn set_channel_db(&mut self, channel: Channel, db: f32) {
        self.each(|s| s.set_channel_db(channel, db));
    }
}

impl PresentationSink for ReplayHost {
    fn show_items(&mut self, items: u32) {
        self.each(|s| s.show_items(items));
    }

    fn show_lives(&mut self, lives: u32) {
        self.each(|s| s.show_lives(lives));
    }

    fn show_facing(&mut self, facing: Facing) {
        self.each(|s| s.show_facing(facing));
    }

    fn show_game_over(&mut self, summary: Summary) {
        self.each(|s| s.show_game_over(summary));
    }

    fn show_win(&mut self, summary: Summary) {
        self.each(|s| s.show_win(summary));
    }

    fn hide_overlays(&mut self) {
        self.each(|s| s.hide_overlays());
    }
}

impl PhysicsWorld for ReplayHost {
    fn set_player_velocity(&mut self, velocity: Vec2) {
        self.each(|s| s.set_player_velocity(velocity));
    }

    fn disable_collider(&mut self, entity: EntityId) {
        self.each(|s| s.disable_collider(entity));
    }

    fn remove_entity(&mut self, entity: EntityId) {
        self.each(|s| PhysicsWorld::remove_entity(s, entity));
    }

    fn spawn_effect(&mut self, position: Vec2) {
        self.each(|s| s.spawn_effect(position));
    }
}

/// Emulates enemy-versus-waypoint trigger volumes.
///
/// An `(enemy, marker)` pair fires once when the enemy comes to stand on the
/// marker, and again only after it has left.
#[derive(Debug, Clone, Default)]
pub struct WaypointTriggers {
    inside: BTreeSet<(EntityId, EntityId)>,
}

impl WaypointTriggers {
    /// Starts tracking with every current overlap already inside.
    pub fn new(session: &Session) -> Self {
        Self {
            inside: overlaps(session),
        }
    }

    /// Returns the pairs that entered since the last call.
    pub fn entered(&mut self, session: &Session) -> Vec<(EntityId, EntityId)> {
        let now = overlaps(session);
        let entered = now.difference(&self.inside).copied().collect();
        self.inside = now;
        entered
    }
}

fn overlaps(session: &Session) -> BTreeSet<(EntityId, EntityId)> {
    let registry = session.registry();
    let markers: Vec<(EntityId, Vec2)> = registry
        .ids_with_tag(EntityTag::Waypoint)
        .filter_map(|id| registry.get(id).map(|e| (id, e.position)))
        .collect();
    let markers = &markers;

    session
        .enemies()
        .filter(|enemy| enemy.is_active())
        .flat_map(move |enemy| {
            let at = enemy.position();
            markers
                .iter()
                .filter(move |(_, marker)| marker.distance(at) <= TRIGGER_RADIUS)
                .map(move |(marker, _)| (enemy.entity(), *marker))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::config::Tuning;
    use orchard_core::event::FrameInput;
    use orchard_core::level::{LevelLayout, NinjaPlacement};
    use orchard_core::sinks::SinkCall;

    fn patrol_session() -> Session {
        Session::new(
            Tuning::default(),
            LevelLayout {
                ninjas: vec![NinjaPlacement {
                    name: Some("ninja".into()),
                    tag: EntityTag::ActiveEnemy,
                    waypoints: vec![Vec2::ZERO, Vec2::new(1.0, 0.0)],
                    effect: false,
                }],
                ..LevelLayout::default()
            },
        )
    }

    #[test]
    fn spawn_overlap_does_not_fire() {
        let session = patrol_session();
        let mut triggers = WaypointTriggers::new(&session);
        assert!(triggers.entered(&session).is_empty());
    }

    #[test]
    fn arrival_fires_once() {
        let mut session = patrol_session();
        let mut triggers = WaypointTriggers::new(&session);

        session.tick(1.0, &FrameInput::default());
        assert!(triggers.entered(&session).is_empty());

        session.tick(1.0, &FrameInput::default());
        let entered = triggers.entered(&session);
        assert_eq!(entered.len(), 1);

        session.tick(0.0, &FrameInput::default());
        assert!(triggers.entered(&session).is_empty());
    }

    #[test]
    fn host_records_when_asked() {
        let recorder = Recorder::new();
        let mut host = ReplayHost::new(Some(recorder.clone()));
        host.play_cue(Cue::Jump);
        host.show_items(2);
        assert_eq!(
            recorder.calls(),
            vec![SinkCall::Cue(Cue::Jump), SinkCall::ShowItems(2)]
        );
    }
}
