//! Test helper functions for building levels and wired sessions.

use glam::Vec2;

use crate::audio::AudioController;
use crate::config::Tuning;
use crate::entity::{EntityId, EntityTag};
use crate::event::{Contact, ContactPhase, FrameInput, TapEvent};
use crate::level::{LevelLayout, NinjaPlacement, Placement};
use crate::output::Command;
use crate::session::Session;
use crate::settings::MemorySettingsStore;
use crate::sinks::Recorder;

/// Frame duration used by scenario tests.
pub const DT: f32 = 1.0 / 60.0;

// =============================================================================
// Layouts
// =============================================================================

/// The standard test level.
///
/// - `ground` at the origin, player spawn just above it
/// - `apple-0` .. `apple-6` in a row at y = 1
/// - `ninja`: an active enemy patrolling between (4, 0) and (8, 0)
/// - `spikes`: a passive enemy at (-3, 0)
pub fn orchard_layout() -> LevelLayout {
    let mut entities = vec![
        Placement::named("ground", EntityTag::Ground, Vec2::ZERO),
        Placement::named("spikes", EntityTag::PassiveEnemy, Vec2::new(-3.0, 0.0)),
    ];
    #[allow(clippy::cast_precision_loss)]
    entities.extend((0..7).map(|i| {
        Placement::named(
            &format!("apple-{i}"),
            EntityTag::Item,
            Vec2::new(10.0 + i as f32, 1.0),
        )
    }));

    LevelLayout {
        player_spawn: Vec2::new(0.0, 1.0),
        entities,
        ninjas: vec![NinjaPlacement {
            name: Some("ninja".into()),
            tag: EntityTag::ActiveEnemy,
            waypoints: vec![Vec2::new(4.0, 0.0), Vec2::new(8.0, 0.0)],
            effect: true,
        }],
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// A started session on [`orchard_layout`] whose collaborators all record to
/// the returned [`Recorder`].
pub fn recorded_session() -> (Session, Recorder) {
    recorded_session_with(Tuning::default(), orchard_layout())
}

/// A started, fully recorded session on a custom layout.
pub fn recorded_session_with(tuning: Tuning, layout: LevelLayout) -> (Session, Recorder) {
    let recorder = Recorder::new();
    let audio = AudioController::new(
        Box::new(recorder.clone()),
        Box::new(MemorySettingsStore::new()),
    );
    let mut session = Session::new(tuning, layout)
        .with_audio(audio)
        .with_presentation(Box::new(recorder.clone()))
        .with_physics(Box::new(recorder.clone()));
    session.start();
    (session, recorder)
}

/// Looks up a named entity, panicking if the layout has no such name.
pub fn named(session: &Session, name: &str) -> EntityId {
    session
        .entity_named(name)
        .unwrap_or_else(|| panic!("no entity named {name}"))
}

// =============================================================================
// Input
// =============================================================================

/// An enter contact with a named entity.
pub fn enter(session: &Session, name: &str, normal_y: f32) -> Contact {
    Contact {
        other: named(session, name),
        normal_y,
        phase: ContactPhase::Enter,
    }
}

/// Dispatches an enter contact with a named entity outside the frame loop.
pub fn touch(session: &mut Session, name: &str, normal_y: f32) -> Vec<Command> {
    let contact = enter(session, name, normal_y);
    session.dispatch_contact(contact)
}

/// A frame carrying only contacts.
pub fn contact_frame(contacts: Vec<Contact>) -> FrameInput {
    FrameInput {
        contacts,
        ..FrameInput::default()
    }
}

/// A frame carrying only taps.
pub fn tap_frame(taps: Vec<TapEvent>) -> FrameInput {
    FrameInput {
        taps,
        ..FrameInput::default()
    }
}

/// Lands the player on `ground`.
pub fn land(session: &mut Session) {
    touch(session, "ground", 1.0);
}

/// Runs `frames` empty frames.
pub fn idle(session: &mut Session, frames: usize) {
    for _ in 0..frames {
        session.tick(DT, &FrameInput::default());
    }
}

/// Touches `spikes` from the side until the player is out of lives.
pub fn lose_all_lives(session: &mut Session) {
    while session.resolver().is_playing() {
        touch(session, "spikes", 0.0);
    }
}

/// Collects every apple in order.
pub fn collect_all_apples(session: &mut Session) {
    for i in 0..7 {
        touch(session, &format!("apple-{i}"), 0.0);
    }
}
