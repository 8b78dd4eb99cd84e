//! Scenario files.
//!
//! A scenario is a level layout plus a list of frames. Contacts name the
//! entity they touch by its layout name; the runner resolves names to ids
//! against the built level.
//!
//! ```json
//! {
//!   "player_spawn": [0.0, 1.0],
//!   "entities": [{ "name": "ground", "tag": "ground", "position": [0.0, 0.0] }],
//!   "ninjas": [{ "name": "ninja", "waypoints": [[4.0, 0.0], [8.0, 0.0]] }],
//!   "frames": [
//!     { "dt": 0.016, "contacts": [{ "entity": "ground", "normal_y": 1.0 }] },
//!     { "taps": [{ "timestamp": 0.1, "screen_x": 900.0, "phase": "stationary" }] },
//!     { "actions": ["open_settings"] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use orchard_core::event::{Contact, ContactPhase, FrameInput, TapEvent};
use orchard_core::level::LevelLayout;
use orchard_core::session::Session;

fn default_dt() -> f32 {
    1.0 / 60.0
}

/// A contact with an entity referred to by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedContact {
    /// Layout name of the touched entity
    pub entity: String,
    /// Vertical component of the contact normal
    #[serde(default)]
    pub normal_y: f32,
    /// Enter or exit
    #[serde(default = "default_phase")]
    pub phase: ContactPhase,
}

fn default_phase() -> ContactPhase {
    ContactPhase::Enter
}

/// A menu action performed before the frame runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Open the in-level settings menu
    OpenSettings,
    /// Close the settings menu
    CloseSettings,
    /// Restart the level
    Restart,
    /// Toggle music
    SwitchMusic,
    /// Set and persist the music volume
    MusicVolume(f32),
    /// Set and persist the sound-effect volume
    SoundVolume(f32),
}

/// One scripted frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFrame {
    /// Frame duration in seconds
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Menu actions, applied in order before the tick
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Touch samples
    #[serde(default)]
    pub taps: Vec<TapEvent>,
    /// Player contacts
    #[serde(default)]
    pub contacts: Vec<NamedContact>,
    /// Player body `(position, velocity)` after physics
    #[serde(default)]
    pub player_body: Option<(Vec2, Vec2)>,
}

/// A level plus the frames to play on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Level to build
    #[serde(flatten)]
    pub layout: LevelLayout,
    /// Frames, in order
    #[serde(default)]
    pub frames: Vec<ScenarioFrame>,
}

impl Scenario {
    /// Reads a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }
}

impl ScenarioFrame {
    /// Resolves entity names against the session's level.
    pub fn to_input(&self, session: &Session) -> Result<FrameInput> {
        let contacts = self
            .contacts
            .iter()
            .map(|named| {
                let Some(other) = session.entity_named(&named.entity) else {
                    bail!("unknown entity `{}`", named.entity);
                };
                Ok(Contact {
                    other,
                    normal_y: named.normal_y,
                    phase: named.phase,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FrameInput {
            taps: self.taps.clone(),
            contacts,
            waypoint_hits: Vec::new(),
            player_body: self.player_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::config::Tuning;
    use orchard_core::entity::EntityTag;

    const SCENARIO: &str = r#"{
        "player_spawn": [0.0, 1.0],
        "entities": [
            { "name": "ground", "tag": "ground", "position": [0.0, 0.0] },
            { "name": "apple", "tag": "item", "position": [2.0, 1.0] }
        ],
        "ninjas": [{ "name": "ninja", "waypoints": [[4.0, 0.0], [8.0, 0.0]] }],
        "frames": [
            { "contacts": [{ "entity": "ground", "normal_y": 1.0 }] },
            { "dt": 0.5, "actions": ["open_settings", { "music_volume": 0.5 }] },
            { "contacts": [{ "entity": "ground", "phase": "exit" }] }
        ]
    }"#;

    #[test]
    fn parses_layout_and_frames() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.layout.entities.len(), 2);
        assert_eq!(scenario.layout.entities[1].tag, EntityTag::Item);
        assert_eq!(scenario.layout.ninjas.len(), 1);
        assert_eq!(scenario.frames.len(), 3);
        assert!((scenario.frames[0].dt - 1.0 / 60.0).abs() < f32::EPSILON);
        assert_eq!(
            scenario.frames[1].actions,
            vec![Action::OpenSettings, Action::MusicVolume(0.5)]
        );
        assert_eq!(scenario.frames[2].contacts[0].phase, ContactPhase::Exit);
    }

    #[test]
    fn resolves_contact_names() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        let session = Session::new(Tuning::default(), scenario.layout.clone());
        let input = scenario.frames[0].to_input(&session).unwrap();
        assert_eq!(Some(input.contacts[0].other), session.entity_named("ground"));
    }

    #[test]
    fn unknown_names_are_errors() {
        let frame = ScenarioFrame {
            dt: 0.1,
            actions: Vec::new(),
            taps: Vec::new(),
            contacts: vec![NamedContact {
                entity: "pear".into(),
                normal_y: 0.0,
                phase: ContactPhase::Enter,
            }],
            player_body: None,
        };
        let session = Session::new(Tuning::default(), LevelLayout::default());
        let err = frame.to_input(&session).unwrap_err();
        assert!(err.to_string().contains("pear"));
    }
}
