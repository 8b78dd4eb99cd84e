//! Audio cues, music state and volume control.
//!
//! The core never plays sound. It drives an injected [`AudioSink`] through an
//! [`AudioController`] that owns the music state (current track, muted flag)
//! and the persisted volumes.
//!
//! # Volume Scale
//!
//! Volumes are persisted as normalized linear values in `[0.001, 1]` and
//! converted to decibels with `20 * log10(volume)` before they reach the
//! sink. Full mute is [`MUTED_DB`].
//!
//! # Example
//!
//! ```
//! use orchard_core::audio::volume_to_db;
//!
//! assert!((volume_to_db(0.5) + 6.0206).abs() < 1e-3);
//! assert_eq!(volume_to_db(1.5), 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

use crate::error::SettingsError;
use crate::settings::{
    clamp_volume, SettingsStore, VolumeSettings, DEFAULT_VOLUME, MUSIC_KEY, SOUND_KEY,
};

/// Decibel level used to silence a channel.
pub const MUTED_DB: f32 = -80.0;

/// Converts a linear volume to decibels, clamping it first.
#[must_use]
pub fn volume_to_db(volume: f32) -> f32 {
    20.0 * clamp_volume(volume).log10()
}

/// One-shot sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// UI button press
    Click,
    /// Player jumped
    Jump,
    /// Player stomped an enemy
    HitEnemy,
    /// Player ran out of lives
    DeadCharacter,
    /// Player picked up an item
    TakeCollectible,
    /// Player lost a life
    PlayerHurt,
    /// Player won
    PlayerWin,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Click => "click",
            Self::Jump => "jump",
            Self::HitEnemy => "hit_enemy",
            Self::DeadCharacter => "dead_character",
            Self::TakeCollectible => "take_collectible",
            Self::PlayerHurt => "player_hurt",
            Self::PlayerWin => "player_win",
        };
        f.write_str(name)
    }
}

/// Background music tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicTrack {
    /// Main menu loop
    Menu,
    /// Level loop
    Level,
}

/// Mixer channels with independent volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Background music
    Music,
    /// Sound effects
    Sound,
}

/// Audio device contract. All calls are fire-and-forget.
pub trait AudioSink {
    /// Plays a one-shot cue on the sound channel.
    fn play_cue(&mut self, cue: Cue);

    /// Starts looping a music track from the beginning.
    fn play_music(&mut self, track: MusicTrack);

    /// Stops music playback.
    fn stop_music(&mut self);

    /// Sets a channel's gain in decibels.
    fn set_channel_db(&mut self, channel: Channel, db: f32);
}

/// Music state and volume control on top of an [`AudioSink`].
pub struct AudioController {
    sink: Box<dyn AudioSink>,
    store: Box<dyn SettingsStore>,
    current_track: Option<MusicTrack>,
    playing: bool,
    muted: bool,
}

impl fmt::Debug for AudioController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioController")
            .field("current_track", &self.current_track)
            .field("playing", &self.playing)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioController {
    /// Creates a controller with nothing playing.
    #[must_use]
    pub fn new(sink: Box<dyn AudioSink>, store: Box<dyn SettingsStore>) -> Self {
        Self {
            sink,
            store,
            current_track: None,
            playing: false,
            muted: false,
        }
    }

    /// Applies persisted volumes and starts the given track.
    pub fn start(&mut self, track: MusicTrack) {
        self.load_volume();
        self.play_music(track);
    }

    /// Plays a one-shot cue.
    pub fn play_cue(&mut self, cue: Cue) {
        trace!(%cue, "cue");
        self.sink.play_cue(cue);
    }

    /// Starts a track unless it is already playing. Clears the muted flag.
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.playing && self.current_track == Some(track) {
            return;
        }
        self.current_track = Some(track);
        self.playing = true;
        self.muted = false;
        self.sink.play_music(track);
    }

    /// Stops music and marks it muted.
    pub fn stop_music(&mut self) {
        self.sink.stop_music();
        self.playing = false;
        self.muted = true;
    }

    /// Toggles music between stopped and the last track.
    pub fn switch_music(&mut self) {
        if self.muted {
            if let Some(track) = self.current_track {
                self.play_music(track);
            } else {
                debug!("music switch with no track selected");
            }
        } else {
            self.stop_music();
        }
    }

    /// Returns `true` if music was stopped by the player or the game.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Returns the last requested track.
    #[must_use]
    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    /// Silences the sound-effect channel without touching the saved volume.
    pub fn stop_sounds(&mut self) {
        self.sink.set_channel_db(Channel::Sound, MUTED_DB);
    }

    /// Restores the sound-effect channel to the saved volume.
    pub fn play_sounds(&mut self) {
        let volume = self.store.get_or(SOUND_KEY, DEFAULT_VOLUME);
        self.sink.set_channel_db(Channel::Sound, volume_to_db(volume));
    }

    /// Applies both saved volumes to the sink.
    pub fn load_volume(&mut self) {
        let volumes = VolumeSettings::load(self.store.as_ref());
        self.sink
            .set_channel_db(Channel::Music, volume_to_db(volumes.music));
        self.sink
            .set_channel_db(Channel::Sound, volume_to_db(volumes.sound));
    }

    /// Returns the saved volumes.
    #[must_use]
    pub fn volumes(&self) -> VolumeSettings {
        VolumeSettings::load(self.store.as_ref())
    }

    /// Clamps, applies and persists the music volume.
    ///
    /// The new level is applied even if persisting it fails.
    ///
    /// # Errors
    ///
    /// Returns the store's [`SettingsError`] if saving fails.
    pub fn set_music_volume(&mut self, volume: f32) -> Result<(), SettingsError> {
        self.set_volume(Channel::Music, MUSIC_KEY, volume)
    }

    /// Clamps, applies and persists the sound-effect volume.
    ///
    /// # Errors
    ///
    /// Returns the store's [`SettingsError`] if saving fails.
    pub fn set_sound_volume(&mut self, volume: f32) -> Result<(), SettingsError> {
        self.set_volume(Channel::Sound, SOUND_KEY, volume)
    }

    fn set_volume(&mut self, channel: Channel, key: &str, volume: f32) -> Result<(), SettingsError> {
        let volume = clamp_volume(volume);
        self.sink.set_channel_db(channel, volume_to_db(volume));
        self.store.set(key, volume);
        self.store.save().inspect_err(|err| {
            warn!(error = %err, key, "volume applied but not persisted");
        })
    }
}
