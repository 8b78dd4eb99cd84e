//! Persisted player settings.
//!
//! Two named floats are persisted: `Music` and `Sound`, both normalized
//! linear volumes in `(0.001, 1]` that default to `1.0` when absent. Stores
//! are injected behind [`SettingsStore`] so the audio controller never knows
//! whether values live in memory or on disk.
//!
//! # Example
//!
//! ```
//! use orchard_core::settings::{MemorySettingsStore, SettingsStore, VolumeSettings, MUSIC_KEY};
//!
//! let mut store = MemorySettingsStore::new();
//! store.set(MUSIC_KEY, 0.5);
//!
//! let volumes = VolumeSettings::load(&store);
//! assert_eq!(volumes.music, 0.5);
//! assert_eq!(volumes.sound, 1.0);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SettingsError;

/// Key of the persisted music volume.
pub const MUSIC_KEY: &str = "Music";

/// Key of the persisted sound-effect volume.
pub const SOUND_KEY: &str = "Sound";

/// Smallest volume accepted; zero would be `-inf` dB.
pub const MIN_VOLUME: f32 = 0.001;

/// Largest volume accepted.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume used when nothing is persisted.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Clamps a linear volume to `[MIN_VOLUME, MAX_VOLUME]`. NaN maps to the default.
#[must_use]
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        DEFAULT_VOLUME
    } else {
        volume.clamp(MIN_VOLUME, MAX_VOLUME)
    }
}

/// Key-value persistence for named float settings.
pub trait SettingsStore {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<f32>;

    /// Stores `value` under `key`. Not durable until [`SettingsStore::save`].
    fn set(&mut self, key: &str, value: f32);

    /// Flushes pending changes.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the backing storage cannot be written.
    fn save(&mut self) -> Result<(), SettingsError>;

    /// Returns the stored value for `key`, or `default` when absent.
    fn get_or(&self, key: &str, default: f32) -> f32 {
        self.get(key).unwrap_or(default)
    }
}

/// In-memory store. Saving is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySettingsStore {
    values: BTreeMap<String, f32>,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, f32>,
}

impl JsonSettingsStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file exists but cannot be read and
    /// [`SettingsError::Malformed`] if it is not a JSON object of numbers.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| SettingsError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, starting empty");
                BTreeMap::new()
            }
            Err(source) => return Err(SettingsError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    /// Opens the store, falling back to an empty one if the file is unusable.
    #[must_use]
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::open(path.clone()).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable settings");
            Self {
                path,
                values: BTreeMap::new(),
            }
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.values).map_err(|source| {
            SettingsError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, text).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Both persisted volumes, clamped and defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSettings {
    /// Music volume
    pub music: f32,
    /// Sound-effect volume
    pub sound: f32,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            music: DEFAULT_VOLUME,
            sound: DEFAULT_VOLUME,
        }
    }
}

impl VolumeSettings {
    /// Reads both volumes from a store.
    #[must_use]
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        Self {
            music: clamp_volume(store.get_or(MUSIC_KEY, DEFAULT_VOLUME)),
            sound: clamp_volume(store.get_or(SOUND_KEY, DEFAULT_VOLUME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("orchard-{}-{name}.json", std::process::id()))
    }

    mod clamp_tests {
        use super::*;

        #[test]
        fn clamps_into_range() {
            assert_eq!(clamp_volume(1.5), 1.0);
            assert_eq!(clamp_volume(0.0), MIN_VOLUME);
            assert_eq!(clamp_volume(-3.0), MIN_VOLUME);
            assert_eq!(clamp_volume(0.5), 0.5);
        }

        #[test]
        fn nan_becomes_default() {
            assert_eq!(clamp_volume(f32::NAN), DEFAULT_VOLUME);
        }
    }

    mod memory_store_tests {
        use super::*;

        #[test]
        fn absent_keys_default_to_full_volume() {
            let store = MemorySettingsStore::new();
            assert_eq!(VolumeSettings::load(&store), VolumeSettings::default());
        }

        #[test]
        fn stored_values_are_clamped_on_load() {
            let mut store = MemorySettingsStore::new();
            store.set(SOUND_KEY, 7.0);
            assert_eq!(VolumeSettings::load(&store).sound, 1.0);
        }
    }

    mod json_store_tests {
        use super::*;

        #[test]
        fn missing_file_opens_empty() {
            let store = JsonSettingsStore::open(scratch_path("missing")).unwrap();
            assert_eq!(store.get(MUSIC_KEY), None);
        }

        #[test]
        fn values_survive_save_and_reopen() {
            let path = scratch_path("roundtrip");
            let mut store = JsonSettingsStore::open(&path).unwrap();
            store.set(MUSIC_KEY, 0.25);
            store.save().unwrap();

            let reopened = JsonSettingsStore::open(&path).unwrap();
            assert_eq!(reopened.get(MUSIC_KEY), Some(0.25));
            let _ = fs::remove_file(path);
        }

        #[test]
        fn malformed_file_is_reported_and_tolerated() {
            let path = scratch_path("malformed");
            fs::write(&path, "not json").unwrap();

            assert!(matches!(
                JsonSettingsStore::open(&path),
                Err(SettingsError::Malformed { .. })
            ));
            let store = JsonSettingsStore::open_or_default(&path);
            assert_eq!(store.get(SOUND_KEY), None);
            let _ = fs::remove_file(path);
        }
    }
}
