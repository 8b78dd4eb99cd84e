//! Gameplay tuning.
//!
//! All gameplay constants live in [`Tuning`]. The defaults reproduce the
//! shipped level; a host may load overrides from JSON. Missing fields keep
//! their default.
//!
//! # Example
//!
//! ```
//! use orchard_core::config::Tuning;
//!
//! let tuning = Tuning::from_json_str(r#"{ "speed": 4.5 }"#).unwrap();
//! assert_eq!(tuning.speed, 4.5);
//! assert_eq!(tuning.win_items, 7);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Gameplay constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal run speed (units/s). Also the horizontal push of a rebound.
    pub speed: f32,
    /// Vertical velocity set by a jump.
    pub jump_force: f32,
    /// Vertical velocity set by any rebound.
    pub velocity_rebound: f32,
    /// Maximum gap between two `Began` taps that counts as a double tap (s).
    pub double_tap_delay: f32,
    /// Lives at the start of a session.
    pub starting_lives: u32,
    /// Items needed to win.
    pub win_items: u32,
    /// Contact normal above which hitting an active enemy is a stomp.
    pub stomp_normal_threshold: f32,
    /// Contact normal above which touching a passive enemy hurts.
    pub hurt_normal_threshold: f32,
    /// Delay between a stomp and the enemy's removal (s).
    pub enemy_removal_delay: f32,
    /// Screen width in pixels; taps right of half go right.
    pub screen_width: f32,
    /// Patrol speed of enemies (units/s).
    pub ninja_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            jump_force: 3.0,
            velocity_rebound: 3.0,
            double_tap_delay: 0.3,
            starting_lives: 3,
            win_items: 7,
            stomp_normal_threshold: 0.5,
            hurt_normal_threshold: -0.5,
            enemy_removal_delay: 0.5,
            screen_width: 1080.0,
            ninja_speed: 0.6,
        }
    }
}

impl Tuning {
    /// Parses and validates tuning from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for bad JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Loads and validates tuning from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Tuning::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "loaded tuning");
        Ok(tuning)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("speed", self.speed),
            ("jump_force", self.jump_force),
            ("velocity_rebound", self.velocity_rebound),
            ("double_tap_delay", self.double_tap_delay),
            ("screen_width", self.screen_width),
            ("ninja_speed", self.ninja_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        if !(self.enemy_removal_delay.is_finite() && self.enemy_removal_delay >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "enemy_removal_delay",
                reason: "must not be negative",
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        if self.win_items == 0 {
            return Err(ConfigError::Invalid {
                field: "win_items",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.starting_lives, 3);
        assert!((tuning.double_tap_delay - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "win_items": 3 }"#).unwrap();
        assert_eq!(tuning.win_items, 3);
        assert_eq!(tuning.starting_lives, 3);
    }

    #[test]
    fn zero_lives_is_rejected() {
        let err = Tuning::from_json_str(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "starting_lives",
                ..
            }
        ));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let err = Tuning::from_json_str(r#"{ "speed": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "speed", .. }));
    }

    #[test]
    fn bad_json_is_malformed() {
        assert!(matches!(
            Tuning::from_json_str("{ speed: }"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
