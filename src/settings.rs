//! Game settings and preferences
//!
//! The user's dot configuration, persisted as JSON next to the score file.
//! Values are range-checked on load so a hand-edited file can't smuggle an
//! illegal configuration past the setters.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::GameSession;

/// User-configurable game parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Dot diameter in pixels
    pub dot_diameter: u32,
    /// Milliseconds between dot moves (lower is faster)
    pub dot_speed_ms: u32,
    /// Speed-up applied every acceleration interval; 0 disables
    pub acceleration: u32,
    /// Round length in seconds; 0 means no limit
    pub time_limit_secs: u32,
    /// Background hue in HSV degrees. Cosmetic, forwarded to the shell.
    pub background_hue: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dot_diameter: DOT_DIAM_DEFAULT,
            dot_speed_ms: DOT_SPEED_DEFAULT_MS,
            acceleration: DOT_ACCEL_DEFAULT,
            time_limit_secs: GAME_LENGTH_DEFAULT_S,
            background_hue: BACKGROUND_HUE_DEFAULT,
        }
    }
}

impl Settings {
    /// True when every field is inside its legal range
    pub fn is_valid(&self) -> bool {
        (DOT_DIAM_MIN..=DOT_DIAM_MAX).contains(&self.dot_diameter)
            && (DOT_SPEED_MIN_MS..=DOT_SPEED_MAX_MS).contains(&self.dot_speed_ms)
            && self.acceleration <= DOT_ACCEL_MAX
            && self.background_hue <= BACKGROUND_HUE_MAX
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing, unreadable, or holds out-of-range values.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) if settings.is_valid() => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Ok(_) => {
                    log::warn!(
                        "Settings in {} are out of range, using defaults",
                        path.display()
                    );
                    Self::default()
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    /// Push these settings into a session through its validated setters.
    /// Returns false if any value was rejected (the rest still apply).
    pub fn apply(&self, session: &mut GameSession) -> bool {
        let diameter_ok = session.set_dot_diameter(self.dot_diameter);
        let speed_ok = session.set_speed(self.dot_speed_ms);
        let accel_ok = session.set_acceleration(self.acceleration);
        session.set_time_limit(self.time_limit_secs);
        diameter_ok && speed_ok && accel_ok
    }
}
