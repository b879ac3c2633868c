//! Data-driven game balance
//!
//! Everything the simulation treats as a constant lives here: the
//! difficulty table, playfield and entity geometry, and the wall-clock
//! timings for power-ups. Defaults carry the shipped balance; a JSON file
//! with the same shape can override any subset of it.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration failures, surfaced at session start. Never silently
/// defaulted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown difficulty '{0}' (expected easy, normal, hard or impossible)")]
    UnknownDifficulty(String),
    #[error("failed to read tuning file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning file")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Difficulty tiers, each mapping to a (spawn_rate, fall_speed) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    /// Deliberate extreme: its spawn rate is >= 1, a hazard every tick
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Spawn probability and fall speed for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Per-tick hazard spawn probability; >= 1 saturates to every tick
    pub spawn_rate: f32,
    /// Hazard and power-up descent, pixels per tick
    pub fall_speed: f32,
}

/// The full difficulty table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyParams,
    pub normal: DifficultyParams,
    pub hard: DifficultyParams,
    pub impossible: DifficultyParams,
}

impl DifficultyTable {
    pub fn get(&self, difficulty: Difficulty) -> DifficultyParams {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
            Difficulty::Impossible => self.impossible,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyParams {
                spawn_rate: 0.03,
                fall_speed: 3.0,
            },
            normal: DifficultyParams {
                spawn_rate: 0.05,
                fall_speed: 5.0,
            },
            hard: DifficultyParams {
                spawn_rate: 0.1,
                fall_speed: 7.0,
            },
            impossible: DifficultyParams {
                spawn_rate: 5.0,
                fall_speed: 5.0,
            },
        }
    }
}

/// Playfield bounds in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayfieldTuning {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
        }
    }
}

/// Player geometry and movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Gap between the player and the bottom edge
    pub bottom_margin: f32,
    /// Base horizontal speed, pixels per tick
    pub base_speed: f32,
    /// Applied to the base speed while the boost is active
    pub boost_multiplier: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            bottom_margin: 4.0,
            base_speed: 5.0,
            boost_multiplier: 2.0,
        }
    }
}

/// Hazard geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub size: f32,
    /// Size of each detonation fragment
    pub fragment_size: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            fragment_size: 10.0,
        }
    }
}

/// Power-up geometry and wall-clock timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub size: f32,
    /// Seconds between power-up spawns
    pub spawn_interval: f64,
    /// Speed boost duration, seconds
    pub speed_duration: f64,
    /// Shield duration, seconds
    pub shield_duration: f64,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            size: 20.0,
            spawn_interval: 12.0,
            speed_duration: 7.0,
            shield_duration: 9.0,
        }
    }
}

/// Session-level parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Win threshold in ticks; `None` runs an endless session
    pub max_score: Option<u64>,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            max_score: Some(2500),
        }
    }
}

/// Complete tuning: difficulty table plus geometry and timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tuning {
    pub playfield: PlayfieldTuning,
    pub player: PlayerTuning,
    pub hazard: HazardTuning,
    pub power_up: PowerUpTuning,
    pub session: SessionTuning,
    pub difficulty: DifficultyTable,
}

impl Tuning {
    /// Load overrides from a JSON file and validate the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let tuning: Tuning = serde_json::from_str(&json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run on. Called at session start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.playfield.width > 0.0 && self.playfield.height > 0.0) {
            return Err(ConfigError::Invalid("playfield dimensions must be positive"));
        }
        if !(self.player.width > 0.0 && self.player.height > 0.0) {
            return Err(ConfigError::Invalid("player dimensions must be positive"));
        }
        if self.player.width > self.playfield.width {
            return Err(ConfigError::Invalid("player is wider than the playfield"));
        }
        if !(self.player.base_speed > 0.0) {
            return Err(ConfigError::Invalid("player base speed must be positive"));
        }
        if !(self.player.boost_multiplier >= 1.0) {
            return Err(ConfigError::Invalid("boost multiplier must be at least 1"));
        }
        for difficulty in Difficulty::ALL {
            let params = self.difficulty.get(difficulty);
            if !(params.spawn_rate >= 0.0 && params.spawn_rate.is_finite()) {
                return Err(ConfigError::Invalid(
                    "spawn rate must be non-negative and finite",
                ));
            }
            if !(params.fall_speed > 0.0) {
                return Err(ConfigError::Invalid("fall speed must be positive"));
            }
        }
        if !(self.power_up.spawn_interval > 0.0) {
            return Err(ConfigError::Invalid("power-up interval must be positive"));
        }
        if !(self.power_up.speed_duration > 0.0 && self.power_up.shield_duration > 0.0) {
            return Err(ConfigError::Invalid("effect durations must be positive"));
        }
        Ok(())
    }
}
