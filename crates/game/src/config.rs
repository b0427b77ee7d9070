//! Game configuration. Loaded from `lobshot.ron` at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::enemy_ai::AimSettings;
use crate::turn::TurnTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Player shot tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerTuning {
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    #[serde(default = "default_max_charge")]
    pub max_charge_distance: f32,
    #[serde(default = "default_player_damage")]
    pub damage: f32,
    #[serde(default = "default_projectile_radius")]
    pub projectile_radius: f32,
    #[serde(default = "default_spin")]
    pub spin: f32,
    #[serde(default = "default_lifetime")]
    pub projectile_lifetime: f32,
}

fn default_min_speed() -> f32 {
    5.0
}
fn default_max_speed() -> f32 {
    20.0
}
fn default_max_charge() -> f32 {
    10.0
}
fn default_player_damage() -> f32 {
    25.0
}
fn default_projectile_radius() -> f32 {
    0.2
}
fn default_spin() -> f32 {
    6.0
}
fn default_lifetime() -> f32 {
    12.0
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            max_charge_distance: default_max_charge(),
            damage: default_player_damage(),
            projectile_radius: default_projectile_radius(),
            spin: default_spin(),
            projectile_lifetime: default_lifetime(),
        }
    }
}

/// Enemy-side tuning that is not part of the blendable aim presets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyTuning {
    #[serde(default = "default_enemy_damage")]
    pub damage: f32,
    #[serde(default = "default_projectile_radius")]
    pub projectile_radius: f32,
    #[serde(default = "default_lifetime")]
    pub projectile_lifetime: f32,
    /// Force ballistic mode for every shot (otherwise auto-detected).
    #[serde(default)]
    pub force_ballistic: bool,
}

fn default_enemy_damage() -> f32 {
    15.0
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            damage: default_enemy_damage(),
            projectile_radius: default_projectile_radius(),
            projectile_lifetime: default_lifetime(),
            force_ballistic: false,
        }
    }
}

/// Persistent game settings. Loaded from `lobshot.ron` in the current
/// directory (or next to the binary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Simulation rate in Hz.
    #[serde(default = "default_sim_hz")]
    pub sim_hz: f32,
    /// Gravity magnitude; projectiles accelerate at -gravity in y.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default)]
    pub turn: TurnTuning,
    #[serde(default)]
    pub player: PlayerTuning,
    #[serde(default)]
    pub enemy: EnemyTuning,
    /// Aim preset at difficulty 0.
    #[serde(default = "easy_preset")]
    pub enemy_easy: AimSettings,
    /// Aim preset at difficulty 1.
    #[serde(default = "hard_preset")]
    pub enemy_hard: AimSettings,
    /// Blend factor between the two presets, in [0, 1].
    #[serde(default = "default_difficulty")]
    pub difficulty: f32,
}

fn default_sim_hz() -> f32 {
    60.0
}
fn default_gravity() -> f32 {
    9.81
}
fn default_difficulty() -> f32 {
    0.5
}

fn easy_preset() -> AimSettings {
    AimSettings {
        accuracy: 0.45,
        min_miss_distance: 1.5,
        max_miss_distance: 5.0,
        shoot_interval: 3.5,
        ..AimSettings::default()
    }
}

fn hard_preset() -> AimSettings {
    AimSettings {
        accuracy: 0.9,
        min_miss_distance: 0.8,
        max_miss_distance: 2.5,
        shoot_interval: 1.5,
        ..AimSettings::default()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sim_hz: default_sim_hz(),
            gravity: default_gravity(),
            turn: TurnTuning::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            enemy_easy: easy_preset(),
            enemy_hard: hard_preset(),
            difficulty: default_difficulty(),
        }
    }
}

impl GameConfig {
    /// Load config from `lobshot.ron`. If the file is missing or invalid,
    /// returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load and parse a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&data)?)
    }

    /// The enemy aim settings after difficulty blending. Always sanitized.
    pub fn blended_enemy_settings(&self) -> AimSettings {
        AimSettings::lerp(&self.enemy_easy, &self.enemy_hard, self.difficulty)
    }

    /// Signed gravity for spawned projectiles.
    pub fn signed_gravity(&self) -> f32 {
        -self.gravity.abs()
    }
}

fn config_path() -> PathBuf {
    let local = PathBuf::from("lobshot.ron");
    if local.exists() {
        return local;
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("lobshot.ron")))
        .unwrap_or(local)
}
