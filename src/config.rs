//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the tuneable subset of
//! [`crate::constants`]. At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! targeting_mode = "selection"
//! meteor_spawn_interval_ms = [800, 1600]
//! ```
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.player_speed`, `config.targeting_mode`, etc.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Environment variable that overrides [`GameConfig::start_checkpoint`].
pub const START_CHECKPOINT_ENV: &str = "TYPING_SHOOTER_CHECKPOINT";

/// How typed letters pick their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    /// Fire at the first enemy in spawn order whose word starts with the letter.
    #[default]
    Direct,
    /// Lock the nearest matching enemy and require its letters in sequence.
    Selection,
}

impl TargetingMode {
    pub fn label(self) -> &'static str {
        match self {
            TargetingMode::Direct => "DIRECT",
            TargetingMode::Selection => "SELECT",
        }
    }
}

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Playfield ────────────────────────────────────────────────────────────
    pub screen_width: f32,
    pub screen_height: f32,
    pub ticks_per_second: f64,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub player_start_health: u32,
    pub player_start_ammo: u32,

    // ── Combat ───────────────────────────────────────────────────────────────
    pub targeting_mode: TargetingMode,
    pub projectile_speed: f32,
    pub impulse_force: f32,
    pub enemy_friction: f32,

    // ── Campaign ─────────────────────────────────────────────────────────────
    /// Inclusive `[min, max]` delay between shower meteors.
    pub meteor_spawn_interval_ms: [u64; 2],
    pub start_checkpoint: u32,
    pub campaign_path: String,
    pub checkpoint_path: String,
    pub word_list_path: String,

    /// Fixed seed for reproducible runs; entropy when absent.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ticks_per_second: TICKS_PER_SECOND,
            player_speed: PLAYER_SPEED,
            player_start_health: PLAYER_START_HEALTH,
            player_start_ammo: PLAYER_START_AMMO,
            targeting_mode: TargetingMode::default(),
            projectile_speed: PROJECTILE_SPEED,
            impulse_force: IMPULSE_FORCE,
            enemy_friction: ENEMY_FRICTION,
            meteor_spawn_interval_ms: METEOR_SHOWER_INTERVAL_MS,
            start_checkpoint: FIRST_CHECKPOINT,
            campaign_path: DEFAULT_CAMPAIGN_PATH.to_string(),
            checkpoint_path: DEFAULT_CHECKPOINT_PATH.to_string(),
            word_list_path: DEFAULT_WORD_LIST_PATH.to_string(),
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Simulated milliseconds that elapse per fixed tick.
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.ticks_per_second.max(1.0)
    }

    pub fn playfield(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Shower interval with the bounds put in order.
    pub fn shower_interval(&self) -> (u64, u64) {
        let [a, b] = self.meteor_spawn_interval_ms;
        (a.min(b), a.max(b))
    }

    /// Parse a TOML document, keeping defaults for absent keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Startup system: overwrite [`GameConfig`] from `assets/game.toml` if the file exists.
///
/// Must run before any other startup system that reads the config. A
/// `TYPING_SHOOTER_CHECKPOINT` environment variable then overrides the
/// starting checkpoint.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }

    if let Ok(raw) = std::env::var(START_CHECKPOINT_ENV) {
        match raw.trim().parse::<u32>() {
            Ok(id) => config.start_checkpoint = id,
            Err(_) => warn!("Ignoring {START_CHECKPOINT_ENV}={raw:?}: not a checkpoint id"),
        }
    }
}
