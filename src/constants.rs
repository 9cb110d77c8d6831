//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place. Runtime overrides for a subset of them come from
//! `assets/game.toml` through [`crate::config::GameConfig`]; everything else is
//! fixed per enemy type.
//!
//! Coordinates are screen pixels with the origin at the top-left corner of the
//! playfield and +y pointing down. Speeds are pixels per fixed tick.

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Playfield width in pixels.
pub const SCREEN_WIDTH: f32 = 800.0;

/// Playfield height in pixels.
pub const SCREEN_HEIGHT: f32 = 500.0;

/// Fixed simulation rate. Every per-tick speed below assumes this rate.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// Bodies further than this above the top edge are pruned.
///
/// Enemies spawn up to 150 px above the screen, so the top margin must be
/// generous or fresh spawns would be culled on their first tick.
pub const PRUNE_MARGIN_TOP: f32 = 300.0;
pub const PRUNE_MARGIN_BOTTOM: f32 = 20.0;
pub const PRUNE_MARGIN_SIDE: f32 = 50.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f32 = 50.0;

/// Vertical position of the player centre as a fraction of the screen height.
pub const PLAYER_Y_FRACTION: f32 = 0.89;

pub const PLAYER_SPEED: f32 = 4.0;
pub const PLAYER_START_HEALTH: u32 = 3;
pub const PLAYER_START_AMMO: u32 = 100;

/// Length of the gun barrel drawn from the muzzle base.
pub const GUN_LENGTH: f32 = 20.0;

/// Distance below the player's top edge where the barrel is mounted.
pub const GUN_MOUNT_OFFSET: f32 = 5.0;

/// Damage dealt to the player by any enemy body collision.
pub const COLLISION_DAMAGE: u32 = 1;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PROJECTILE_SPEED: f32 = 10.0;
pub const PROJECTILE_WIDTH: f32 = 20.0;
pub const PROJECTILE_HEIGHT: f32 = 3.0;

/// Strength of the knock-back applied to an enemy by a landing projectile.
pub const IMPULSE_FORCE: f32 = 2.0;

// ── Pushback ──────────────────────────────────────────────────────────────────

/// Default friction for enemy pushback. 0 never decays, 100 stops instantly.
///
/// Each tick the velocity is divided by `1 + friction / 10`.
pub const ENEMY_FRICTION: f32 = 5.0;
pub const MAX_FRICTION: f32 = 100.0;

/// Pushback components at or below this magnitude snap to zero.
pub const PUSHBACK_EPSILON: f32 = 0.1;

// ── Words ─────────────────────────────────────────────────────────────────────

/// Default random word length for enemies without a dedicated word rule.
pub const DEFAULT_WORD_MIN: usize = 4;
pub const DEFAULT_WORD_MAX: usize = 8;

/// Meteor names longer than this are truncated.
pub const METEOR_WORD_MAX: usize = 15;

// ── Meteor ────────────────────────────────────────────────────────────────────

pub const METEOR_SIZE: f32 = 40.0;
pub const METEOR_SPAWN_TOP: f32 = -150.0;
pub const METEOR_MIN_SPEED: f32 = 1.5;
pub const METEOR_MAX_SPEED: f32 = 3.5;

/// Maximum deviation from straight down, in degrees.
pub const METEOR_MAX_ANGLE_DEG: f32 = 30.0;

/// Extra ammo a meteor may drop on top of its word length.
pub const METEOR_BONUS_DROP: u32 = 2;

// ── Gunship ───────────────────────────────────────────────────────────────────

pub const GUNSHIP_WIDTH: f32 = 60.0;
pub const GUNSHIP_HEIGHT: f32 = 50.0;
pub const GUNSHIP_INITIAL_FALL_SPEED: f32 = 10.0;
pub const GUNSHIP_FALL_DECAY: f32 = 0.9;

/// When the decaying fall speed drops below this it resets to [`GUNSHIP_FALL_RESET`].
pub const GUNSHIP_FALL_FLOOR: f32 = 0.5;
pub const GUNSHIP_FALL_RESET: f32 = 2.0;

/// Altitude of the top edge at which the gunship stops descending.
pub const GUNSHIP_STOP_ALTITUDE: f32 = 50.0;

/// Number of ticks the gunship lags behind the player's horizontal position.
pub const GUNSHIP_TRACK_DELAY_TICKS: usize = 20;
pub const GUNSHIP_OSCILLATION_RANGE: f32 = 100.0;
pub const GUNSHIP_OSCILLATION_SPEED: f32 = 0.04;
pub const GUNSHIP_FOLLOW_FACTOR: f32 = 0.05;
pub const GUNSHIP_SHELL_CHANCE: f64 = 0.01;
pub const GUNSHIP_RETREAT_SPEED: f32 = 5.0;

// ── Battleship ────────────────────────────────────────────────────────────────

pub const BATTLESHIP_WIDTH: f32 = 120.0;
pub const BATTLESHIP_HEIGHT: f32 = 60.0;
pub const BATTLESHIP_SPEED: f32 = 2.0;
pub const BATTLESHIP_SPAWN_Y: f32 = -50.0;
pub const BATTLESHIP_ENTRY_ALTITUDE: f32 = 50.0;
pub const BATTLESHIP_WORD_MIN: usize = 15;
pub const BATTLESHIP_WORD_MAX: usize = 20;
pub const BATTLESHIP_SHELL_CHANCE: f64 = 0.01;
pub const BATTLESHIP_DRONE_CHANCE: f64 = 0.005;

/// Horizontal drift choices for battleship shells.
pub const BATTLESHIP_SHELL_DRIFTS: [f32; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];

// ── Proximity mine ────────────────────────────────────────────────────────────

pub const MINE_SIZE: f32 = 20.0;
pub const MINE_SPEED: f32 = 2.0;
pub const MINE_ACTIVATION_RADIUS: f32 = 300.0;

/// Number of mines created by one scripted mine spawn.
pub const MINES_PER_SPAWN: usize = 2;

// ── Suicide drone ─────────────────────────────────────────────────────────────

pub const DRONE_SIZE: f32 = 30.0;
pub const DRONE_MIN_SPEED: f32 = 2.0;
pub const DRONE_MAX_SPEED: f32 = 4.0;
pub const DRONE_WORD_LEN: usize = 3;

/// Top edge used for mines and drones entering from above.
pub const HAZARD_SPAWN_TOP: f32 = -50.0;

/// Pulse phase step and bound shared by mines and drones.
pub const PULSE_STEP: f32 = 0.2;
pub const PULSE_LIMIT: f32 = 2.0;

// ── Shell ─────────────────────────────────────────────────────────────────────

pub const SHELL_WIDTH: f32 = 5.0;
pub const SHELL_HEIGHT: f32 = 20.0;
pub const SHELL_SPEED: f32 = 5.0;
pub const SHELL_RETREAT_SPEED: f32 = 10.0;

// ── Checkpoint divider ────────────────────────────────────────────────────────

pub const DIVIDER_START_Y: f32 = -50.0;
pub const DIVIDER_SPEED: f32 = 2.0;
pub const DIVIDER_THICKNESS: f32 = 2.0;

// ── Campaign ──────────────────────────────────────────────────────────────────

/// Default meteor shower spawn interval range in milliseconds.
pub const METEOR_SHOWER_INTERVAL_MS: [u64; 2] = [1000, 2000];

/// Checkpoint that is always unlocked.
pub const FIRST_CHECKPOINT: u32 = 1;

pub const DEFAULT_CAMPAIGN_PATH: &str = "assets/campaign/game_event.json";
pub const DEFAULT_CHECKPOINT_PATH: &str = "saves/checkpoints.toml";
pub const DEFAULT_WORD_LIST_PATH: &str = "assets/meteor_names.txt";
