//! Combat module: typed letters to projectiles to hits and defeats.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`targeting`] | Candidate matching for direct and selection mode, `typing_fire_system` |
//! | [`projectile`] | Homing `Projectile` component and its spawn helper |
//! | [`resolver`] | Projectile impacts, enemy/player collisions, off-screen pruning |
//!
//! Outcomes are published as [`CombatEvent`] messages; the effects and HUD
//! layers read them, the simulation never does.

pub mod projectile;
pub mod resolver;
pub mod targeting;

pub use projectile::{spawn_projectile, Projectile};
pub use resolver::{player_collision_system, projectile_hit_system, prune_offscreen_system};
pub use targeting::{first_match, nearest_match, select_target, typing_fire_system, Candidate};

use bevy::prelude::*;

/// Input routed to the targeting resolver.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCommand {
    /// A typed letter, already lower-cased.
    Letter(char),
    /// Release the selection-mode lock.
    ClearLock,
}

/// Why a typed letter did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    /// No targetable enemy starts with the letter.
    NoMatch,
    /// A lock is held and its next letter is different.
    Mismatch,
    OutOfAmmo,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    Shot { target: Entity, letter: char },
    Hit { at: Vec2 },
    /// Last letter landed: the enemy is destroyed.
    Shockwave { at: Vec2 },
    Reward { at: Vec2, amount: u32 },
    PlayerHit { remaining: u32 },
    PlayerDefeated,
    Feedback(FeedbackCue),
}

/// Enemy currently locked in selection mode.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetLock(pub Option<Entity>);

impl TargetLock {
    /// Forget `entity` if it holds the lock.
    pub fn release(&mut self, entity: Entity) {
        if self.0 == Some(entity) {
            self.0 = None;
        }
    }
}

/// Running totals for the current session.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub hits: u32,
    pub enemies_defeated: u32,
    pub ammo_collected: u32,
}
