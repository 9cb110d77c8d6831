//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::control`]: keyboard mapping to intent and targeting commands
//! - [`super`]: movement and shield systems, ship spawn

use crate::body::Body;
use crate::constants::{GUN_LENGTH, GUN_MOUNT_OFFSET};
use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player ship entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Result of a [`PlayerHealth::take_damage`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health dropped but the ship is still flying.
    Damaged { remaining: u32 },
    /// This call brought health to zero. Reported exactly once per session.
    Defeated,
    /// Health was already zero; nothing changed.
    AlreadyDefeated,
}

/// Whole-point hull health with a one-shot defeat latch.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHealth {
    pub hp: u32,
    pub max_hp: u32,
    defeated: bool,
}

impl PlayerHealth {
    pub fn new(hp: u32) -> Self {
        Self {
            hp,
            max_hp: hp,
            defeated: hp == 0,
        }
    }

    /// Saturating damage. The transition to zero is reported once; later
    /// calls at zero are no-ops.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.defeated {
            return DamageOutcome::AlreadyDefeated;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.defeated = true;
            DamageOutcome::Defeated
        } else {
            DamageOutcome::Damaged { remaining: self.hp }
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }
}

/// Rounds left in the magazine. One letter costs one round.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAmmo {
    pub count: u32,
}

impl PlayerAmmo {
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    /// Spend one round. Returns `false` and changes nothing when empty.
    pub fn consume(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }

    pub fn gain(&mut self, amount: u32) {
        self.count = self.count.saturating_add(amount);
    }
}

/// Turret orientation. Purely visual: projectiles home regardless of aim.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerGun {
    /// Radians clockwise from straight up.
    pub angle: f32,
}

impl PlayerGun {
    /// Point the barrel from `from` toward `target`.
    pub fn aim_at(&mut self, from: Vec2, target: Vec2) {
        let d = target - from;
        self.angle = d.y.atan2(d.x) + std::f32::consts::FRAC_PI_2;
    }

    /// Base of the barrel, just under the hull's top edge.
    pub fn mount(body: &Body) -> Vec2 {
        Vec2::new(body.center.x, body.top() + GUN_MOUNT_OFFSET)
    }

    /// Barrel tip; projectiles leave from here.
    pub fn muzzle(&self, body: &Body) -> Vec2 {
        Self::mount(body) + Vec2::new(self.angle.sin(), -self.angle.cos()) * GUN_LENGTH
    }
}

/// Shield raised while the shield key is held. Display state only.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Shield {
    pub active: bool,
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// Per-tick movement intent produced by the input layer.
///
/// Kept separate from the ship so the fixed-tick simulation can run headless
/// with intents written directly by tests.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerIntent {
    /// -1 left, 0 idle, +1 right.
    pub direction: f32,
    pub shield: bool,
}

/// Move one constant-speed step, clamped to the playfield.
pub fn step_ship(body: &mut Body, direction: f32, speed: f32, playfield_width: f32) {
    body.center.x += direction.clamp(-1.0, 1.0) * speed;
    body.clamp_x(playfield_width);
}
