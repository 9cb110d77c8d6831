//! Per-type enemy state machines.
//!
//! Each variant owns the state it carries between ticks and advances as a pure
//! function of its [`Body`], [`Pushback`], the [`AdvanceContext`] and a random
//! source. Side effects (spawning shells or drones, checkpoint crossings) are
//! returned as [`BehaviorEffect`]s for the caller to apply.
//!
//! When the game is over every variant drops its normal logic and drifts off
//! the screen in a straight line.

use bevy::prelude::*;
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use super::spawn::SpawnKind;
use super::EnemyKind;
use crate::body::Body;
use crate::constants::*;

/// Live inputs shared by every enemy for one tick.
#[derive(Debug, Clone, Copy)]
pub struct AdvanceContext {
    pub player_center: Vec2,
    pub player_top: f32,
    pub playfield: Vec2,
    pub game_over: bool,
}

/// Something an enemy asks the world to do after it moved.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorEffect {
    Spawn(SpawnKind),
    CheckpointCrossed(u32),
}

// ── Pushback ──────────────────────────────────────────────────────────────────

/// Knock-back velocity that decays under friction.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pushback {
    pub velocity: Vec2,
    friction: f32,
}

impl Pushback {
    pub fn new(friction: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            friction: friction.clamp(0.0, MAX_FRICTION),
        }
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Replace the velocity with one pointing from `source` through `center`.
    ///
    /// A source exactly on the centre pushes straight up.
    pub fn apply_impulse(&mut self, center: Vec2, source: Vec2, force: f32) {
        let away = (center - source).normalize_or_zero();
        let away = if away == Vec2::ZERO { Vec2::NEG_Y } else { away };
        self.velocity = away * force;
    }

    /// Move `body` by the current velocity and decay it.
    pub fn step(&mut self, body: &mut Body) {
        if self.velocity.x.abs() > PUSHBACK_EPSILON || self.velocity.y.abs() > PUSHBACK_EPSILON {
            body.center += self.velocity;
            if self.friction >= MAX_FRICTION {
                self.velocity = Vec2::ZERO;
            } else {
                self.velocity /= 1.0 + self.friction / 10.0;
            }
        } else {
            self.velocity = Vec2::ZERO;
        }
    }
}

/// Glow phase bouncing between `-PULSE_LIMIT` and `PULSE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub phase: f32,
    direction: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            phase: 0.0,
            direction: 1.0,
        }
    }
}

impl Pulse {
    pub fn step(&mut self) {
        self.phase += self.direction * PULSE_STEP;
        if self.phase > PULSE_LIMIT || self.phase < -PULSE_LIMIT {
            self.direction = -self.direction;
        }
    }
}

// ── Variants ──────────────────────────────────────────────────────────────────

/// Behaviour component: one state machine per enemy type.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Behavior {
    Meteor(MeteorState),
    Gunship(GunshipState),
    Battleship(BattleshipState),
    ProximityMine(MineState),
    SuicideDrone(DroneState),
    Shell(ShellState),
    CheckpointDivider(DividerState),
}

impl Behavior {
    pub fn kind(&self) -> EnemyKind {
        match self {
            Behavior::Meteor(_) => EnemyKind::Meteor,
            Behavior::Gunship(_) => EnemyKind::Gunship,
            Behavior::Battleship(_) => EnemyKind::Battleship,
            Behavior::ProximityMine(_) => EnemyKind::ProximityMine,
            Behavior::SuicideDrone(_) => EnemyKind::SuicideDrone,
            Behavior::Shell(_) => EnemyKind::Shell,
            Behavior::CheckpointDivider(_) => EnemyKind::CheckpointDivider,
        }
    }

    /// Advance one tick.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        body: &mut Body,
        pushback: &mut Pushback,
        ctx: &AdvanceContext,
        rng: &mut R,
    ) -> Vec<BehaviorEffect> {
        let mut effects = Vec::new();
        match self {
            Behavior::Meteor(state) => state.advance(body, pushback, ctx),
            Behavior::Gunship(state) => state.advance(body, pushback, ctx, rng, &mut effects),
            Behavior::Battleship(state) => state.advance(body, pushback, ctx, rng, &mut effects),
            Behavior::ProximityMine(state) => state.advance(body, pushback, ctx),
            Behavior::SuicideDrone(state) => state.advance(body, pushback, ctx),
            Behavior::Shell(state) => state.advance(body, pushback, ctx),
            Behavior::CheckpointDivider(state) => state.advance(body, ctx, &mut effects),
        }
        effects
    }
}

/// Straight diagonal fall with a cosmetic spin.
#[derive(Debug, Clone, PartialEq)]
pub struct MeteorState {
    pub velocity: Vec2,
    pub speed: f32,
    /// Sprite rotation in degrees.
    pub spin: f32,
    pub spin_direction: f32,
}

impl MeteorState {
    /// `angle` is measured from straight down, in radians.
    pub fn new(speed: f32, angle: f32, spin_direction: f32) -> Self {
        Self {
            velocity: Vec2::new(angle.sin() * speed, angle.cos() * speed),
            speed,
            spin: 0.0,
            spin_direction,
        }
    }

    fn advance(&mut self, body: &mut Body, pushback: &mut Pushback, ctx: &AdvanceContext) {
        if ctx.game_over {
            body.center.y += self.speed;
            return;
        }
        pushback.step(body);
        body.center += self.velocity;
        self.spin = (self.spin + self.spin_direction).rem_euclid(360.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GunshipPhase {
    Descending,
    Patrolling,
}

/// Decaying descent, then a lagged chase of the player with a sine weave.
#[derive(Debug, Clone, PartialEq)]
pub struct GunshipState {
    pub phase: GunshipPhase,
    pub fall_speed: f32,
    /// Player x positions from the last ticks, oldest first.
    pub track_history: VecDeque<f32>,
    pub oscillation: f32,
}

impl Default for GunshipState {
    fn default() -> Self {
        Self {
            phase: GunshipPhase::Descending,
            fall_speed: GUNSHIP_INITIAL_FALL_SPEED,
            track_history: VecDeque::with_capacity(GUNSHIP_TRACK_DELAY_TICKS + 1),
            oscillation: 0.0,
        }
    }
}

impl GunshipState {
    fn advance<R: Rng + ?Sized>(
        &mut self,
        body: &mut Body,
        pushback: &mut Pushback,
        ctx: &AdvanceContext,
        rng: &mut R,
        effects: &mut Vec<BehaviorEffect>,
    ) {
        if ctx.game_over {
            body.center.y -= GUNSHIP_RETREAT_SPEED;
            return;
        }

        if body.top() < GUNSHIP_STOP_ALTITUDE {
            self.phase = GunshipPhase::Descending;
            body.center.y += self.fall_speed;
            self.fall_speed *= GUNSHIP_FALL_DECAY;
            if self.fall_speed < GUNSHIP_FALL_FLOOR {
                self.fall_speed = GUNSHIP_FALL_RESET;
            }
        } else {
            self.phase = GunshipPhase::Patrolling;
            let live_x = ctx.player_center.x;
            self.track_history.push_back(live_x);
            let tracked_x = if self.track_history.len() > GUNSHIP_TRACK_DELAY_TICKS {
                self.track_history.pop_front().unwrap_or(live_x)
            } else {
                live_x
            };

            self.oscillation += GUNSHIP_OSCILLATION_SPEED;
            let target_x = tracked_x + self.oscillation.sin() * GUNSHIP_OSCILLATION_RANGE;
            body.center.x += (target_x - body.center.x) * GUNSHIP_FOLLOW_FACTOR;
            body.clamp_x(ctx.playfield.x);

            if rng.gen_bool(GUNSHIP_SHELL_CHANCE) {
                effects.push(BehaviorEffect::Spawn(SpawnKind::Shell {
                    at: body.center,
                    drift: 0.0,
                }));
            }
        }

        pushback.step(body);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleshipPhase {
    Entering,
    Patrolling,
}

/// Drops in to a fixed altitude, then sweeps side to side launching shells and drones.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleshipState {
    pub phase: BattleshipPhase,
    pub speed: f32,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
}

impl BattleshipState {
    pub fn new(direction: f32) -> Self {
        Self {
            phase: BattleshipPhase::Entering,
            speed: BATTLESHIP_SPEED,
            direction: direction.signum(),
        }
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        body: &mut Body,
        pushback: &mut Pushback,
        ctx: &AdvanceContext,
        rng: &mut R,
        effects: &mut Vec<BehaviorEffect>,
    ) {
        if ctx.game_over {
            body.center.y += self.speed * 2.0;
            return;
        }

        match self.phase {
            BattleshipPhase::Entering => {
                if body.top() < BATTLESHIP_ENTRY_ALTITUDE {
                    body.center.y += self.speed * 3.0;
                } else {
                    self.phase = BattleshipPhase::Patrolling;
                }
            }
            BattleshipPhase::Patrolling => {
                if rng.gen_bool(BATTLESHIP_SHELL_CHANCE) {
                    let drift = BATTLESHIP_SHELL_DRIFTS
                        [rng.gen_range(0..BATTLESHIP_SHELL_DRIFTS.len())];
                    effects.push(BehaviorEffect::Spawn(SpawnKind::Shell {
                        at: body.center,
                        drift,
                    }));
                }
                if rng.gen_bool(BATTLESHIP_DRONE_CHANCE) {
                    effects.push(BehaviorEffect::Spawn(SpawnKind::SuicideDrone {
                        at: Some(body.center),
                    }));
                }

                body.center.x += self.speed * self.direction;
                if body.right() >= ctx.playfield.x {
                    self.direction = -1.0;
                } else if body.left() <= 0.0 {
                    self.direction = 1.0;
                }
            }
        }

        pushback.step(body);
    }
}

/// Falls until the player is in range, then homes on them.
#[derive(Debug, Clone, PartialEq)]
pub struct MineState {
    pub speed: f32,
    pub activation_radius: f32,
    /// True while the player is inside the activation radius.
    pub armed: bool,
    pub pulse: Pulse,
}

impl Default for MineState {
    fn default() -> Self {
        Self {
            speed: MINE_SPEED,
            activation_radius: MINE_ACTIVATION_RADIUS,
            armed: false,
            pulse: Pulse::default(),
        }
    }
}

impl MineState {
    fn advance(&mut self, body: &mut Body, pushback: &mut Pushback, ctx: &AdvanceContext) {
        if ctx.game_over {
            body.center.y += self.speed * 2.0;
            return;
        }

        let offset = ctx.player_center - body.center;
        let distance = offset.length();
        self.armed = distance <= self.activation_radius;
        if self.armed {
            if distance > 0.0 {
                body.center += offset / distance * self.speed;
            }
        } else {
            body.center.y += self.speed;
        }

        self.pulse.step();
        pushback.step(body);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DronePhase {
    Falling,
    Homing,
}

/// Falls onto the screen, then flies straight at the player.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneState {
    pub phase: DronePhase,
    pub speed: f32,
    /// Sprite heading in radians, 0 pointing up.
    pub heading: f32,
    pub pulse: Pulse,
}

impl DroneState {
    pub fn new(speed: f32) -> Self {
        Self {
            phase: DronePhase::Falling,
            speed,
            heading: std::f32::consts::PI,
            pulse: Pulse::default(),
        }
    }

    fn advance(&mut self, body: &mut Body, pushback: &mut Pushback, ctx: &AdvanceContext) {
        if ctx.game_over {
            body.center.y += self.speed * 2.0;
            return;
        }

        if body.top() < 0.0 {
            self.phase = DronePhase::Falling;
            body.center.y += self.speed;
        } else {
            self.phase = DronePhase::Homing;
            let offset = ctx.player_center - body.center;
            let distance = offset.length();
            if distance > 0.0 {
                body.center += offset / distance * self.speed;
            }
            self.heading = offset.y.atan2(offset.x) + FRAC_PI_2;
        }

        self.pulse.step();
        pushback.step(body);
    }
}

/// Ballistic fall with optional sideways drift.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    pub speed: f32,
    pub drift: f32,
}

impl ShellState {
    pub fn new(drift: f32) -> Self {
        Self {
            speed: SHELL_SPEED,
            drift,
        }
    }

    fn advance(&mut self, body: &mut Body, pushback: &mut Pushback, ctx: &AdvanceContext) {
        if ctx.game_over {
            body.center.y += SHELL_RETREAT_SPEED;
            return;
        }
        body.center.x += self.drift;
        body.center.y += self.speed;
        pushback.step(body);
    }
}

/// Marker line that saves a checkpoint as it passes the player.
#[derive(Debug, Clone, PartialEq)]
pub struct DividerState {
    pub checkpoint_id: u32,
    pub speed: f32,
    pub triggered: bool,
}

impl DividerState {
    pub fn new(checkpoint_id: u32) -> Self {
        Self {
            checkpoint_id,
            speed: DIVIDER_SPEED,
            triggered: false,
        }
    }

    fn advance(&mut self, body: &mut Body, ctx: &AdvanceContext, effects: &mut Vec<BehaviorEffect>) {
        body.center.y += self.speed;
        // A defeated player never banks a checkpoint.
        if !self.triggered && !ctx.game_over && body.center.y >= ctx.player_top {
            self.triggered = true;
            effects.push(BehaviorEffect::CheckpointCrossed(self.checkpoint_id));
        }
    }
}
