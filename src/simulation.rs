//! Simulation plugin: the fixed-tick frame pipeline.
//!
//! Every simulated frame runs in `FixedUpdate` at [`GameConfig::ticks_per_second`]
//! (60 Hz by default) through six ordered sets:
//!
//! | Set | Systems |
//! |-----|---------|
//! | [`TickSet::Input`] | typed letters to projectiles |
//! | [`TickSet::Campaign`] | clock advance, scripted events, meteor shower |
//! | [`TickSet::Player`] | ship movement and shield |
//! | [`TickSet::Enemies`] | enemy state machines, spawned shells and drones, checkpoint crossings |
//! | [`TickSet::Combat`] | projectile impacts, ship collisions, pruning |
//! | [`TickSet::Persist`] | checkpoint saves |
//!
//! All six sets are gated on [`GameState::Playing`], so pausing freezes the
//! simulation clock as well. Rendering and keyboard input run in `Update`.

use bevy::prelude::*;

use crate::body::SpawnCounter;
use crate::campaign::{
    campaign_dispatch_system, checkpoint_save_system, meteor_shower_system, CampaignSequencer,
    CheckpointReached, Checkpoints, DialogueMessage, MeteorShower,
};
use crate::combat::{
    player_collision_system, projectile_hit_system, prune_offscreen_system, typing_fire_system,
    CombatEvent, SessionStats, TargetCommand, TargetLock,
};
use crate::config::{load_game_config, GameConfig};
use crate::constants::TICKS_PER_SECOND;
use crate::enemy::enemy_advance_system;
use crate::player::{player_movement_system, shield_system, PlayerIntent};
use crate::session::{
    reset_progress_system, restart_session_system, start_session_system, GameRng, GameState,
    ResetProgressRequest, RestartRequest, SessionStatus, StartCheckpoint,
};
use crate::words::WordBank;

/// Simulated time. Advances one tick length per unpaused fixed tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    elapsed_ms: f64,
}

impl SimClock {
    pub fn advance(&mut self, ms: f64) {
        self.elapsed_ms += ms.max(0.0);
    }

    pub fn now_ms(&self) -> u64 {
        self.elapsed_ms.floor() as u64
    }
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Input,
    Campaign,
    Player,
    Enemies,
    Combat,
    Persist,
}

impl TickSet {
    pub const ALL: [TickSet; 6] = [
        TickSet::Input,
        TickSet::Campaign,
        TickSet::Player,
        TickSet::Enemies,
        TickSet::Combat,
        TickSet::Persist,
    ];
}

pub fn advance_clock_system(config: Res<GameConfig>, mut clock: ResMut<SimClock>) {
    clock.advance(config.tick_ms());
}

fn apply_tick_rate(config: Res<GameConfig>, mut time: ResMut<Time<Fixed>>) {
    time.set_timestep_hz(config.ticks_per_second.max(1.0));
}

/// Install the per-tick sets and systems into `schedule`.
///
/// Public so headless tests can drive ticks through a plain [`Schedule`].
pub fn configure_tick_schedule(schedule: &mut Schedule) {
    schedule.configure_sets(
        (
            TickSet::Input,
            TickSet::Campaign,
            TickSet::Player,
            TickSet::Enemies,
            TickSet::Combat,
            TickSet::Persist,
        )
            .chain(),
    );
    for set in TickSet::ALL {
        schedule.configure_sets(set.run_if(in_state(GameState::Playing)));
    }

    schedule.add_systems((
        typing_fire_system.in_set(TickSet::Input),
        (
            advance_clock_system,
            campaign_dispatch_system,
            meteor_shower_system,
        )
            .chain()
            .in_set(TickSet::Campaign),
        (player_movement_system, shield_system).in_set(TickSet::Player),
        enemy_advance_system.in_set(TickSet::Enemies),
        (
            projectile_hit_system,
            player_collision_system,
            prune_offscreen_system,
        )
            .chain()
            .in_set(TickSet::Combat),
        checkpoint_save_system.in_set(TickSet::Persist),
    ));
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND))
            .init_resource::<GameConfig>()
            .init_resource::<SimClock>()
            .init_resource::<SpawnCounter>()
            .init_resource::<PlayerIntent>()
            .init_resource::<GameRng>()
            .init_resource::<WordBank>()
            .init_resource::<CampaignSequencer>()
            .init_resource::<MeteorShower>()
            .init_resource::<Checkpoints>()
            .init_resource::<StartCheckpoint>()
            .init_resource::<TargetLock>()
            .init_resource::<SessionStats>()
            .init_resource::<SessionStatus>()
            .add_message::<TargetCommand>()
            .add_message::<CombatEvent>()
            .add_message::<CheckpointReached>()
            .add_message::<DialogueMessage>()
            .add_message::<RestartRequest>()
            .add_message::<ResetProgressRequest>()
            // Config first so the session sees the final values.
            .add_systems(
                Startup,
                (load_game_config, apply_tick_rate, start_session_system).chain(),
            )
            .add_systems(Update, (restart_session_system, reset_progress_system))
            .edit_schedule(FixedUpdate, configure_tick_schedule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_floors_fractional_ticks() {
        let mut clock = SimClock::default();
        let tick = GameConfig::default().tick_ms();
        for _ in 0..3 {
            clock.advance(tick);
        }
        assert_eq!(clock.now_ms(), 50);
        clock.advance(-5.0);
        assert_eq!(clock.now_ms(), 50);
    }
}
