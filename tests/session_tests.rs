//! Headless tests for the session state machine, pause gating and restart.
//!
//! The state-machine tests use [`MinimalPlugins`] with [`StatesPlugin`]: no
//! window, no rendering. The tick tests reuse the bare-world harness.

mod common;

use std::collections::HashSet;

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use common::Harness;

use typing_shooter::campaign::{CampaignScript, CampaignSequencer};
use typing_shooter::config::GameConfig;
use typing_shooter::enemy::{Enemy, EnemyKind};
use typing_shooter::player::{Player, PlayerHealth};
use typing_shooter::session::{
    reset_progress_system, restart_session_system, GameState, ResetProgressRequest,
    RestartRequest, SessionStatus,
};
use typing_shooter::simulation::SimClock;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn app_with_default_state() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

fn meteor_script() -> CampaignScript {
    CampaignScript::parse(
        r#"[
            {"delay": 0, "action": {"message": {"sender": "Base", "text_message": "Go"}}},
            {"delay": 0, "action": {"spawn": {"enemy_type": "enemy_meteor"}}}
        ]"#,
    )
    .unwrap()
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn default_state_is_playing() {
    let mut app = app_with_default_state();
    app.update();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Playing);
}

#[test]
fn pause_and_resume_round_trip() {
    let mut app = app_with_default_state();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Paused);
    app.update();
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::Paused
    );

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::Playing
    );
}

// ── Tick gating ───────────────────────────────────────────────────────────────

#[test]
fn paused_ticks_change_nothing() {
    let mut h = Harness::with_script(GameConfig::default(), meteor_script());
    h.world.insert_resource(State::new(GameState::Paused));
    h.ticks(30);

    assert_eq!(h.world.resource::<SimClock>().now_ms(), 0);
    assert_eq!(h.world.query::<&Enemy>().iter(&h.world).count(), 0);

    h.world.insert_resource(State::new(GameState::Playing));
    h.ticks(2);
    assert!(h.world.resource::<SimClock>().now_ms() > 0);
    assert_eq!(h.world.query::<&Enemy>().iter(&h.world).count(), 1);
}

#[test]
fn campaign_dispatches_one_event_per_tick() {
    let mut h = Harness::with_script(GameConfig::default(), meteor_script());
    h.tick();
    assert_eq!(h.world.query::<&Enemy>().iter(&h.world).count(), 0);
    h.tick();
    assert_eq!(h.world.query::<&Enemy>().iter(&h.world).count(), 1);
}

// ── Meteor shower ─────────────────────────────────────────────────────────────

fn shower_script() -> CampaignScript {
    CampaignScript::parse(r#"[{"delay": 0, "action": {"trigger": {"meteor_shower": true}}}]"#)
        .unwrap()
}

/// Tick `n` times, collecting every meteor that exists after any tick.
fn collect_meteors(h: &mut Harness, n: usize, seen: &mut HashSet<Entity>) {
    for _ in 0..n {
        h.tick();
        let meteors = h
            .world
            .query::<(Entity, &Enemy)>()
            .iter(&h.world)
            .filter(|(_, enemy)| enemy.kind == EnemyKind::Meteor)
            .map(|(entity, _)| entity)
            .collect::<Vec<_>>();
        seen.extend(meteors);
    }
}

#[test]
fn shower_keeps_spawning_after_the_script_ends_and_stops_at_game_over() {
    let config = GameConfig {
        meteor_spawn_interval_ms: [1500, 1500],
        player_start_health: 1000,
        ..GameConfig::default()
    };
    let mut h = Harness::with_script(config, shower_script());
    let mut seen = HashSet::new();

    collect_meteors(&mut h, 1, &mut seen);
    assert!(h.world.resource::<CampaignSequencer>().is_finished());

    // Trigger lands at 16 ms; meteors follow at 1516, 3016 and 4516 ms.
    collect_meteors(&mut h, 300, &mut seen);
    assert_eq!(seen.len(), 3);

    h.world.resource_mut::<SessionStatus>().game_over = true;
    collect_meteors(&mut h, 300, &mut seen);
    assert_eq!(seen.len(), 3);
}

// ── Restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_after_game_over_rebuilds_the_session() {
    let mut h = Harness::with_script(GameConfig::default(), meteor_script());
    h.ticks(2);
    h.world.init_resource::<Messages<RestartRequest>>();
    h.world.resource_mut::<SessionStatus>().game_over = true;
    if let Some(mut health) = h.world.get_mut::<PlayerHealth>(h.player) {
        health.take_damage(99);
    }

    h.world
        .resource_mut::<Messages<RestartRequest>>()
        .write(RestartRequest);
    let mut restart = Schedule::default();
    restart.add_systems(restart_session_system);
    restart.run(&mut h.world);

    assert!(!h.world.resource::<SessionStatus>().game_over);
    assert_eq!(h.world.query::<&Enemy>().iter(&h.world).count(), 0);
    assert!(h.world.get_entity(h.player).is_err());
    let ships: Vec<PlayerHealth> = h
        .world
        .query_filtered::<&PlayerHealth, With<Player>>()
        .iter(&h.world)
        .copied()
        .collect();
    assert_eq!(ships.len(), 1);
    assert!(!ships[0].is_defeated());

    // The campaign replays from its first event.
    h.ticks(2);
    assert_eq!(h.world.query::<&Enemy>().iter(&h.world).count(), 1);
}

#[test]
fn restart_is_ignored_while_alive() {
    let mut h = Harness::new(GameConfig::default());
    h.world.init_resource::<Messages<RestartRequest>>();
    h.world
        .resource_mut::<Messages<RestartRequest>>()
        .write(RestartRequest);
    let mut restart = Schedule::default();
    restart.add_systems(restart_session_system);
    restart.run(&mut h.world);

    assert!(h.world.get_entity(h.player).is_ok());
}

#[test]
fn progress_reset_keeps_only_the_first_checkpoint() {
    use typing_shooter::campaign::{CheckpointRecord, CheckpointStore, Checkpoints, PlayerSnapshot};

    let mut h = Harness::new(GameConfig::default());
    h.world.init_resource::<Messages<ResetProgressRequest>>();
    {
        let mut store = h.world.resource_mut::<Checkpoints>();
        for id in 1..=3 {
            store
                .0
                .save(CheckpointRecord {
                    id,
                    title: String::new(),
                    description: String::new(),
                    states: PlayerSnapshot {
                        position: [400.0, 445.0],
                        health: 3,
                        ammo: 100,
                        score: 0,
                    },
                    timestamp: 0,
                })
                .unwrap();
        }
    }
    h.world
        .resource_mut::<Messages<ResetProgressRequest>>()
        .write(ResetProgressRequest);
    let mut reset = Schedule::default();
    reset.add_systems(reset_progress_system);
    reset.run(&mut h.world);

    let ids: Vec<u32> = h
        .world
        .resource::<Checkpoints>()
        .0
        .list_unlocked_ids()
        .into_iter()
        .collect();
    assert_eq!(ids, vec![1]);
}
