//! Session lifecycle: state machine, shared RNG, start, restart and progress reset.

use std::collections::BTreeSet;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::campaign::{
    CampaignScript, CampaignSequencer, CheckpointStore, Checkpoints, FileCheckpointStore,
    MeteorShower, PlayerSnapshot,
};
use crate::combat::{Projectile, SessionStats, TargetLock};
use crate::config::GameConfig;
use crate::constants::FIRST_CHECKPOINT;
use crate::enemy::Enemy;
use crate::player::{spawn_player, Player};
use crate::simulation::SimClock;
use crate::words::WordBank;

/// Top-level application state machine.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Active simulation.
    #[default]
    Playing,
    /// Simulation frozen; rendering and input keep running.
    Paused,
}

/// Set once the ship is destroyed. Typing, spawning and campaign dispatch stop
/// until a restart.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub game_over: bool,
}

/// The one random source of the simulation.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &GameConfig) -> Self {
        match config.rng_seed {
            Some(seed) => Self::seeded(seed),
            None => Self::default(),
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Checkpoint the current session started from; restarts return here.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartCheckpoint(pub u32);

impl Default for StartCheckpoint {
    fn default() -> Self {
        Self(FIRST_CHECKPOINT)
    }
}

/// Enter pressed on the game-over screen.
#[derive(Message, Debug, Clone, Copy)]
pub struct RestartRequest;

/// Wipe every unlocked checkpoint except the first.
#[derive(Message, Debug, Clone, Copy)]
pub struct ResetProgressRequest;

/// Checkpoint to start from: the requested one if it is unlocked, else the first.
pub fn resolve_start_checkpoint(requested: u32, unlocked: &BTreeSet<u32>) -> u32 {
    if requested == FIRST_CHECKPOINT || unlocked.contains(&requested) {
        return requested;
    }
    warn!("Checkpoint {requested} is not unlocked; starting from checkpoint {FIRST_CHECKPOINT}");
    FIRST_CHECKPOINT
}

/// Point `sequencer` at `checkpoint` and fetch the player state banked there.
///
/// A checkpoint the script does not contain rewinds to the first event.
pub fn begin_at_checkpoint(
    sequencer: &mut CampaignSequencer,
    store: &dyn CheckpointStore,
    checkpoint: u32,
    now_ms: u64,
) -> Option<PlayerSnapshot> {
    match sequencer.resume_from(checkpoint, now_ms) {
        Ok(index) => {
            info!("Starting at checkpoint {checkpoint} (event {index})");
            store.load(checkpoint).map(|record| record.states)
        }
        Err(err) => {
            warn!("{err}; starting from the first event");
            sequencer.restart(now_ms);
            None
        }
    }
}

/// Startup system: build every per-session resource and spawn the ship.
pub fn start_session_system(mut commands: Commands, config: Res<GameConfig>, clock: Res<SimClock>) {
    let mut rng = GameRng::from_config(&config);
    let words = WordBank::load_or_default(&config.word_list_path, &mut rng.0);
    let script = CampaignScript::load_or_default(&config.campaign_path);
    let store = FileCheckpointStore::new(&config.checkpoint_path);

    let start = resolve_start_checkpoint(config.start_checkpoint, &store.list_unlocked_ids());
    let now = clock.now_ms();
    let mut sequencer = CampaignSequencer::new(script, now);
    let snapshot = begin_at_checkpoint(&mut sequencer, &store, start, now);

    spawn_player(&mut commands, &config, snapshot.as_ref());
    info!(
        "Session started: {} campaign events, {} words, {} targeting",
        sequencer.len(),
        words.len(),
        config.targeting_mode.label()
    );

    commands.insert_resource(rng);
    commands.insert_resource(words);
    commands.insert_resource(sequencer);
    commands.insert_resource(MeteorShower::new(config.shower_interval()));
    commands.insert_resource(Checkpoints(Box::new(store)));
    commands.insert_resource(StartCheckpoint(start));
    commands.insert_resource(TargetLock::default());
    commands.insert_resource(SessionStats::default());
    commands.insert_resource(SessionStatus::default());
}

/// Rebuild the session from its starting checkpoint after game over.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn restart_session_system(
    mut commands: Commands,
    mut requests: MessageReader<RestartRequest>,
    config: Res<GameConfig>,
    clock: Res<SimClock>,
    store: Res<Checkpoints>,
    start: Res<StartCheckpoint>,
    mut sequencer: ResMut<CampaignSequencer>,
    mut shower: ResMut<MeteorShower>,
    mut lock: ResMut<TargetLock>,
    mut stats: ResMut<SessionStats>,
    mut status: ResMut<SessionStatus>,
    mut next_state: ResMut<NextState<GameState>>,
    q_actors: Query<Entity, Or<(With<Enemy>, With<Projectile>, With<Player>)>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    if !status.game_over {
        return;
    }

    for entity in q_actors.iter() {
        commands.entity(entity).despawn();
    }

    let now = clock.now_ms();
    let snapshot = begin_at_checkpoint(&mut sequencer, store.0.as_ref(), start.0, now);
    spawn_player(&mut commands, &config, snapshot.as_ref());

    shower.reset();
    *lock = TargetLock::default();
    *stats = SessionStats::default();
    *status = SessionStatus::default();
    next_state.set(GameState::Playing);
    info!("Restarted from checkpoint {}", start.0);
}

/// Forget campaign progress beyond the first checkpoint.
pub fn reset_progress_system(
    mut requests: MessageReader<ResetProgressRequest>,
    mut store: ResMut<Checkpoints>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    match store.0.delete_all_except(FIRST_CHECKPOINT) {
        Ok(()) => info!("Checkpoint progress reset"),
        Err(err) => error!("Failed to reset checkpoint progress: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CheckpointRecord, MemoryCheckpointStore};

    fn two_checkpoint_script() -> CampaignScript {
        CampaignScript::parse(
            r#"[
                {"delay": 0, "action": {"checkpoint": {"id": 1}}},
                {"delay": 0, "action": {"spawn": {"enemy_type": "enemy_meteor"}}},
                {"delay": 500, "action": {"checkpoint": {"id": 2}}}
            ]"#,
        )
        .expect("script should parse")
    }

    #[test]
    fn locked_checkpoints_fall_back_to_the_first() {
        let unlocked: BTreeSet<u32> = [1, 2].into_iter().collect();
        assert_eq!(resolve_start_checkpoint(2, &unlocked), 2);
        assert_eq!(resolve_start_checkpoint(3, &unlocked), FIRST_CHECKPOINT);
        assert_eq!(resolve_start_checkpoint(1, &BTreeSet::new()), 1);
    }

    #[test]
    fn beginning_at_a_saved_checkpoint_restores_the_snapshot() {
        let mut store = MemoryCheckpointStore::default();
        let states = PlayerSnapshot {
            position: [300.0, 445.0],
            health: 2,
            ammo: 40,
            score: 6,
        };
        store
            .save(CheckpointRecord {
                id: 2,
                title: String::new(),
                description: String::new(),
                states: states.clone(),
                timestamp: 0,
            })
            .unwrap();

        let mut sequencer = CampaignSequencer::new(two_checkpoint_script(), 0);
        assert_eq!(
            begin_at_checkpoint(&mut sequencer, &store, 2, 0),
            Some(states)
        );
        assert_eq!(sequencer.next_index(), 2);
    }

    #[test]
    fn unknown_checkpoint_rewinds_to_the_start() {
        let store = MemoryCheckpointStore::default();
        let mut sequencer = CampaignSequencer::new(two_checkpoint_script(), 0);
        sequencer.poll(0);
        assert_eq!(begin_at_checkpoint(&mut sequencer, &store, 9, 10), None);
        assert_eq!(sequencer.next_index(), 0);
    }

    #[test]
    fn seeded_rngs_agree() {
        use rand::Rng;
        let mut a = GameRng::seeded(11);
        let mut b = GameRng::seeded(11);
        assert_eq!(a.0.gen::<u64>(), b.0.gen::<u64>());
    }
}
