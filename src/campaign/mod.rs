//! Campaign module: scripted events, the meteor shower and checkpoint saves.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`script`] | JSON campaign file to `CampaignScript` (tolerant of unknown actions) |
//! | [`sequencer`] | `CampaignSequencer`: delay-gated cursor, resume by checkpoint id |
//! | [`shower`] | `MeteorShower`: periodic meteor spawner toggled by triggers |
//! | [`checkpoint`] | `CheckpointStore` trait, file and memory stores, save records |
//!
//! The systems here run in the campaign and persist stages of the fixed tick
//! (see [`crate::simulation::TickSet`]).

pub mod checkpoint;
pub mod script;
pub mod sequencer;
pub mod shower;

pub use checkpoint::{
    CheckpointRecord, CheckpointStore, Checkpoints, FileCheckpointStore, MemoryCheckpointStore,
    PlayerSnapshot,
};
pub use script::{CampaignAction, CampaignEvent, CampaignScript, EnemyType};
pub use sequencer::CampaignSequencer;
pub use shower::MeteorShower;

use bevy::prelude::*;

use crate::body::{Body, SpawnCounter};
use crate::combat::SessionStats;
use crate::config::GameConfig;
use crate::constants::MINES_PER_SPAWN;
use crate::enemy::{spawn_enemy, EnemyBlueprint, SpawnKind};
use crate::player::{Player, PlayerAmmo, PlayerHealth};
use crate::session::{GameRng, SessionStatus};
use crate::simulation::SimClock;
use crate::words::WordBank;

/// A checkpoint divider reached the player's ship.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointReached {
    pub id: u32,
}

/// A scripted line of dialogue for the HUD.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct DialogueMessage {
    pub sender: String,
    pub text: String,
}

impl EnemyType {
    fn spawn_kind(self) -> SpawnKind {
        match self {
            EnemyType::Meteor => SpawnKind::Meteor,
            EnemyType::Gunship => SpawnKind::Gunship,
            EnemyType::Battleship => SpawnKind::Battleship,
            EnemyType::ProximityMine => SpawnKind::ProximityMine,
            EnemyType::SuicideDrone => SpawnKind::SuicideDrone { at: None },
        }
    }

    /// Mines arrive in small groups; every other type spawns alone.
    fn spawn_count(self) -> usize {
        match self {
            EnemyType::ProximityMine => MINES_PER_SPAWN,
            _ => 1,
        }
    }
}

/// Dispatch the next due campaign event, if any.
#[allow(clippy::too_many_arguments)]
pub fn campaign_dispatch_system(
    mut commands: Commands,
    clock: Res<SimClock>,
    config: Res<GameConfig>,
    status: Res<SessionStatus>,
    mut sequencer: ResMut<CampaignSequencer>,
    mut shower: ResMut<MeteorShower>,
    mut rng: ResMut<GameRng>,
    mut words: ResMut<WordBank>,
    mut counter: ResMut<SpawnCounter>,
    mut dialogue: MessageWriter<DialogueMessage>,
) {
    if status.game_over {
        return;
    }
    let now = clock.now_ms();
    let Some(actions) = sequencer.poll(now) else {
        return;
    };
    let playfield = config.playfield();

    for action in actions {
        match action {
            CampaignAction::Spawn(enemy_type) => {
                for _ in 0..enemy_type.spawn_count() {
                    let blueprint = EnemyBlueprint::build(
                        enemy_type.spawn_kind(),
                        &mut words,
                        &mut rng.0,
                        playfield,
                    );
                    spawn_enemy(&mut commands, &mut counter, blueprint, &config);
                }
            }
            CampaignAction::Message { sender, text } => {
                info!("[{sender}] {text}");
                dialogue.write(DialogueMessage { sender, text });
            }
            CampaignAction::Trigger { meteor_shower } => {
                shower.set_active(meteor_shower, now, &mut rng.0);
                info!(
                    "Meteor shower {}",
                    if meteor_shower { "started" } else { "stopped" }
                );
            }
            CampaignAction::Checkpoint { id, title, .. } => {
                info!("Checkpoint {id} approaching: {title}");
                let blueprint = EnemyBlueprint::build(
                    SpawnKind::CheckpointDivider { id },
                    &mut words,
                    &mut rng.0,
                    playfield,
                );
                spawn_enemy(&mut commands, &mut counter, blueprint, &config);
            }
            CampaignAction::Music(track) => info!("Music cue: {track}"),
            CampaignAction::Cutscene(name) => info!("Cutscene cue: {name}"),
            CampaignAction::Unknown(what) => warn!("Ignoring unknown campaign action {what}"),
        }
    }
}

/// Inject shower meteors while the shower is active.
#[allow(clippy::too_many_arguments)]
pub fn meteor_shower_system(
    mut commands: Commands,
    clock: Res<SimClock>,
    config: Res<GameConfig>,
    status: Res<SessionStatus>,
    mut shower: ResMut<MeteorShower>,
    mut rng: ResMut<GameRng>,
    mut words: ResMut<WordBank>,
    mut counter: ResMut<SpawnCounter>,
) {
    if status.game_over || !shower.tick(clock.now_ms(), &mut rng.0) {
        return;
    }
    let blueprint =
        EnemyBlueprint::build(SpawnKind::Meteor, &mut words, &mut rng.0, config.playfield());
    spawn_enemy(&mut commands, &mut counter, blueprint, &config);
}

/// Bank the player's state whenever a divider reaches the ship.
pub fn checkpoint_save_system(
    mut reached: MessageReader<CheckpointReached>,
    mut store: ResMut<Checkpoints>,
    sequencer: Res<CampaignSequencer>,
    stats: Res<SessionStats>,
    q_player: Query<(&Body, &PlayerHealth, &PlayerAmmo), With<Player>>,
) {
    for event in reached.read() {
        let Ok((body, health, ammo)) = q_player.single() else {
            warn!("Checkpoint {} reached without a player; not saved", event.id);
            continue;
        };
        let (title, description) = sequencer
            .checkpoint_details(event.id)
            .map(|(t, d)| (t.to_string(), d.to_string()))
            .unwrap_or_default();
        let record = CheckpointRecord {
            id: event.id,
            title,
            description,
            states: PlayerSnapshot {
                position: [body.center.x, body.center.y],
                health: health.hp,
                ammo: ammo.count,
                score: stats.enemies_defeated,
            },
            timestamp: 0,
        };
        match store.0.save(record) {
            Ok(()) => info!("Saved checkpoint {}", event.id),
            Err(err) => error!("Failed to save checkpoint {}: {}", event.id, err),
        }
    }
}
