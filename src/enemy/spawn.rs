//! Enemy construction.
//!
//! [`EnemyBlueprint::build`] rolls every random choice for a new enemy
//! (position, speed, word, drop) so the result can be inspected in tests before
//! [`spawn_enemy`] turns it into an entity.

use bevy::prelude::*;
use rand::Rng;

use super::behavior::{
    BattleshipState, Behavior, DividerState, DroneState, GunshipState, MeteorState, MineState,
    Pushback, ShellState,
};
use super::{Enemy, EnemyKind};
use crate::body::{to_world, Body, SpawnCounter};
use crate::config::GameConfig;
use crate::constants::*;
use crate::words::{random_letter, random_word, WordBank};

/// What to spawn, with any placement the spawner dictates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnKind {
    Meteor,
    Gunship,
    Battleship,
    ProximityMine,
    /// Launched from `at`, or dropped in from above when `None`.
    SuicideDrone { at: Option<Vec2> },
    Shell { at: Vec2, drift: f32 },
    CheckpointDivider { id: u32 },
}

/// Fully rolled enemy, ready to spawn.
#[derive(Debug, Clone)]
pub struct EnemyBlueprint {
    pub enemy: Enemy,
    pub body: Body,
    pub behavior: Behavior,
}

impl EnemyBlueprint {
    pub fn build<R: Rng + ?Sized>(
        kind: SpawnKind,
        words: &mut WordBank,
        rng: &mut R,
        playfield: Vec2,
    ) -> Self {
        let lane = |rng: &mut R| rng.gen_range(50.0..=(playfield.x - 50.0).max(50.0));

        match kind {
            SpawnKind::Meteor => {
                let word = words.next_word(rng);
                let len = word.chars().count() as u32;
                let drop = rng.gen_range(len..=len + METEOR_BONUS_DROP);
                let speed = rng.gen_range(METEOR_MIN_SPEED..=METEOR_MAX_SPEED);
                let angle = rng
                    .gen_range(-METEOR_MAX_ANGLE_DEG..=METEOR_MAX_ANGLE_DEG)
                    .to_radians();
                let spin = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                let size = Vec2::splat(METEOR_SIZE);
                Self {
                    enemy: Enemy::new(EnemyKind::Meteor, word, drop),
                    body: Body::new(Vec2::new(lane(rng), METEOR_SPAWN_TOP + size.y * 0.5), size),
                    behavior: Behavior::Meteor(MeteorState::new(speed, angle, spin)),
                }
            }
            SpawnKind::Gunship => Self {
                enemy: Enemy::new(
                    EnemyKind::Gunship,
                    random_word(rng, DEFAULT_WORD_MIN..=DEFAULT_WORD_MAX),
                    0,
                ),
                body: Body::new(
                    Vec2::new(playfield.x * 0.5, 0.0),
                    Vec2::new(GUNSHIP_WIDTH, GUNSHIP_HEIGHT),
                ),
                behavior: Behavior::Gunship(GunshipState::default()),
            },
            SpawnKind::Battleship => {
                let x = rng.gen_range(100.0..=(playfield.x - 100.0).max(100.0));
                let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                Self {
                    enemy: Enemy::new(
                        EnemyKind::Battleship,
                        random_word(rng, BATTLESHIP_WORD_MIN..=BATTLESHIP_WORD_MAX),
                        0,
                    ),
                    body: Body::new(
                        Vec2::new(x, BATTLESHIP_SPAWN_Y),
                        Vec2::new(BATTLESHIP_WIDTH, BATTLESHIP_HEIGHT),
                    ),
                    behavior: Behavior::Battleship(BattleshipState::new(direction)),
                }
            }
            SpawnKind::ProximityMine => {
                let size = Vec2::splat(MINE_SIZE);
                Self {
                    enemy: Enemy::new(
                        EnemyKind::ProximityMine,
                        random_word(rng, DEFAULT_WORD_MIN..=DEFAULT_WORD_MAX),
                        0,
                    ),
                    body: Body::new(Vec2::new(lane(rng), HAZARD_SPAWN_TOP + size.y * 0.5), size),
                    behavior: Behavior::ProximityMine(MineState::default()),
                }
            }
            SpawnKind::SuicideDrone { at } => {
                let size = Vec2::splat(DRONE_SIZE);
                let center = match at {
                    Some(at) => at,
                    None => Vec2::new(lane(rng), HAZARD_SPAWN_TOP + size.y * 0.5),
                };
                let speed = rng.gen_range(DRONE_MIN_SPEED..=DRONE_MAX_SPEED);
                Self {
                    enemy: Enemy::new(
                        EnemyKind::SuicideDrone,
                        random_word(rng, DRONE_WORD_LEN..=DRONE_WORD_LEN),
                        0,
                    ),
                    body: Body::new(center, size),
                    behavior: Behavior::SuicideDrone(DroneState::new(speed)),
                }
            }
            SpawnKind::Shell { at, drift } => Self {
                enemy: Enemy::new(EnemyKind::Shell, random_letter(rng).to_string(), 0),
                body: Body::new(at, Vec2::new(SHELL_WIDTH, SHELL_HEIGHT)),
                behavior: Behavior::Shell(ShellState::new(drift)),
            },
            SpawnKind::CheckpointDivider { id } => Self {
                enemy: Enemy::new(EnemyKind::CheckpointDivider, "", 0),
                body: Body::new(
                    Vec2::new(playfield.x * 0.5, DIVIDER_START_Y),
                    Vec2::new(playfield.x, DIVIDER_THICKNESS),
                ),
                behavior: Behavior::CheckpointDivider(DividerState::new(id)),
            },
        }
    }
}

/// Spawn a blueprint as a new entity at the end of the spawn order.
pub fn spawn_enemy(
    commands: &mut Commands,
    counter: &mut SpawnCounter,
    blueprint: EnemyBlueprint,
    config: &GameConfig,
) -> Entity {
    let translation = to_world(blueprint.body.center, config.playfield()).extend(1.0);
    commands
        .spawn((
            blueprint.enemy,
            blueprint.body,
            blueprint.behavior,
            Pushback::new(config.enemy_friction),
            counter.next_order(),
            Transform::from_translation(translation),
            Visibility::default(),
        ))
        .id()
}
