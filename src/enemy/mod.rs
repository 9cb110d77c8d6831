//! Enemies: shared components, per-type state machines and spawning.
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`behavior`] | `Behavior` state machines, `Pushback`, advance context and effects |
//! | [`spawn`] | `SpawnKind`, `EnemyBlueprint` and `spawn_enemy` |
//!
//! Every hostile actor is an entity with [`Enemy`], [`Body`], [`Behavior`],
//! [`Pushback`] and [`SpawnOrder`]. [`enemy_advance_system`] steps all of them
//! once per fixed tick in spawn order.

pub mod behavior;
pub mod spawn;

pub use behavior::{
    AdvanceContext, BattleshipPhase, BattleshipState, Behavior, BehaviorEffect, DividerState,
    DronePhase, DroneState, GunshipPhase, GunshipState, MeteorState, MineState, Pulse, Pushback,
    ShellState,
};
pub use spawn::{spawn_enemy, EnemyBlueprint, SpawnKind};

use bevy::prelude::*;

use crate::body::{Body, SpawnCounter, SpawnOrder};
use crate::campaign::CheckpointReached;
use crate::config::GameConfig;
use crate::player::Player;
use crate::session::{GameRng, SessionStatus};
use crate::words::WordBank;

/// The closed set of enemy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Meteor,
    Gunship,
    Battleship,
    ProximityMine,
    SuicideDrone,
    Shell,
    CheckpointDivider,
}

impl EnemyKind {
    pub fn label(self) -> &'static str {
        match self {
            EnemyKind::Meteor => "meteor",
            EnemyKind::Gunship => "gunship",
            EnemyKind::Battleship => "battleship",
            EnemyKind::ProximityMine => "proximity mine",
            EnemyKind::SuicideDrone => "suicide drone",
            EnemyKind::Shell => "shell",
            EnemyKind::CheckpointDivider => "checkpoint divider",
        }
    }

    /// Whether touching the player deals damage. Dividers are markers only.
    pub fn is_hazard(self) -> bool {
        !matches!(self, EnemyKind::CheckpointDivider)
    }
}

/// Word state and economy of one enemy.
///
/// `hit_count` always equals the number of letters left in the word.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    word: String,
    pub hit_count: u32,
    /// Ammo granted to the player when this enemy is defeated.
    pub drop_count: u32,
    /// Set while this enemy holds the selection-mode lock.
    pub selected: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, word: impl Into<String>, drop_count: u32) -> Self {
        let word: String = word.into();
        Self {
            kind,
            hit_count: word.chars().count() as u32,
            word,
            drop_count,
            selected: false,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn leading_letter(&self) -> Option<char> {
        self.word.chars().next()
    }

    /// Case-insensitive check against the leading letter.
    pub fn matches(&self, letter: char) -> bool {
        self.leading_letter()
            .is_some_and(|c| c.to_ascii_lowercase() == letter.to_ascii_lowercase())
    }

    /// Pop the leading letter, keeping `hit_count` in step with the word.
    pub fn remove_letter(&mut self) -> Option<char> {
        let mut chars = self.word.chars();
        let first = chars.next()?;
        self.word = chars.as_str().to_string();
        self.hit_count = self.hit_count.saturating_sub(1);
        Some(first)
    }

    /// Defeated once every letter has been typed.
    pub fn is_defeated(&self) -> bool {
        self.word.is_empty()
    }

    pub fn is_targetable(&self) -> bool {
        self.kind.is_hazard() && !self.is_defeated()
    }
}

/// Step every enemy's state machine by one tick, in spawn order.
///
/// Spawn effects (shells, drones) are queued through `Commands` and join the
/// list on the next tick. Checkpoint crossings are forwarded as
/// [`CheckpointReached`] messages.
#[allow(clippy::too_many_arguments)]
pub fn enemy_advance_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    status: Res<SessionStatus>,
    mut rng: ResMut<GameRng>,
    mut words: ResMut<WordBank>,
    mut counter: ResMut<SpawnCounter>,
    mut crossings: MessageWriter<CheckpointReached>,
    q_player: Query<&Body, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<
        (Entity, &SpawnOrder, &mut Body, &mut Behavior, &mut Pushback),
        (With<Enemy>, Without<Player>),
    >,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    let ctx = AdvanceContext {
        player_center: player.center,
        player_top: player.top(),
        playfield: config.playfield(),
        game_over: status.game_over,
    };

    let mut order: Vec<(SpawnOrder, Entity)> =
        q_enemies.iter().map(|(e, o, ..)| (*o, e)).collect();
    order.sort_unstable();

    for (_, entity) in order {
        let Ok((_, _, mut body, mut behavior, mut pushback)) = q_enemies.get_mut(entity) else {
            continue;
        };
        let effects = behavior.advance(&mut body, &mut pushback, &ctx, &mut rng.0);
        for effect in effects {
            match effect {
                BehaviorEffect::Spawn(kind) => {
                    let blueprint =
                        EnemyBlueprint::build(kind, &mut words, &mut rng.0, ctx.playfield);
                    spawn_enemy(&mut commands, &mut counter, blueprint, &config);
                }
                BehaviorEffect::CheckpointCrossed(id) => {
                    crossings.write(CheckpointReached { id });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_letters_tracks_hit_count() {
        let mut enemy = Enemy::new(EnemyKind::Meteor, "cat", 2);
        assert_eq!(enemy.hit_count, 3);
        assert_eq!(enemy.remove_letter(), Some('c'));
        assert_eq!(enemy.hit_count as usize, enemy.word().len());
        enemy.remove_letter();
        enemy.remove_letter();
        assert_eq!(enemy.hit_count, 0);
        assert!(enemy.is_defeated());
        assert_eq!(enemy.remove_letter(), None);
        assert_eq!(enemy.hit_count, 0);
    }

    #[test]
    fn matching_ignores_case() {
        let enemy = Enemy::new(EnemyKind::Gunship, "Vesta", 0);
        assert!(enemy.matches('v'));
        assert!(enemy.matches('V'));
        assert!(!enemy.matches('e'));
    }

    #[test]
    fn dividers_are_never_targets() {
        let divider = Enemy::new(EnemyKind::CheckpointDivider, "", 0);
        assert!(!divider.is_targetable());
        assert!(!divider.kind.is_hazard());
    }
}
