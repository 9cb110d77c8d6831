//! Letter-to-target resolution.
//!
//! In **direct** mode every letter fires at the oldest enemy whose word starts
//! with it. In **selection** mode the first letter locks the nearest matching
//! enemy and further letters must follow that word until it is emptied or the
//! lock is cleared.
//!
//! The pure helpers ([`first_match`], [`nearest_match`], [`select_target`])
//! work on a [`Candidate`] snapshot so they can be tested without a world.

use bevy::prelude::*;

use super::projectile::{spawn_projectile, Projectile};
use super::{CombatEvent, FeedbackCue, SessionStats, TargetCommand, TargetLock};
use crate::body::{Body, SpawnCounter, SpawnOrder};
use crate::config::{GameConfig, TargetingMode};
use crate::enemy::Enemy;
use crate::player::{Player, PlayerAmmo, PlayerGun, PlayerHealth};
use crate::session::SessionStatus;

/// One targetable enemy as seen at the moment a letter is typed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub entity: Entity,
    pub center: Vec2,
    /// Lower-cased leading letter.
    pub leading: Option<char>,
}

impl Candidate {
    fn matches(&self, letter: char) -> bool {
        self.leading == Some(letter.to_ascii_lowercase())
    }
}

/// First candidate in list order whose word starts with `letter`.
pub fn first_match(candidates: &[Candidate], letter: char) -> Option<Entity> {
    candidates
        .iter()
        .find(|c| c.matches(letter))
        .map(|c| c.entity)
}

/// Closest matching candidate to `origin`; the earlier one wins a tie.
pub fn nearest_match(candidates: &[Candidate], origin: Vec2, letter: char) -> Option<Entity> {
    let mut best: Option<(f32, Entity)> = None;
    for candidate in candidates.iter().filter(|c| c.matches(letter)) {
        let d2 = candidate.center.distance_squared(origin);
        if best.is_none_or(|(best_d2, _)| d2 < best_d2) {
            best = Some((d2, candidate.entity));
        }
    }
    best.map(|(_, entity)| entity)
}

/// Pick the enemy a typed letter fires at, updating the selection lock.
///
/// A lock that no longer appears among `candidates` (gone, or its word is
/// spent) is dropped before a new one is chosen.
pub fn select_target(
    mode: TargetingMode,
    lock: &mut Option<Entity>,
    candidates: &[Candidate],
    origin: Vec2,
    letter: char,
) -> Result<Entity, FeedbackCue> {
    match mode {
        TargetingMode::Direct => first_match(candidates, letter).ok_or(FeedbackCue::NoMatch),
        TargetingMode::Selection => {
            let held = lock.and_then(|locked| candidates.iter().find(|c| c.entity == locked));
            if let Some(held) = held {
                return if held.matches(letter) {
                    Ok(held.entity)
                } else {
                    Err(FeedbackCue::Mismatch)
                };
            }
            *lock = None;
            let found = nearest_match(candidates, origin, letter).ok_or(FeedbackCue::NoMatch)?;
            *lock = Some(found);
            Ok(found)
        }
    }
}

/// Turn typed letters into projectiles.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn typing_fire_system(
    mut commands: Commands,
    mut typed: MessageReader<TargetCommand>,
    config: Res<GameConfig>,
    status: Res<SessionStatus>,
    mut lock: ResMut<TargetLock>,
    mut stats: ResMut<SessionStats>,
    mut counter: ResMut<SpawnCounter>,
    mut events: MessageWriter<CombatEvent>,
    mut q_player: Query<
        (&Body, &PlayerHealth, &mut PlayerAmmo, &mut PlayerGun),
        (With<Player>, Without<Enemy>),
    >,
    mut q_enemies: Query<(Entity, &SpawnOrder, &Body, &mut Enemy), Without<Player>>,
) {
    let Ok((player_body, health, mut ammo, mut gun)) = q_player.single_mut() else {
        typed.clear();
        return;
    };
    if status.game_over || health.is_defeated() {
        typed.clear();
        return;
    }

    for command in typed.read() {
        let letter = match *command {
            TargetCommand::ClearLock => {
                if let Some(locked) = lock.0.take() {
                    set_selected(&mut q_enemies, locked, false);
                }
                continue;
            }
            TargetCommand::Letter(letter) => letter.to_ascii_lowercase(),
        };

        let mut listed: Vec<(SpawnOrder, Candidate)> = q_enemies
            .iter()
            .filter(|(_, _, _, enemy)| enemy.is_targetable())
            .map(|(entity, order, body, enemy)| {
                (
                    *order,
                    Candidate {
                        entity,
                        center: body.center,
                        leading: enemy.leading_letter().map(|c| c.to_ascii_lowercase()),
                    },
                )
            })
            .collect();
        listed.sort_unstable_by_key(|(order, _)| *order);
        let candidates: Vec<Candidate> = listed.into_iter().map(|(_, c)| c).collect();

        let previous = lock.0;
        let target = select_target(
            config.targeting_mode,
            &mut lock.0,
            &candidates,
            player_body.center,
            letter,
        );
        if lock.0 != previous {
            if let Some(old) = previous {
                set_selected(&mut q_enemies, old, false);
            }
            if let Some(new) = lock.0 {
                set_selected(&mut q_enemies, new, true);
            }
        }

        let target = match target {
            Ok(target) => target,
            Err(cue) => {
                events.write(CombatEvent::Feedback(cue));
                continue;
            }
        };
        let Ok((_, _, target_body, mut enemy)) = q_enemies.get_mut(target) else {
            continue;
        };
        if !ammo.consume() {
            events.write(CombatEvent::Feedback(FeedbackCue::OutOfAmmo));
            continue;
        }
        let Some(removed) = enemy.remove_letter() else {
            continue;
        };

        gun.aim_at(PlayerGun::mount(player_body), target_body.center);
        let projectile = Projectile::new(
            target,
            removed.to_ascii_lowercase(),
            gun.muzzle(player_body),
        );
        spawn_projectile(&mut commands, &mut counter, projectile, &config);
        stats.shots_fired += 1;
        events.write(CombatEvent::Shot {
            target,
            letter: projectile.letter,
        });
    }
}

fn set_selected(
    q_enemies: &mut Query<(Entity, &SpawnOrder, &Body, &mut Enemy), Without<Player>>,
    entity: Entity,
    selected: bool,
) {
    if let Ok((_, _, _, mut enemy)) = q_enemies.get_mut(entity) {
        if enemy.selected != selected {
            enemy.selected = selected;
        }
    }
}
