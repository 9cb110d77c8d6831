//! Per-tick combat resolution: projectile impacts, ship collisions, pruning.
//!
//! The three systems run chained in [`crate::simulation::TickSet::Combat`], so
//! despawns queued by one are applied before the next one looks at the world.
//! Within a sweep a removed-set stops an entity from being handled twice.

use bevy::prelude::*;
use std::collections::HashSet;

use super::projectile::Projectile;
use super::{CombatEvent, SessionStats, TargetLock};
use crate::body::{Body, SpawnOrder};
use crate::config::GameConfig;
use crate::constants::COLLISION_DAMAGE;
use crate::enemy::{Enemy, Pushback};
use crate::player::{DamageOutcome, Player, PlayerAmmo, PlayerHealth};
use crate::session::SessionStatus;

/// Home every projectile one step and resolve the ones that land.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn projectile_hit_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut lock: ResMut<TargetLock>,
    mut stats: ResMut<SessionStats>,
    mut events: MessageWriter<CombatEvent>,
    mut q_player: Query<&mut PlayerAmmo, With<Player>>,
    mut q_projectiles: Query<(Entity, &SpawnOrder, &mut Projectile)>,
    mut q_enemies: Query<(&Body, &Enemy, &mut Pushback), Without<Projectile>>,
) {
    let mut order: Vec<(SpawnOrder, Entity)> =
        q_projectiles.iter().map(|(e, o, _)| (*o, e)).collect();
    order.sort_unstable();

    let mut removed: HashSet<Entity> = HashSet::new();

    for (_, shot) in order {
        let Ok((_, _, mut projectile)) = q_projectiles.get_mut(shot) else {
            continue;
        };
        let target = projectile.target;
        let Some((body, enemy, mut pushback)) = q_enemies
            .get_mut(target)
            .ok()
            .filter(|_| !removed.contains(&target))
        else {
            commands.entity(shot).despawn();
            continue;
        };

        projectile.step_toward(body.center, config.projectile_speed);
        if !projectile.body().overlaps(body) {
            continue;
        }

        events.write(CombatEvent::Hit {
            at: projectile.position,
        });
        stats.hits += 1;
        pushback.apply_impulse(body.center, projectile.position, config.impulse_force);
        commands.entity(shot).despawn();

        if !enemy.is_defeated() {
            continue;
        }
        events.write(CombatEvent::Shockwave { at: body.center });
        if enemy.drop_count > 0 {
            if let Ok(mut ammo) = q_player.single_mut() {
                ammo.gain(enemy.drop_count);
            }
            stats.ammo_collected += enemy.drop_count;
            events.write(CombatEvent::Reward {
                at: body.center,
                amount: enemy.drop_count,
            });
        }
        stats.enemies_defeated += 1;
        lock.release(target);
        removed.insert(target);
        commands.entity(target).despawn();
    }
}

/// Damage the ship for every hazard touching it. Runs even after game over.
#[allow(clippy::type_complexity)]
pub fn player_collision_system(
    mut commands: Commands,
    mut status: ResMut<SessionStatus>,
    mut lock: ResMut<TargetLock>,
    mut events: MessageWriter<CombatEvent>,
    mut q_player: Query<(&Body, &mut PlayerHealth), (With<Player>, Without<Enemy>)>,
    q_enemies: Query<(Entity, &SpawnOrder, &Body, &Enemy), Without<Player>>,
) {
    let Ok((ship, mut health)) = q_player.single_mut() else {
        return;
    };

    let mut hits: Vec<(SpawnOrder, Entity)> = q_enemies
        .iter()
        .filter(|(_, _, body, enemy)| enemy.kind.is_hazard() && body.overlaps(ship))
        .map(|(entity, order, _, _)| (*order, entity))
        .collect();
    hits.sort_unstable();

    for (_, entity) in hits {
        commands.entity(entity).despawn();
        lock.release(entity);

        match health.take_damage(COLLISION_DAMAGE) {
            DamageOutcome::Damaged { remaining } => {
                events.write(CombatEvent::PlayerHit { remaining });
            }
            DamageOutcome::Defeated => {
                events.write(CombatEvent::PlayerHit { remaining: 0 });
                events.write(CombatEvent::PlayerDefeated);
                status.game_over = true;
                info!("Ship destroyed; press Enter to restart");
            }
            DamageOutcome::AlreadyDefeated => {}
        }
    }
}

/// Despawn anything that has drifted beyond the playfield margins.
pub fn prune_offscreen_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut lock: ResMut<TargetLock>,
    q_enemies: Query<(Entity, &Body), With<Enemy>>,
    q_projectiles: Query<(Entity, &Projectile)>,
) {
    let playfield = config.playfield();
    for (entity, body) in q_enemies.iter() {
        if body.is_outside(playfield) {
            lock.release(entity);
            commands.entity(entity).despawn();
        }
    }
    for (entity, projectile) in q_projectiles.iter() {
        if projectile.body().is_outside(playfield) {
            commands.entity(entity).despawn();
        }
    }
}
