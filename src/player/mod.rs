//! Player module: ship entity, input mapping, movement and shield.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | ECS components (`Player`, `PlayerHealth`, `PlayerAmmo`, `PlayerGun`, `Shield`) and the `PlayerIntent` resource |
//! | [`control`] | Keyboard systems: letters and Tab to targeting commands, arrows and Space to intent, Escape/Enter/F9 session keys |
//!
//! Targeting and firing live in [`crate::combat`]; this module only owns the
//! ship itself.
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod control;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use control::{keyboard_command_system, keyboard_to_intent_system, ControlsPlugin};
pub use state::{
    step_ship, DamageOutcome, Player, PlayerAmmo, PlayerGun, PlayerHealth, PlayerIntent, Shield,
};

use crate::body::{to_world, Body};
use crate::campaign::checkpoint::PlayerSnapshot;
use crate::config::GameConfig;
use crate::constants::{PLAYER_SIZE, PLAYER_Y_FRACTION};
use bevy::prelude::*;

// ── Ship spawn ─────────────────────────────────────────────────────────────────

/// Spawn the player's ship at the bottom centre of the playfield.
///
/// When resuming from a checkpoint, `snapshot` restores health, ammo and the
/// horizontal position that were banked with it.
pub fn spawn_player(
    commands: &mut Commands,
    config: &GameConfig,
    snapshot: Option<&PlayerSnapshot>,
) -> Entity {
    let playfield = config.playfield();
    let mut body = Body::new(
        Vec2::new(playfield.x * 0.5, playfield.y * PLAYER_Y_FRACTION),
        Vec2::splat(PLAYER_SIZE),
    );
    let (health, ammo) = match snapshot {
        Some(saved) => {
            body.center.x = saved.position[0];
            body.clamp_x(playfield.x);
            // A banked snapshot never revives a destroyed ship with zero health.
            (saved.health.max(1), saved.ammo)
        }
        None => (config.player_start_health, config.player_start_ammo),
    };

    commands
        .spawn((
            Player,
            PlayerHealth::new(health),
            PlayerAmmo::new(ammo),
            PlayerGun::default(),
            Shield::default(),
            body,
            Transform::from_translation(to_world(body.center, playfield).extend(2.0)),
            Visibility::default(),
        ))
        .id()
}

// ── Per-tick systems ───────────────────────────────────────────────────────────

/// Apply the horizontal intent. A destroyed ship stays where it is.
pub fn player_movement_system(
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    mut q_player: Query<(&mut Body, &PlayerHealth), With<Player>>,
) {
    for (mut body, health) in q_player.iter_mut() {
        if health.is_defeated() || intent.direction == 0.0 {
            continue;
        }
        step_ship(
            &mut body,
            intent.direction,
            config.player_speed,
            config.screen_width,
        );
    }
}

/// Mirror the held shield key onto the ship.
pub fn shield_system(intent: Res<PlayerIntent>, mut q_player: Query<&mut Shield, With<Player>>) {
    for mut shield in q_player.iter_mut() {
        if shield.active != intent.shield {
            shield.active = intent.shield;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player(intent: PlayerIntent) -> (World, Entity) {
        let mut world = World::new();
        let config = GameConfig::default();
        world.insert_resource(intent);
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let player = {
            let mut commands = Commands::new(&mut queue, &world);
            spawn_player(&mut commands, &config, None)
        };
        queue.apply(&mut world);
        world.insert_resource(config);
        (world, player)
    }

    #[test]
    fn movement_follows_intent() {
        let (mut world, player) = world_with_player(PlayerIntent {
            direction: 1.0,
            shield: true,
        });
        let mut schedule = Schedule::default();
        schedule.add_systems((player_movement_system, shield_system));
        schedule.run(&mut world);

        let body = world.get::<Body>(player).copied().expect("player body");
        assert_eq!(body.center.x, 404.0);
        assert!(world.get::<Shield>(player).is_some_and(|s| s.active));
    }

    #[test]
    fn destroyed_ship_does_not_move() {
        let (mut world, player) = world_with_player(PlayerIntent {
            direction: -1.0,
            shield: false,
        });
        if let Some(mut health) = world.get_mut::<PlayerHealth>(player) {
            health.take_damage(99);
        }
        let mut schedule = Schedule::default();
        schedule.add_systems(player_movement_system);
        schedule.run(&mut world);
        assert_eq!(world.get::<Body>(player).map(|b| b.center.x), Some(400.0));
    }

    #[test]
    fn snapshot_restores_economy_and_position() {
        let mut world = World::new();
        let config = GameConfig::default();
        let snapshot = PlayerSnapshot {
            position: [120.0, 445.0],
            health: 2,
            ammo: 37,
            score: 4,
        };
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let player = {
            let mut commands = Commands::new(&mut queue, &world);
            spawn_player(&mut commands, &config, Some(&snapshot))
        };
        queue.apply(&mut world);

        assert_eq!(world.get::<PlayerHealth>(player).map(|h| h.hp), Some(2));
        assert_eq!(world.get::<PlayerAmmo>(player).map(|a| a.count), Some(37));
        assert_eq!(world.get::<Body>(player).map(|b| b.center.x), Some(120.0));
    }
}
