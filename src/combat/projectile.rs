use bevy::prelude::*;

use crate::body::{to_world, Body, SpawnCounter};
use crate::config::GameConfig;
use crate::constants::{PROJECTILE_HEIGHT, PROJECTILE_WIDTH};

/// A letter in flight toward the enemy it was typed at.
///
/// Projectiles home on their target every tick and never miss; one whose
/// target has disappeared is discarded by the resolver.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub target: Entity,
    pub letter: char,
    pub position: Vec2,
    /// Unit direction of the last step, used to orient the sprite.
    pub heading: Vec2,
}

impl Projectile {
    pub fn new(target: Entity, letter: char, position: Vec2) -> Self {
        Self {
            target,
            letter,
            position,
            heading: Vec2::NEG_Y,
        }
    }

    pub fn body(&self) -> Body {
        Body::new(self.position, Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT))
    }

    /// Move up to `speed` pixels toward `target`, never overshooting.
    pub fn step_toward(&mut self, target: Vec2, speed: f32) {
        let offset = target - self.position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        self.heading = offset / distance;
        self.position += self.heading * speed.min(distance);
    }
}

pub fn spawn_projectile(
    commands: &mut Commands,
    counter: &mut SpawnCounter,
    projectile: Projectile,
    config: &GameConfig,
) -> Entity {
    let world = to_world(projectile.position, config.playfield());
    commands
        .spawn((
            projectile,
            counter.next_order(),
            Transform::from_translation(world.extend(1.5)),
            Visibility::default(),
        ))
        .id()
}
