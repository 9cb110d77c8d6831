//! Cosmetic effects driven by [`CombatEvent`] messages: hit sparks, defeat
//! shockwaves, floating ammo rewards and a border flash for rejected letters.
//!
//! | System | Schedule | Purpose |
//! |--------|----------|---------|
//! | `spawn_combat_effects_system` | Update | Turn combat messages into effect entities |
//! | `effect_update_system` | Update | Move, age and despawn effects |
//! | `draw_effects_system` | Update | Gizmo pass for sparks, rings and the border flash |
//!
//! Effects never feed back into the simulation and use their own thread RNG so
//! seeded sessions stay reproducible.

use bevy::prelude::*;
use rand::Rng;

use crate::body::to_world;
use crate::combat::{CombatEvent, FeedbackCue};
use crate::config::GameConfig;

const SPARK_COUNT: u32 = 8;
const SPARK_LIFETIME: (f32, f32) = (0.20, 0.40);
const SHOCKWAVE_LIFETIME: f32 = 0.45;
const SHOCKWAVE_RADIUS: f32 = 60.0;
const REWARD_LIFETIME: f32 = 0.9;
const REWARD_RISE_SPEED: f32 = 40.0;
const FLASH_LIFETIME: f32 = 0.25;

// ── Components ───────────────────────────────────────────────────────────────

/// Short-lived visual entity. Positions live in the entity's `Transform`.
#[derive(Component, Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    /// World-space velocity (units/s).
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    Spark(Color),
    Shockwave,
    /// Floating "+N" label; the text lives on the same entity.
    Reward,
}

impl Effect {
    /// Quadratic ease-out: bright at birth, fast fade at the end.
    pub fn alpha(&self) -> f32 {
        let t = (self.age / self.lifetime.max(f32::EPSILON)).clamp(0.0, 1.0);
        (1.0 - t).powi(2)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Border flash shown after a rejected letter or a hull hit.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct BorderFlash {
    pub color: Option<Color>,
    pub age: f32,
}

impl BorderFlash {
    fn trigger(&mut self, color: Color) {
        self.color = Some(color);
        self.age = 0.0;
    }
}

fn feedback_color(cue: FeedbackCue) -> Color {
    match cue {
        FeedbackCue::NoMatch => Color::srgb(0.6, 0.6, 0.65),
        FeedbackCue::Mismatch => Color::srgb(1.0, 0.55, 0.1),
        FeedbackCue::OutOfAmmo => Color::srgb(1.0, 0.9, 0.2),
    }
}

// ── Plugin ───────────────────────────────────────────────────────────────────

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BorderFlash>().add_systems(
            Update,
            (
                spawn_combat_effects_system,
                effect_update_system,
                draw_effects_system,
            )
                .chain(),
        );
    }
}

// ── Spawn helpers ────────────────────────────────────────────────────────────

/// Orange sparks fanning out from `pos` (world space).
pub fn spawn_hit_sparks(commands: &mut Commands, pos: Vec2) {
    let mut rng = rand::thread_rng();
    for _ in 0..SPARK_COUNT {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(60.0_f32..160.0_f32);
        let color = Color::srgb(
            rng.gen_range(0.90..1.0),
            rng.gen_range(0.50..0.75),
            rng.gen_range(0.0..0.20),
        );
        commands.spawn((
            Effect {
                kind: EffectKind::Spark(color),
                velocity: Vec2::from_angle(angle) * speed,
                age: 0.0,
                lifetime: rng.gen_range(SPARK_LIFETIME.0..SPARK_LIFETIME.1),
            },
            Transform::from_translation(pos.extend(3.0)),
        ));
    }
}

pub fn spawn_shockwave(commands: &mut Commands, pos: Vec2) {
    commands.spawn((
        Effect {
            kind: EffectKind::Shockwave,
            velocity: Vec2::ZERO,
            age: 0.0,
            lifetime: SHOCKWAVE_LIFETIME,
        },
        Transform::from_translation(pos.extend(3.0)),
    ));
}

pub fn spawn_reward_label(commands: &mut Commands, pos: Vec2, amount: u32) {
    commands.spawn((
        Effect {
            kind: EffectKind::Reward,
            velocity: Vec2::new(0.0, REWARD_RISE_SPEED),
            age: 0.0,
            lifetime: REWARD_LIFETIME,
        },
        Text2d::new(format!("+{amount}")),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.45, 1.0, 0.55)),
        Transform::from_translation(pos.extend(3.5)),
        Visibility::default(),
    ));
}

// ── Systems ──────────────────────────────────────────────────────────────────

pub fn spawn_combat_effects_system(
    mut commands: Commands,
    mut events: MessageReader<CombatEvent>,
    config: Res<GameConfig>,
    mut flash: ResMut<BorderFlash>,
) {
    let playfield = config.playfield();
    for event in events.read() {
        match *event {
            CombatEvent::Hit { at } => spawn_hit_sparks(&mut commands, to_world(at, playfield)),
            CombatEvent::Shockwave { at } => {
                spawn_shockwave(&mut commands, to_world(at, playfield))
            }
            CombatEvent::Reward { at, amount } => {
                spawn_reward_label(&mut commands, to_world(at, playfield), amount)
            }
            CombatEvent::PlayerHit { .. } | CombatEvent::PlayerDefeated => {
                flash.trigger(Color::srgb(1.0, 0.15, 0.15));
            }
            CombatEvent::Feedback(cue) => flash.trigger(feedback_color(cue)),
            CombatEvent::Shot { .. } => {}
        }
    }
}

pub fn effect_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut flash: ResMut<BorderFlash>,
    mut q_effects: Query<(Entity, &mut Transform, &mut Effect, Option<&mut TextColor>)>,
) {
    let dt = time.delta_secs();

    if flash.color.is_some() {
        flash.age += dt;
        if flash.age >= FLASH_LIFETIME {
            flash.color = None;
        }
    }

    for (entity, mut transform, mut effect, text_color) in q_effects.iter_mut() {
        effect.age += dt;
        if effect.is_expired() {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += (effect.velocity * dt).extend(0.0);
        if let Some(mut color) = text_color {
            color.0.set_alpha(effect.alpha());
        }
    }
}

pub fn draw_effects_system(
    mut gizmos: Gizmos,
    config: Res<GameConfig>,
    flash: Res<BorderFlash>,
    q_effects: Query<(&Transform, &Effect)>,
) {
    for (transform, effect) in q_effects.iter() {
        let pos = transform.translation.truncate();
        let alpha = effect.alpha();
        match effect.kind {
            EffectKind::Spark(color) => {
                gizmos.circle_2d(pos, 1.5, color.with_alpha(alpha));
            }
            EffectKind::Shockwave => {
                let t = effect.age / effect.lifetime;
                gizmos.circle_2d(
                    pos,
                    SHOCKWAVE_RADIUS * t.sqrt(),
                    Color::srgba(0.6, 0.9, 1.0, alpha),
                );
            }
            EffectKind::Reward => {}
        }
    }

    if let Some(color) = flash.color {
        let alpha = 1.0 - flash.age / FLASH_LIFETIME;
        gizmos.rect_2d(
            Isometry2d::IDENTITY,
            config.playfield() - Vec2::splat(4.0),
            color.with_alpha(alpha.clamp(0.0, 1.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;

    #[test]
    fn alpha_fades_to_zero() {
        let mut effect = Effect {
            kind: EffectKind::Shockwave,
            velocity: Vec2::ZERO,
            age: 0.0,
            lifetime: 0.5,
        };
        assert_eq!(effect.alpha(), 1.0);
        effect.age = 0.25;
        assert!((effect.alpha() - 0.25).abs() < 1e-6);
        effect.age = 0.5;
        assert_eq!(effect.alpha(), 0.0);
        assert!(effect.is_expired());
    }

    #[test]
    fn combat_messages_become_effects() {
        let mut world = World::new();
        world.insert_resource(GameConfig::default());
        world.init_resource::<BorderFlash>();
        world.init_resource::<Messages<CombatEvent>>();
        {
            let mut messages = world.resource_mut::<Messages<CombatEvent>>();
            messages.write(CombatEvent::Hit {
                at: Vec2::new(100.0, 100.0),
            });
            messages.write(CombatEvent::Shockwave {
                at: Vec2::new(100.0, 100.0),
            });
            messages.write(CombatEvent::Reward {
                at: Vec2::new(100.0, 100.0),
                amount: 4,
            });
            messages.write(CombatEvent::Feedback(FeedbackCue::Mismatch));
        }

        let mut schedule = Schedule::default();
        schedule.add_systems(spawn_combat_effects_system);
        schedule.run(&mut world);

        let kinds: Vec<EffectKind> = world
            .query::<&Effect>()
            .iter(&world)
            .map(|e| e.kind)
            .collect();
        let sparks = kinds
            .iter()
            .filter(|k| matches!(k, EffectKind::Spark(_)))
            .count();
        assert_eq!(sparks, SPARK_COUNT as usize);
        assert!(kinds.contains(&EffectKind::Shockwave));
        assert!(kinds.contains(&EffectKind::Reward));
        assert!(world.resource::<BorderFlash>().color.is_some());
    }
}
