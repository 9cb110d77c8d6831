//! Rendering plugin: camera, HUD, enemy word labels and the gizmo pass.
//!
//! Everything here reads simulation state and never writes it. The systems
//! run in `Update` every frame, so the paused and game-over screens keep
//! drawing the frozen playfield.

use bevy::prelude::*;

use crate::body::{to_world, Body};
use crate::campaign::DialogueMessage;
use crate::combat::{Projectile, SessionStats};
use crate::config::GameConfig;
use crate::enemy::{Behavior, Enemy, EnemyKind};
use crate::player::{Player, PlayerAmmo, PlayerGun, PlayerHealth, Shield};
use crate::session::{GameState, SessionStatus};

const LABEL_GAP: f32 = 12.0;

/// Marker for the status line in the top-left corner.
#[derive(Component)]
pub struct HudText;

/// Marker for the dialogue line at the bottom of the screen.
#[derive(Component)]
pub struct DialogueText;

/// Child of an enemy that shows its remaining word.
#[derive(Component)]
pub struct WordLabel;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_hud))
            .add_systems(
                Update,
                (
                    sync_transforms_system,
                    attach_word_labels_system,
                    update_word_labels_system,
                    hud_text_system,
                    dialogue_text_system,
                    draw_actors_system,
                ),
            );
    }
}

// ── Startup ──────────────────────────────────────────────────────────────────

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                HudText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
            ));
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                DialogueText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 1.0, 1.0)),
            ));
        });
}

// ── Update: transforms and labels ────────────────────────────────────────────

#[allow(clippy::type_complexity)]
pub fn sync_transforms_system(
    config: Res<GameConfig>,
    mut q_bodies: Query<(&Body, &mut Transform), (Changed<Body>, Without<Projectile>)>,
    mut q_projectiles: Query<(&Projectile, &mut Transform), Without<Body>>,
) {
    let playfield = config.playfield();
    for (body, mut transform) in q_bodies.iter_mut() {
        let z = transform.translation.z;
        transform.translation = to_world(body.center, playfield).extend(z);
    }
    for (projectile, mut transform) in q_projectiles.iter_mut() {
        let z = transform.translation.z;
        transform.translation = to_world(projectile.position, playfield).extend(z);
        transform.rotation = Quat::from_rotation_z(projectile.heading.x.atan2(-projectile.heading.y));
    }
}

/// Give every new enemy with a word a text label above its body.
pub fn attach_word_labels_system(
    mut commands: Commands,
    q_new: Query<(Entity, &Enemy, &Body), Added<Enemy>>,
) {
    for (entity, enemy, body) in q_new.iter() {
        if enemy.word().is_empty() {
            continue;
        }
        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                WordLabel,
                Text2d::new(enemy.word()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, body.size.y * 0.5 + LABEL_GAP, 1.0),
            ));
        });
    }
}

/// Keep labels in step with typed letters and the selection lock.
pub fn update_word_labels_system(
    q_enemies: Query<(&Enemy, &Children), Changed<Enemy>>,
    mut q_labels: Query<(&mut Text2d, &mut TextColor), With<WordLabel>>,
) {
    for (enemy, children) in q_enemies.iter() {
        for child in children.iter() {
            if let Ok((mut text, mut color)) = q_labels.get_mut(child) {
                text.0 = enemy.word().to_string();
                color.0 = if enemy.selected {
                    Color::srgb(1.0, 0.85, 0.2)
                } else {
                    Color::WHITE
                };
            }
        }
    }
}

// ── Update: HUD ──────────────────────────────────────────────────────────────

pub fn hud_text_system(
    config: Res<GameConfig>,
    state: Res<State<GameState>>,
    status: Res<SessionStatus>,
    stats: Res<SessionStats>,
    q_player: Query<(&PlayerHealth, &PlayerAmmo), With<Player>>,
    mut q_text: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = q_text.single_mut() else {
        return;
    };
    let (hp, max_hp, ammo) = q_player
        .single()
        .map(|(health, ammo)| (health.hp, health.max_hp, ammo.count))
        .unwrap_or_default();

    let mut line = format!(
        "HP {hp}/{max_hp}  AMMO {ammo}  DESTROYED {}  {}",
        stats.enemies_defeated,
        config.targeting_mode.label()
    );
    if status.game_over {
        line.push_str("\nGAME OVER - press Enter to restart");
    } else if *state.get() == GameState::Paused {
        line.push_str("\nPAUSED - press Escape to resume");
    }
    if text.0 != line {
        text.0 = line;
    }
}

pub fn dialogue_text_system(
    mut dialogue: MessageReader<DialogueMessage>,
    mut q_text: Query<&mut Text, With<DialogueText>>,
) {
    let Some(last) = dialogue.read().last() else {
        return;
    };
    for mut text in q_text.iter_mut() {
        text.0 = format!("{}: {}", last.sender, last.text);
    }
}

// ── Update: gizmos ───────────────────────────────────────────────────────────

fn kind_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Meteor => Color::srgb(0.65, 0.55, 0.45),
        EnemyKind::Gunship => Color::srgb(0.9, 0.3, 0.3),
        EnemyKind::Battleship => Color::srgb(0.7, 0.2, 0.6),
        EnemyKind::ProximityMine => Color::srgb(1.0, 0.6, 0.1),
        EnemyKind::SuicideDrone => Color::srgb(1.0, 0.2, 0.5),
        EnemyKind::Shell => Color::srgb(1.0, 1.0, 0.6),
        EnemyKind::CheckpointDivider => Color::srgb(0.3, 1.0, 0.5),
    }
}

#[allow(clippy::type_complexity)]
pub fn draw_actors_system(
    mut gizmos: Gizmos,
    config: Res<GameConfig>,
    q_player: Query<(&Body, &PlayerGun, &Shield), With<Player>>,
    q_enemies: Query<(&Body, &Enemy, &Behavior)>,
    q_projectiles: Query<&Projectile>,
) {
    let playfield = config.playfield();
    let world = |p: Vec2| to_world(p, playfield);
    let player_center = q_player.single().ok().map(|(body, _, _)| body.center);

    for (body, enemy, behavior) in q_enemies.iter() {
        let rect = body.rect();
        let color = kind_color(enemy.kind);
        let center = world(rect.center());
        match behavior {
            Behavior::Meteor(state) => {
                let rotation = Rot2::degrees(-state.spin);
                gizmos.rect_2d(Isometry2d::new(center, rotation), rect.size(), color);
            }
            Behavior::ProximityMine(state) => {
                let radius = rect.width() * 0.5 + state.pulse.phase;
                gizmos.circle_2d(center, radius, color);
                if let (true, Some(target)) = (state.armed, player_center) {
                    gizmos.circle_2d(
                        center,
                        state.activation_radius,
                        color.with_alpha(0.15),
                    );
                    gizmos.line_2d(center, world(target), color.with_alpha(0.4));
                }
            }
            Behavior::SuicideDrone(state) => {
                let rotation = Rot2::radians(-state.heading);
                let half = rect.size() * 0.5 + Vec2::splat(state.pulse.phase);
                gizmos.rect_2d(Isometry2d::new(center, rotation), half * 2.0, color);
            }
            Behavior::CheckpointDivider(_) => {
                gizmos.line_2d(
                    world(Vec2::new(rect.min.x, body.center.y)),
                    world(Vec2::new(rect.max.x, body.center.y)),
                    color,
                );
            }
            _ => {
                gizmos.rect_2d(center, rect.size(), color);
            }
        }
        if enemy.selected {
            gizmos.rect_2d(
                center,
                rect.size() + Vec2::splat(8.0),
                Color::srgb(1.0, 0.85, 0.2),
            );
        }
    }

    for projectile in q_projectiles.iter() {
        let tail = projectile.position - projectile.heading * projectile.body().size.x;
        gizmos.line_2d(
            world(tail),
            world(projectile.position),
            Color::srgb(0.2, 0.8, 1.0),
        );
    }

    if let Ok((body, gun, shield)) = q_player.single() {
        let center = world(body.center);
        gizmos.rect_2d(center, body.size, Color::srgb(0.85, 0.85, 0.9));
        gizmos.line_2d(
            world(PlayerGun::mount(body)),
            world(gun.muzzle(body)),
            Color::srgb(0.85, 0.85, 0.9),
        );
        if shield.active {
            gizmos.circle_2d(center, body.size.x * 0.8, Color::srgba(0.3, 0.6, 1.0, 0.6));
        }
    }
}
