//! End-to-end combat scenarios driven one fixed tick at a time.

mod common;

use bevy::prelude::*;
use common::Harness;

use typing_shooter::body::Body;
use typing_shooter::combat::{CombatEvent, FeedbackCue, Projectile, TargetCommand, TargetLock};
use typing_shooter::config::{GameConfig, TargetingMode};
use typing_shooter::enemy::{Enemy, EnemyKind, Pushback};
use typing_shooter::player::{PlayerAmmo, PlayerHealth};
use typing_shooter::session::SessionStatus;

fn selection_config(ammo: u32) -> GameConfig {
    GameConfig {
        targeting_mode: TargetingMode::Selection,
        player_start_ammo: ammo,
        rng_seed: Some(1),
        ..GameConfig::default()
    }
}

fn enemy_count(harness: &mut Harness) -> usize {
    harness
        .world
        .query::<&Enemy>()
        .iter(&harness.world)
        .count()
}

#[test]
fn typing_a_full_word_destroys_the_enemy_and_pays_out() {
    let mut h = Harness::new(selection_config(5));
    let meteor = h.parked_meteor("cat", 2, Vec2::new(400.0, 200.0));

    h.type_letters("c");
    h.tick();
    assert_eq!(h.world.resource::<TargetLock>().0, Some(meteor));
    assert!(h.world.get::<Enemy>(meteor).is_some_and(|e| e.selected));
    assert_eq!(h.world.get::<Enemy>(meteor).map(|e| e.word().to_string()), Some("at".into()));

    h.type_letters("at");
    h.tick();
    assert_eq!(h.world.get::<PlayerAmmo>(h.player).map(|a| a.count), Some(2));
    assert!(h.world.get::<Enemy>(meteor).is_some_and(|e| e.is_defeated()));

    h.ticks(59);

    assert!(h.world.get_entity(meteor).is_err());
    assert_eq!(h.world.get::<PlayerAmmo>(h.player).map(|a| a.count), Some(4));
    assert_eq!(h.world.resource::<TargetLock>().0, None);

    let events = h.combat_events();
    let shots = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::Shot { .. }))
        .count();
    let shockwaves = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::Shockwave { .. }))
        .count();
    let rewards: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::Reward { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(shots, 3);
    assert_eq!(shockwaves, 1);
    assert_eq!(rewards, vec![2]);
    assert_eq!(h.world.query::<&Projectile>().iter(&h.world).count(), 0);
}

#[test]
fn hits_push_the_enemy_back() {
    let mut h = Harness::new(selection_config(5));
    let meteor = h.parked_meteor("dune", 0, Vec2::new(400.0, 200.0));
    if let Some(mut pushback) = h.world.get_mut::<Pushback>(meteor) {
        *pushback = Pushback::new(0.0);
    }

    h.type_letters("d");
    h.ticks(40);

    let events = h.combat_events();
    assert!(events.iter().any(|e| matches!(e, CombatEvent::Hit { .. })));
    assert!(h.world.get::<Body>(meteor).is_some_and(|b| b.center.y < 200.0));
    assert_eq!(h.world.get::<Enemy>(meteor).map(|e| e.hit_count), Some(3));
}

#[test]
fn selection_lock_rejects_other_words() {
    let mut h = Harness::new(selection_config(10));
    let near = h.parked_meteor("sun", 0, Vec2::new(400.0, 300.0));
    let far = h.parked_meteor("moon", 0, Vec2::new(400.0, 50.0));

    h.type_letters("sm");
    h.tick();

    assert_eq!(h.world.resource::<TargetLock>().0, Some(near));
    assert_eq!(h.world.get::<Enemy>(far).map(|e| e.word().to_string()), Some("moon".into()));
    assert!(h
        .combat_events()
        .contains(&CombatEvent::Feedback(FeedbackCue::Mismatch)));

    h.command(TargetCommand::ClearLock);
    h.type_letters("m");
    h.tick();
    assert_eq!(h.world.resource::<TargetLock>().0, Some(far));
    assert!(h.world.get::<Enemy>(near).is_some_and(|e| !e.selected));
}

#[test]
fn empty_magazine_fires_nothing() {
    let mut h = Harness::new(selection_config(0));
    let meteor = h.parked_meteor("cat", 0, Vec2::new(400.0, 200.0));

    h.type_letters("c");
    h.tick();

    assert_eq!(h.world.get::<Enemy>(meteor).map(|e| e.word().to_string()), Some("cat".into()));
    assert!(h
        .combat_events()
        .contains(&CombatEvent::Feedback(FeedbackCue::OutOfAmmo)));
    assert_eq!(h.world.query::<&Projectile>().iter(&h.world).count(), 0);
}

#[test]
fn projectile_without_a_target_is_discarded() {
    let mut h = Harness::new(selection_config(5));
    let meteor = h.parked_meteor("ox", 0, Vec2::new(400.0, 100.0));

    h.type_letters("o");
    h.tick();
    assert_eq!(h.world.query::<&Projectile>().iter(&h.world).count(), 1);

    h.world.despawn(meteor);
    h.tick();
    assert_eq!(h.world.query::<&Projectile>().iter(&h.world).count(), 0);
}

#[test]
fn colliding_hazard_damages_the_ship_and_clears_the_lock() {
    let mut h = Harness::new(selection_config(5));
    let ship_center = h.world.get::<Body>(h.player).map(|b| b.center).unwrap();
    let meteor = h.parked_meteor("rock", 0, ship_center - Vec2::new(0.0, 60.0));

    h.type_letters("r");
    h.tick();
    assert_eq!(h.world.resource::<TargetLock>().0, Some(meteor));

    if let Some(mut body) = h.world.get_mut::<Body>(meteor) {
        body.center = ship_center;
    }
    h.tick();

    assert!(h.world.get_entity(meteor).is_err());
    assert_eq!(h.world.resource::<TargetLock>().0, None);
    let health = h.world.get::<PlayerHealth>(h.player).copied().unwrap();
    assert_eq!(health.hp, health.max_hp - 1);
    assert!(h
        .combat_events()
        .iter()
        .any(|e| matches!(e, CombatEvent::PlayerHit { .. })));
}

#[test]
fn final_collision_ends_the_game_once() {
    let mut h = Harness::new(GameConfig {
        player_start_health: 1,
        ..GameConfig::default()
    });
    let ship_center = h.world.get::<Body>(h.player).map(|b| b.center).unwrap();
    h.parked_meteor("a", 0, ship_center);
    h.parked_meteor("b", 0, ship_center);
    h.tick();

    assert!(h.world.resource::<SessionStatus>().game_over);
    assert_eq!(enemy_count(&mut h), 0);
    let defeats = h
        .combat_events()
        .into_iter()
        .filter(|e| *e == CombatEvent::PlayerDefeated)
        .count();
    assert_eq!(defeats, 1);

    let meteor = h.parked_meteor("cat", 0, Vec2::new(400.0, 100.0));
    h.type_letters("c");
    h.tick();
    assert_eq!(h.world.get::<Enemy>(meteor).map(|e| e.word().to_string()), Some("cat".into()));
}

#[test]
fn direct_mode_fires_at_the_oldest_match() {
    let mut h = Harness::new(GameConfig::default());
    let first = h.parked_meteor("tin", 0, Vec2::new(100.0, 50.0));
    let second = h.parked_meteor("top", 0, Vec2::new(400.0, 300.0));

    h.type_letters("tq");
    h.tick();

    assert_eq!(h.world.get::<Enemy>(first).map(|e| e.hit_count), Some(2));
    assert_eq!(h.world.get::<Enemy>(second).map(|e| e.hit_count), Some(3));
    assert_eq!(h.world.resource::<TargetLock>().0, None);
    assert!(h
        .combat_events()
        .contains(&CombatEvent::Feedback(FeedbackCue::NoMatch)));
}

#[test]
fn dividers_bank_a_checkpoint_as_they_pass() {
    use typing_shooter::campaign::{CampaignScript, CheckpointStore, Checkpoints};

    let script = CampaignScript::parse(
        r#"[{"delay": 0, "action": {"checkpoint": {"id": 2, "title": "Belt"}}}]"#,
    )
    .unwrap();
    let mut h = Harness::with_script(GameConfig::default(), script);
    h.tick();
    let kinds: Vec<EnemyKind> = h
        .world
        .query::<&Enemy>()
        .iter(&h.world)
        .map(|e| e.kind)
        .collect();
    assert_eq!(kinds, vec![EnemyKind::CheckpointDivider]);
    assert!(h.world.resource::<Checkpoints>().0.load(2).is_none());

    h.ticks(299);

    let saved = h.world.resource::<Checkpoints>().0.load(2);
    let record = saved.expect("checkpoint 2 should be saved");
    assert_eq!(record.title, "Belt");
    assert_eq!(record.states.ammo, GameConfig::default().player_start_ammo);
    assert_eq!(enemy_count(&mut h), 0, "divider is pruned once past the bottom edge");
}
