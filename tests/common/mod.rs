//! Shared headless harness: a bare [`World`] holding every simulation
//! resource, driven one fixed tick at a time through a plain [`Schedule`].

#![allow(dead_code)]

use bevy::ecs::message::Messages;
use bevy::ecs::world::CommandQueue;
use bevy::prelude::*;

use typing_shooter::body::{Body, SpawnCounter};
use typing_shooter::campaign::{
    CampaignScript, CampaignSequencer, CheckpointReached, Checkpoints, DialogueMessage,
    MemoryCheckpointStore, MeteorShower,
};
use typing_shooter::combat::{CombatEvent, SessionStats, TargetCommand, TargetLock};
use typing_shooter::config::GameConfig;
use typing_shooter::enemy::{Behavior, Enemy, EnemyKind, MeteorState, Pushback};
use typing_shooter::player::{spawn_player, PlayerIntent};
use typing_shooter::session::{GameRng, GameState, SessionStatus, StartCheckpoint};
use typing_shooter::simulation::{configure_tick_schedule, SimClock};
use typing_shooter::words::WordBank;

pub struct Harness {
    pub world: World,
    pub schedule: Schedule,
    pub player: Entity,
}

impl Harness {
    /// Empty campaign, seeded RNG, in-memory checkpoint store.
    pub fn new(config: GameConfig) -> Self {
        Self::with_script(config, CampaignScript::default())
    }

    pub fn with_script(config: GameConfig, script: CampaignScript) -> Self {
        let mut world = World::new();
        world.insert_resource(State::new(GameState::Playing));
        world.init_resource::<NextState<GameState>>();
        world.insert_resource(SimClock::default());
        world.insert_resource(SpawnCounter::default());
        world.insert_resource(PlayerIntent::default());
        world.insert_resource(GameRng::seeded(7));
        world.insert_resource(WordBank::from_words(["cat", "dog", "emu"]));
        world.insert_resource(CampaignSequencer::new(script, 0));
        world.insert_resource(MeteorShower::new(config.shower_interval()));
        world.insert_resource(Checkpoints(Box::new(MemoryCheckpointStore::default())));
        world.insert_resource(StartCheckpoint::default());
        world.insert_resource(TargetLock::default());
        world.insert_resource(SessionStats::default());
        world.insert_resource(SessionStatus::default());
        world.init_resource::<Messages<TargetCommand>>();
        world.init_resource::<Messages<CombatEvent>>();
        world.init_resource::<Messages<CheckpointReached>>();
        world.init_resource::<Messages<DialogueMessage>>();

        let mut queue = CommandQueue::default();
        let player = {
            let mut commands = Commands::new(&mut queue, &world);
            spawn_player(&mut commands, &config, None)
        };
        queue.apply(&mut world);
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        configure_tick_schedule(&mut schedule);

        Self {
            world,
            schedule,
            player,
        }
    }

    pub fn tick(&mut self) {
        self.schedule.run(&mut self.world);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn type_letters(&mut self, letters: &str) {
        let mut messages = self.world.resource_mut::<Messages<TargetCommand>>();
        for letter in letters.chars() {
            messages.write(TargetCommand::Letter(letter));
        }
    }

    pub fn command(&mut self, command: TargetCommand) {
        self.world
            .resource_mut::<Messages<TargetCommand>>()
            .write(command);
    }

    /// Spawn a meteor that stays put unless pushed.
    pub fn parked_meteor(&mut self, word: &str, drop: u32, center: Vec2) -> Entity {
        let order = self.world.resource_mut::<SpawnCounter>().next_order();
        self.world
            .spawn((
                Enemy::new(EnemyKind::Meteor, word, drop),
                Body::new(center, Vec2::splat(40.0)),
                Behavior::Meteor(MeteorState::new(0.0, 0.0, 1.0)),
                Pushback::new(100.0),
                order,
            ))
            .id()
    }

    pub fn combat_events(&mut self) -> Vec<CombatEvent> {
        self.world
            .resource_mut::<Messages<CombatEvent>>()
            .drain()
            .collect()
    }
}
