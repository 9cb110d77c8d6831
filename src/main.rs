use bevy::prelude::*;
use bevy::window::WindowResolution;

use typing_shooter::config::GameConfig;
use typing_shooter::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use typing_shooter::effects::EffectsPlugin;
use typing_shooter::player::ControlsPlugin;
use typing_shooter::rendering::RenderingPlugin;
use typing_shooter::simulation::SimulationPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Typing Shooter".into(),
                resolution: WindowResolution::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Compiled defaults; load_game_config overwrites them from
        // assets/game.toml in the Startup schedule.
        .insert_resource(GameConfig::default())
        .add_plugins((SimulationPlugin, ControlsPlugin, RenderingPlugin, EffectsPlugin))
        .run();
}
