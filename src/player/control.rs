//! Keyboard mapping.
//!
//! Two systems run every frame in `Update`, paused or not:
//!
//! 1. [`keyboard_to_intent_system`]: held keys to [`PlayerIntent`]
//!    (Left/Right arrows move, Space raises the shield).
//! 2. [`keyboard_command_system`]: discrete key presses. Letters and Tab become
//!    [`TargetCommand`]s for the fixed-tick resolver; Escape toggles pause;
//!    Enter restarts after game over; F9 resets checkpoint progress.
//!
//! Letters are only forwarded while playing, so typing during the pause screen
//! never fires once the game resumes.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use super::state::PlayerIntent;
use crate::combat::TargetCommand;
use crate::session::{GameState, ResetProgressRequest, RestartRequest, SessionStatus};

/// Rebuild the movement intent from currently held keys.
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<PlayerIntent>,
) {
    let mut direction = 0.0;
    if keys.pressed(KeyCode::ArrowLeft) {
        direction -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        direction += 1.0;
    }
    intent.direction = direction;
    intent.shield = keys.pressed(KeyCode::Space);
}

/// Route key presses to targeting commands and session requests.
pub fn keyboard_command_system(
    mut keyboard: MessageReader<KeyboardInput>,
    state: Res<State<GameState>>,
    status: Res<SessionStatus>,
    mut next_state: ResMut<NextState<GameState>>,
    mut commands_out: MessageWriter<TargetCommand>,
    mut restart: MessageWriter<RestartRequest>,
    mut reset: MessageWriter<ResetProgressRequest>,
) {
    let playing = *state.get() == GameState::Playing;
    for ev in keyboard.read() {
        if ev.state != ButtonState::Pressed {
            continue;
        }
        match &ev.logical_key {
            Key::Escape => {
                next_state.set(match state.get() {
                    GameState::Playing => GameState::Paused,
                    GameState::Paused => GameState::Playing,
                });
            }
            Key::Tab if playing => {
                commands_out.write(TargetCommand::ClearLock);
            }
            Key::Enter if status.game_over => {
                restart.write(RestartRequest);
            }
            Key::F9 => {
                reset.write(ResetProgressRequest);
            }
            Key::Character(text) if playing && !ev.repeat => {
                for letter in text.chars().filter(char::is_ascii_alphabetic) {
                    commands_out.write(TargetCommand::Letter(letter.to_ascii_lowercase()));
                }
            }
            _ => {}
        }
    }
}

/// Keyboard systems. Runs every frame, paused or not.
pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (keyboard_to_intent_system, keyboard_command_system),
        );
    }
}
