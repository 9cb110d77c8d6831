//! Typing Shooter core library
//!
//! A fixed-tick typing-combat arcade game: enemies fall toward the player's
//! ship carrying words, and typing a word's letters fires homing projectiles
//! at it. A JSON campaign script drives spawns, dialogue and checkpoints.

pub mod body;
pub mod campaign;
pub mod combat;
pub mod config;
pub mod constants;
pub mod effects;
pub mod enemy;
pub mod error;
pub mod player;
pub mod rendering;
pub mod session;
pub mod simulation;
pub mod words;
