//! Campaign script: the JSON event list that drives a campaign.
//!
//! ```json
//! {"events": [
//!   {"delay": 0,    "action": {"checkpoint": {"id": 1, "title": "Outer Belt"}}},
//!   {"delay": 2000, "action": {"spawn": {"enemy_type": "enemy_meteor"}}},
//!   {"delay": 500,  "action": [{"trigger": {"meteor_shower": true}}, {"music": "belt"}]}
//! ]}
//! ```
//!
//! Parsing is tolerant below the root: an action this build does not know
//! becomes [`CampaignAction::Unknown`] and a malformed event keeps its slot
//! with no actions, so checkpoint positions never shift.

use bevy::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{GameError, GameResult};

/// Campaign shipped with the binary, used when the configured file is unusable.
pub const DEFAULT_SCRIPT: &str = include_str!("../../assets/campaign/game_event.json");

/// Enemy types a script can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyType {
    Meteor,
    Gunship,
    Battleship,
    ProximityMine,
    SuicideDrone,
}

impl EnemyType {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "enemy_meteor" => Some(Self::Meteor),
            "enemy_gunship" => Some(Self::Gunship),
            "enemy_battleship" => Some(Self::Battleship),
            "enemy_proximity_mine" => Some(Self::ProximityMine),
            "enemy_suicide_drone" => Some(Self::SuicideDrone),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CampaignAction {
    Spawn(EnemyType),
    Message {
        sender: String,
        text: String,
    },
    Trigger {
        meteor_shower: bool,
    },
    Checkpoint {
        id: u32,
        title: String,
        description: String,
    },
    Music(String),
    Cutscene(String),
    /// Anything the parser did not recognise; dispatching it does nothing.
    Unknown(String),
}

/// One scripted step: wait `delay_ms` after the previous dispatch, then run `actions`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CampaignEvent {
    pub delay_ms: u64,
    pub actions: Vec<CampaignAction>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CampaignScript {
    pub events: Vec<CampaignEvent>,
}

impl CampaignScript {
    pub fn parse(json: &str) -> GameResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|err| GameError::ScriptFormat {
            reason: err.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Accepts `{"events": [...]}` or a bare event array.
    pub fn from_value(value: &Value) -> GameResult<Self> {
        let events = match value {
            Value::Object(root) => root.get("events").and_then(Value::as_array).ok_or_else(|| {
                GameError::ScriptFormat {
                    reason: "root object has no \"events\" array".to_string(),
                }
            })?,
            Value::Array(events) => events,
            _ => {
                return Err(GameError::ScriptFormat {
                    reason: "root must be an object or an array".to_string(),
                })
            }
        };

        Ok(Self {
            events: events.iter().map(parse_event).collect(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Load `path`, falling back to the built-in campaign.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(script) => {
                info!(
                    "Loaded campaign {} ({} events)",
                    path.as_ref().display(),
                    script.events.len()
                );
                script
            }
            Err(err) => {
                warn!("{err}; using built-in campaign");
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        Self::parse(DEFAULT_SCRIPT).unwrap_or_else(|err| {
            error!("Built-in campaign is invalid: {err}");
            Self::default()
        })
    }

    /// Event position of every checkpoint id. A repeated id maps to its last occurrence.
    pub fn checkpoint_index(&self) -> HashMap<u32, usize> {
        let mut index = HashMap::new();
        for (position, event) in self.events.iter().enumerate() {
            for action in &event.actions {
                if let CampaignAction::Checkpoint { id, .. } = action {
                    index.insert(*id, position);
                }
            }
        }
        index
    }
}

fn parse_event(value: &Value) -> CampaignEvent {
    let Some(event) = value.as_object() else {
        return CampaignEvent::default();
    };

    let delay_ms = match event.get("delay") {
        Some(delay) => delay
            .as_u64()
            .or_else(|| delay.as_f64().filter(|d| *d >= 0.0).map(|d| d.round() as u64))
            .unwrap_or(0),
        None => 0,
    };

    let actions = match event.get("action") {
        Some(Value::Object(map)) => parse_action_map(map),
        Some(Value::Array(list)) => list
            .iter()
            .flat_map(|entry| match entry.as_object() {
                Some(map) => parse_action_map(map),
                None => vec![CampaignAction::Unknown(entry.to_string())],
            })
            .collect(),
        Some(other) => vec![CampaignAction::Unknown(other.to_string())],
        None => Vec::new(),
    };

    CampaignEvent { delay_ms, actions }
}

fn parse_action_map(map: &Map<String, Value>) -> Vec<CampaignAction> {
    map.iter().map(|(key, value)| parse_action(key, value)).collect()
}

fn parse_action(key: &str, value: &Value) -> CampaignAction {
    let text = |field: &str| -> Option<String> {
        value.get(field).and_then(Value::as_str).map(str::to_string)
    };

    match key {
        "spawn" => {
            let enemy_type = text("enemy_type").unwrap_or_default();
            match EnemyType::from_key(&enemy_type) {
                Some(kind) => CampaignAction::Spawn(kind),
                None => CampaignAction::Unknown(format!("spawn:{enemy_type}")),
            }
        }
        "message" => CampaignAction::Message {
            sender: text("sender").unwrap_or_else(|| "Unknown".to_string()),
            text: text("text_message")
                .or_else(|| text("text"))
                .unwrap_or_default(),
        },
        "trigger" => match value.get("meteor_shower").and_then(Value::as_bool) {
            Some(meteor_shower) => CampaignAction::Trigger { meteor_shower },
            None => CampaignAction::Unknown(format!("trigger:{value}")),
        },
        "checkpoint" => match value
            .get("id")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
        {
            Some(id) => CampaignAction::Checkpoint {
                id,
                title: text("title").unwrap_or_default(),
                description: text("description").unwrap_or_default(),
            },
            None => CampaignAction::Unknown(format!("checkpoint:{value}")),
        },
        "music" => CampaignAction::Music(label_of(value)),
        "cutscene" | "cutscenes" => CampaignAction::Cutscene(label_of(value)),
        other => CampaignAction::Unknown(other.to_string()),
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
