//! Delay-gated campaign event dispatch.
//!
//! The sequencer owns the loaded script and a cursor. Each poll dispatches at
//! most one event: the one at the cursor, once its delay has elapsed since the
//! previous dispatch. Several overdue events therefore drain one per tick.

use bevy::prelude::*;
use std::collections::HashMap;

use super::script::{CampaignAction, CampaignEvent, CampaignScript};
use crate::error::{GameError, GameResult};

#[derive(Resource, Debug, Clone, Default)]
pub struct CampaignSequencer {
    events: Vec<CampaignEvent>,
    checkpoints: HashMap<u32, usize>,
    next_index: usize,
    last_dispatch_ms: u64,
}

impl CampaignSequencer {
    /// Start at the first event; delays count from `now_ms`.
    pub fn new(script: CampaignScript, now_ms: u64) -> Self {
        let checkpoints = script.checkpoint_index();
        Self {
            events: script.events,
            checkpoints,
            next_index: 0,
            last_dispatch_ms: now_ms,
        }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.next_index >= self.events.len()
    }

    pub fn checkpoint_position(&self, id: u32) -> Option<usize> {
        self.checkpoints.get(&id).copied()
    }

    /// Title and description of checkpoint `id`, as written in the script.
    pub fn checkpoint_details(&self, id: u32) -> Option<(&str, &str)> {
        let position = self.checkpoint_position(id)?;
        self.events[position].actions.iter().find_map(|action| match action {
            CampaignAction::Checkpoint {
                id: found,
                title,
                description,
            } if *found == id => Some((title.as_str(), description.as_str())),
            _ => None,
        })
    }

    /// Jump the cursor to checkpoint `id`, skipping every earlier event.
    pub fn resume_from(&mut self, id: u32, now_ms: u64) -> GameResult<usize> {
        let position = self
            .checkpoint_position(id)
            .ok_or(GameError::CheckpointNotFound { id })?;
        self.next_index = position;
        self.last_dispatch_ms = now_ms;
        Ok(position)
    }

    /// Rewind to the first event.
    pub fn restart(&mut self, now_ms: u64) {
        self.next_index = 0;
        self.last_dispatch_ms = now_ms;
    }

    /// Dispatch the next event if its delay has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<Vec<CampaignAction>> {
        let event = self.events.get(self.next_index)?;
        if now_ms.saturating_sub(self.last_dispatch_ms) < event.delay_ms {
            return None;
        }
        let actions = event.actions.clone();
        self.next_index += 1;
        self.last_dispatch_ms = now_ms;
        Some(actions)
    }
}
