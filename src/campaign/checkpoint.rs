use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

const STORE_VERSION: u32 = 1;

/// Player state banked when a checkpoint divider reaches the ship.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub position: [f32; 2],
    pub health: u32,
    pub ammo: u32,
    pub score: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckpointRecord {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub states: PlayerSnapshot,
    #[serde(default)]
    pub timestamp: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct CheckpointFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    checkpoints: Vec<CheckpointRecord>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

/// Persistent map from checkpoint id to the last record saved for it.
pub trait CheckpointStore: Send + Sync {
    /// Insert or replace the record with the same id, stamping the save time.
    fn save(&mut self, record: CheckpointRecord) -> GameResult<()>;

    fn load_all(&self) -> Vec<CheckpointRecord>;

    fn load(&self, id: u32) -> Option<CheckpointRecord> {
        self.load_all().into_iter().find(|record| record.id == id)
    }

    fn list_unlocked_ids(&self) -> BTreeSet<u32> {
        self.load_all().iter().map(|record| record.id).collect()
    }

    /// Drop every record except `keep`.
    fn delete_all_except(&mut self, keep: u32) -> GameResult<()>;
}

/// Active checkpoint store for the session.
#[derive(Resource)]
pub struct Checkpoints(pub Box<dyn CheckpointStore>);

impl Default for Checkpoints {
    fn default() -> Self {
        Self(Box::new(MemoryCheckpointStore::default()))
    }
}

fn upsert(records: &mut Vec<CheckpointRecord>, mut record: CheckpointRecord) {
    record.timestamp = current_unix_timestamp();
    match records.iter_mut().find(|existing| existing.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    records: Vec<CheckpointRecord>,
}

impl CheckpointStore for MemoryCheckpointStore {
    fn save(&mut self, record: CheckpointRecord) -> GameResult<()> {
        upsert(&mut self.records, record);
        Ok(())
    }

    fn load_all(&self) -> Vec<CheckpointRecord> {
        self.records.clone()
    }

    fn delete_all_except(&mut self, keep: u32) -> GameResult<()> {
        self.records.retain(|record| record.id == keep);
        Ok(())
    }
}

// ── TOML file store ──────────────────────────────────────────────────────────

/// Checkpoints kept in a TOML file, read and rewritten on every operation.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> GameResult<CheckpointFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CheckpointFile::default())
            }
            Err(source) => {
                return Err(GameError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let file: CheckpointFile =
            toml::from_str(&contents).map_err(|err| GameError::StoreFormat {
                reason: err.to_string(),
            })?;
        if file.version != STORE_VERSION {
            return Err(GameError::StoreFormat {
                reason: format!(
                    "unsupported store version {} (expected {})",
                    file.version, STORE_VERSION
                ),
            });
        }
        Ok(file)
    }

    fn records_or_empty(&self) -> Vec<CheckpointRecord> {
        match self.read_file() {
            Ok(file) => file.checkpoints,
            Err(err) => {
                warn!("{err}; treating checkpoint store as empty");
                Vec::new()
            }
        }
    }

    fn write_file(&self, checkpoints: Vec<CheckpointRecord>) -> GameResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| GameError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let file = CheckpointFile {
            version: STORE_VERSION,
            checkpoints,
        };
        let serialized = toml::to_string_pretty(&file).map_err(|err| GameError::StoreFormat {
            reason: err.to_string(),
        })?;
        fs::write(&self.path, serialized).map_err(|source| GameError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn save(&mut self, record: CheckpointRecord) -> GameResult<()> {
        let mut records = self.records_or_empty();
        upsert(&mut records, record);
        self.write_file(records)
    }

    fn load_all(&self) -> Vec<CheckpointRecord> {
        self.records_or_empty()
    }

    fn delete_all_except(&mut self, keep: u32) -> GameResult<()> {
        let mut records = self.records_or_empty();
        records.retain(|record| record.id == keep);
        self.write_file(records)
    }
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
