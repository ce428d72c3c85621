//! Backing stores for player records.
//!
//! A store is read in full and written in full; the registry serialises the
//! read-modify-write cycle around it.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use super::{Player, StorageError};

/// Whole-collection persistence for player records.
pub trait PlayerStorage: std::fmt::Debug + Send + Sync {
    /// Loads every stored player, in insertion order.
    fn load(&self) -> Result<Vec<Player>, StorageError>;

    /// Replaces the stored collection.
    fn save(&self, players: &[Player]) -> Result<(), StorageError>;
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    players: Mutex<Vec<Player>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.lock().clone())
    }

    fn save(&self, players: &[Player]) -> Result<(), StorageError> {
        *self.players.lock() = players.to_vec();
        Ok(())
    }
}

/// JSON array of player records in a single file.
///
/// Saves go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Uses the file at `path`; it is created on first save.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        info!("Using JSON file player storage");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "players.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }
}

impl PlayerStorage for JsonFileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Player>, StorageError> {
        if !self.path.exists() {
            debug!("Player file missing, starting empty");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let players: Vec<Player> = serde_json::from_str(&content)?;
        debug!(count = players.len(), "Players loaded");
        Ok(players)
    }

    #[instrument(skip(self, players), fields(path = %self.path.display(), count = players.len()))]
    fn save(&self, players: &[Player]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(players)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        debug!("Players saved");
        Ok(())
    }
}
