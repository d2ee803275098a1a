//! Single-slot session persistence
//!
//! The store holds at most one session. A persisted slot that fails to parse
//! is treated as "no session present" rather than an error; the engine then
//! starts unselected instead of crashing on a corrupt save.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::types::Session;
use crate::error::{EngineError, EngineResult};

/// Single-slot session storage trait
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the slot; `None` when absent or unparseable
    async fn load(&self) -> EngineResult<Option<Session>>;

    /// Save the slot
    async fn save(&self, session: &Session) -> EngineResult<()>;

    /// Clear the slot
    async fn clear(&self) -> EngineResult<()>;
}

/// File-backed store: one fixed JSON file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default path (`~/.config/plotweave/adventure_save.json`)
    pub fn default_path() -> EngineResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::config("Could not determine home directory"))?;
        let path = home
            .join(".config")
            .join("plotweave")
            .join("adventure_save.json");
        Ok(Self::new(path))
    }

    async fn ensure_parent_dir(&self) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    EngineError::store(format!("Failed to create save directory: {e}"))
                })?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> EngineResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .await
            .map_err(|e| EngineError::store(format!("Failed to read save file: {e}")))?;

        match serde_json::from_str(&json) {
            Ok(session) => {
                debug!(path = %self.path.display(), "loaded session slot");
                Ok(Some(session))
            }
            Err(e) => {
                // A corrupt save must not take the whole feature down
                warn!(path = %self.path.display(), error = %e, "save slot is unparseable, treating as empty");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> EngineResult<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| EngineError::store(format!("Failed to serialize session: {e}")))?;

        fs::write(&self.path, json)
            .await
            .map_err(|e| EngineError::store(format!("Failed to write save file: {e}")))?;

        debug!(path = %self.path.display(), "saved session slot");
        Ok(())
    }

    async fn clear(&self) -> EngineResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .map_err(|e| EngineError::store(format!("Failed to delete save file: {e}")))?;
            info!(path = %self.path.display(), "cleared session slot");
        }
        Ok(())
    }
}

/// In-memory store (for testing or throwaway sessions)
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> EngineResult<Option<Session>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: &Session) -> EngineResult<()> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> EngineResult<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}
