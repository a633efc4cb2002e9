// src/core/state_store.rs
//! Persisted client state: session token, cached user, LLM settings.
//!
//! Handed to the components that need it instead of living in a global.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::llm::LlmConfig;
use crate::types::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
}

pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<StoredState>;
    fn save(&self, state: &StoredState) -> Result<()>;
    fn clear(&self) -> Result<()>;

    fn token(&self) -> Result<Option<String>> {
        Ok(self.load()?.token)
    }

    fn set_session(&self, token: String, user: User) -> Result<()> {
        let mut state = self.load()?;
        state.token = Some(token);
        state.user = Some(user);
        self.save(&state)
    }

    /// Drop token and user, keep everything else
    fn clear_session(&self) -> Result<()> {
        let mut state = self.load()?;
        state.token = None;
        state.user = None;
        self.save(&state)
    }

    fn llm_config(&self) -> Result<Option<LlmConfig>> {
        Ok(self.load()?.llm)
    }

    fn set_llm_config(&self, config: LlmConfig) -> Result<()> {
        let mut state = self.load()?;
        state.llm = Some(config);
        self.save(&state)
    }

    fn clear_llm_config(&self) -> Result<()> {
        let mut state = self.load()?;
        state.llm = None;
        self.save(&state)
    }
}

/// TOML file on disk
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<StoredState> {
        if !self.path.exists() {
            return Ok(StoredState::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        match toml::from_str::<StoredState>(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                // Same as an empty store; the next save rewrites it
                app_log!(warn, "Ignoring unreadable state file {}: {}", self.path.display(), e);
                Ok(StoredState::default())
            }
        }
    }

    fn save(&self, state: &StoredState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(state).context("Failed to serialize state")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict {}", self.path.display()))?;
        }

        app_log!(trace, "State saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// In-process store, used by tests and embedders
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoredState>,
}

impl MemoryStore {
    pub fn new(state: StoredState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<StoredState> {
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, state: &StoredState) -> Result<()> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&StoredState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;
    use chrono::TimeZone;

    fn user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn llm() -> LlmConfig {
        LlmConfig {
            provider: LlmProvider::Claude,
            api_key: "sk-test".to_string(),
            model: None,
            base_url: None,
        }
    }

    #[test]
    fn test_file_store_round_trip_and_session_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("state.toml"));
        assert_eq!(store.load().unwrap(), StoredState::default());

        store.set_session("tok".to_string(), user()).unwrap();
        store.set_llm_config(llm()).unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("tok"));

        store.clear_session().unwrap();
        let state = store.load().unwrap();
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
        assert_eq!(state.llm, Some(llm()));

        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "token = [[[").unwrap();
        let store = FileStore::new(path);
        assert_eq!(store.load().unwrap(), StoredState::default());
    }

    #[test]
    fn test_memory_store_llm_clear() {
        let store = MemoryStore::default();
        store.set_llm_config(llm()).unwrap();
        store.clear_llm_config().unwrap();
        assert_eq!(store.llm_config().unwrap(), None);
    }
}
