use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SyncState {
    #[serde(default)]
    version: Option<String>,
}

/// The last version marker that was installed, backed by a JSON file.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: SyncState,
}

impl StateStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let raw = fs::read_to_string(&path).context("read sync state")?;
            serde_json::from_str(&raw).context("parse sync state")?
        } else {
            SyncState::default()
        };
        Ok(StateStore { path, state })
    }

    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join("state.json"))
    }

    pub fn version(&self) -> Option<&str> {
        self.state.version.as_deref()
    }

    pub fn set_version(&mut self, version: &str) -> Result<()> {
        self.state.version = Some(version.to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("create state dir")?;
        }
        let raw = serde_json::to_string_pretty(&self.state).context("serialize sync state")?;
        fs::write(&self.path, raw).context("write sync state")?;
        Ok(())
    }
}
