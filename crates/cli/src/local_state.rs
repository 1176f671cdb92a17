use std::{fs, path::Path};

use engine::{HistoryCache, HistoryItem, Profile};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Everything the CLI keeps on the device, one entry per user id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LocalState {
    pub history: Vec<HistorySnapshot>,
    pub profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub user_id: String,
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub user_id: String,
    pub profile: Profile,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn history_for(&self, user_id: &str) -> Option<&[HistoryItem]> {
        self.history
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map(|entry| entry.items.as_slice())
    }

    pub fn set_history(&mut self, user_id: &str, items: &[HistoryItem]) {
        if let Some(entry) = self
            .history
            .iter_mut()
            .find(|entry| entry.user_id == user_id)
        {
            entry.items = items.to_vec();
            return;
        }

        self.history.push(HistorySnapshot {
            user_id: user_id.to_string(),
            items: items.to_vec(),
        });
    }

    pub fn profile_for(&self, user_id: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map(|entry| &entry.profile)
    }

    pub fn set_profile(&mut self, user_id: &str, profile: Profile) {
        if let Some(entry) = self
            .profiles
            .iter_mut()
            .find(|entry| entry.user_id == user_id)
        {
            entry.profile = profile;
            return;
        }

        self.profiles.push(ProfileEntry {
            user_id: user_id.to_string(),
            profile,
        });
    }
}

/// History snapshot cache backed by the local state file.
///
/// Every `store` rewrites the file.
#[derive(Debug)]
pub struct FileHistoryCache {
    path: String,
    state: LocalState,
}

impl FileHistoryCache {
    pub fn open(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let state = LocalState::load(&path)?;
        Ok(Self { path, state })
    }
}

impl HistoryCache for FileHistoryCache {
    type Error = AppError;

    fn load(&self, user_id: &str) -> Option<Vec<HistoryItem>> {
        self.state.history_for(user_id).map(<[HistoryItem]>::to_vec)
    }

    fn store(&mut self, user_id: &str, items: &[HistoryItem]) -> Result<()> {
        self.state.set_history(user_id, items);
        self.state.save(&self.path)
    }
}
