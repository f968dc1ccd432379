//! Settings history
//! Keeps settings snapshots per state root so any recent parent can be validated against
//! Uses imbl collections so snapshots share structure!

use crate::{
    messages::SettingsUpdateMessage,
    settings::{SettingsAccessor, SettingsError},
    StateRoot,
};
use imbl::HashMap;
use std::collections::VecDeque;
use tracing::info;

/// Settings snapshot at one state root
pub type Settings = HashMap<String, String>;

struct HistoryEntry {
    state_root: StateRoot,
    settings: Settings,
}

/// Bounded history of settings snapshots, oldest first
pub struct SettingsHistory {
    /// History, one per state root
    history: VecDeque<HistoryEntry>,

    /// Module name
    module: String,

    /// Number of state roots to retain
    depth: usize,
}

impl SettingsHistory {
    /// Construct
    pub fn new(module: &str, depth: usize) -> Self {
        Self {
            history: VecDeque::new(),
            module: module.to_string(),
            depth: depth.max(1),
        }
    }

    /// Get the settings for the given state root (if any), direct ref
    pub fn get(&self, state_root: &StateRoot) -> Option<&Settings> {
        self.history
            .iter()
            .rev()
            .find(|entry| &entry.state_root == state_root)
            .map(|entry| &entry.settings)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Derive and store the settings for a new state root
    pub fn apply(&mut self, update: &SettingsUpdateMessage) -> Result<(), SettingsError> {
        let mut settings = match &update.previous_state_root {
            Some(parent) => self
                .get(parent)
                .cloned()
                .ok_or_else(|| SettingsError::UnknownStateRoot(parent.clone()))?,
            None => Settings::new(),
        };

        for change in &update.changes {
            match &change.value {
                Some(value) => {
                    settings.insert(change.key.clone(), value.clone());
                }
                None => {
                    settings.remove(&change.key);
                }
            }
        }

        self.commit(update.state_root.clone(), settings);
        Ok(())
    }

    /// Commit the settings for a state root, replacing any earlier copy
    pub fn commit(&mut self, state_root: StateRoot, settings: Settings) {
        self.history.retain(|entry| entry.state_root != state_root);
        while self.history.len() >= self.depth {
            if let Some(entry) = self.history.pop_front() {
                info!(
                    "{} pruning settings for state root {}",
                    self.module, entry.state_root
                );
            }
        }
        self.history.push_back(HistoryEntry {
            state_root,
            settings,
        });
    }
}

impl SettingsAccessor for SettingsHistory {
    fn get_setting(
        &self,
        state_root: &StateRoot,
        key: &str,
    ) -> Result<Option<String>, SettingsError> {
        self.get(state_root)
            .map(|settings| settings.get(key).cloned())
            .ok_or_else(|| SettingsError::UnknownStateRoot(state_root.clone()))
    }
}
