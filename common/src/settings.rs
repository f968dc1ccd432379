//! Read access to on-chain settings as of a given state root

use crate::StateRoot;
use std::sync::Arc;
use thiserror::Error;

/// Setting holding the block validation rules
pub const BLOCK_VALIDATION_RULES_KEY: &str = "sawtooth.validator.block_validation_rules";

/// Failure to read settings - never a statement about the block itself
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// **Cause:** No settings are known for the state root
    #[error("Unknown state root: {0}")]
    UnknownStateRoot(StateRoot),

    /// **Cause:** The settings store could not be read
    #[error("Settings unavailable: {0}")]
    Unavailable(String),
}

/// Resolves setting keys against the chain state at a state root
pub trait SettingsAccessor: Send + Sync {
    fn get_setting(&self, state_root: &StateRoot, key: &str)
        -> Result<Option<String>, SettingsError>;
}

impl<T: SettingsAccessor + ?Sized> SettingsAccessor for &T {
    fn get_setting(
        &self,
        state_root: &StateRoot,
        key: &str,
    ) -> Result<Option<String>, SettingsError> {
        (**self).get_setting(state_root, key)
    }
}

impl<T: SettingsAccessor + ?Sized> SettingsAccessor for Arc<T> {
    fn get_setting(
        &self,
        state_root: &StateRoot,
        key: &str,
    ) -> Result<Option<String>, SettingsError> {
        (**self).get_setting(state_root, key)
    }
}
