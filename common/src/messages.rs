//! Definition of Gatekeeper messages

use crate::types::*;
use crate::validation::ValidationStatus;

/// Candidate block ready for admission checks
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlockProposedMessage {
    /// The candidate block
    pub block: Block,

    /// Post-state of the parent block, which the candidate extends
    pub previous_state_root: StateRoot,
}

/// Single change to an on-chain setting
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SettingChange {
    /// Setting key
    pub key: String,

    /// New value, or `None` to delete the setting
    pub value: Option<String>,
}

/// Settings as of a newly committed state root
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SettingsUpdateMessage {
    /// State root the resulting settings belong to
    pub state_root: StateRoot,

    /// State root the changes apply on top of - `None` starts from empty settings
    pub previous_state_root: Option<StateRoot>,

    /// Ordered changes
    pub changes: Vec<SettingChange>,
}

/// Ledger messages, all qualified by the block they relate to
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LedgerMessage {
    BlockProposed(BlockProposedMessage),     // Candidate block to validate
    SettingsUpdate(SettingsUpdateMessage),   // Settings derived from a block
    BlockValidation(ValidationStatus),       // Outcome of a validator
}

// === Global message enum ===
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Message {
    None(()), // Just so we have a simple default

    // Generic messages, get of jail free cards
    String(String),          // Simple string
    JSON(serde_json::Value), // JSON object

    // Ledger messages with common BlockInfo
    Ledger((BlockInfo, LedgerMessage)),
}

impl Default for Message {
    fn default() -> Self {
        Self::None(())
    }
}

// Casts from specific messages
impl From<(BlockInfo, LedgerMessage)> for Message {
    fn from(msg: (BlockInfo, LedgerMessage)) -> Self {
        Message::Ledger(msg)
    }
}
