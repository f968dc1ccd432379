//! Validation rule enforcer
//! Checks a candidate block against the block validation rules set at its parent state

use crate::{
    rules::{grammar, BlockRule},
    transactions::FlattenedTransactions,
};
use gatekeeper_common::{
    settings::{SettingsAccessor, SettingsError, BLOCK_VALIDATION_RULES_KEY},
    validation::{BlockRuleViolation, ValidationStatus},
    Block, StateRoot,
};
use tracing::{debug, warn};

/// Check a block against a rules setting.
///
/// Invocations which do not parse are ignored, so any setting - empty,
/// garbage or partly malformed - gives a decision. Stops at the first
/// violated rule.
pub fn enforce_validation_rules(rules: &str, block: &Block) -> Result<(), BlockRuleViolation> {
    let txns = FlattenedTransactions::from_block(block);
    let block_signer = block.header.signer_public_key.as_str();

    for invocation in grammar::parse(rules) {
        let rule = match BlockRule::from_invocation(&invocation) {
            Ok(rule) => rule,
            Err(e) => {
                warn!("Validation rule ignored: {e}");
                continue;
            }
        };
        rule.check(&txns, block_signer)?;
    }

    Ok(())
}

/// Applies the block validation rules set on chain
pub struct ValidationRuleEnforcer<A> {
    settings: A,
}

impl<A: SettingsAccessor> ValidationRuleEnforcer<A> {
    pub fn new(settings: A) -> Self {
        Self { settings }
    }

    /// Does the block satisfy the rules set at `state_root`, the state it extends?
    /// Only a failure to read the settings is an error.
    pub fn validate(&self, block: &Block, state_root: &StateRoot) -> Result<bool, SettingsError> {
        Ok(self.assess(block, state_root)?.is_go())
    }

    /// As `validate`, reporting the first violated rule
    pub fn assess(
        &self,
        block: &Block,
        state_root: &StateRoot,
    ) -> Result<ValidationStatus, SettingsError> {
        let rules = self.settings.get_setting(state_root, BLOCK_VALIDATION_RULES_KEY)?;
        let result = match rules.as_deref().map(str::trim) {
            None | Some("") => {
                debug!("No block validation rules set at state root {state_root}");
                Ok(())
            }
            Some(rules) => enforce_validation_rules(rules, block),
        };
        Ok(result.into())
    }
}
