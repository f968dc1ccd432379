//! Gatekeeper block_rules_validator state storage

use crate::enforcer::ValidationRuleEnforcer;
use gatekeeper_common::{
    messages::{BlockProposedMessage, SettingsUpdateMessage},
    settings::SettingsError,
    settings_history::SettingsHistory,
    validation::ValidationStatus,
    BlockInfo,
};
use std::collections::VecDeque;
use tracing::warn;

pub struct State {
    /// settings per recent state root
    settings: SettingsHistory,

    /// proposals waiting for the settings of their parent, oldest first
    pending: VecDeque<(BlockInfo, BlockProposedMessage)>,

    /// number of proposals allowed to wait
    max_pending_blocks: usize,
}

impl State {
    pub fn new(settings_history_depth: usize, max_pending_blocks: usize) -> Self {
        Self {
            settings: SettingsHistory::new("block_rules_validator", settings_history_depth),
            pending: VecDeque::new(),
            max_pending_blocks,
        }
    }

    /// Apply a settings update, then validate any proposals it was holding up
    pub fn handle_settings_update(
        &mut self,
        msg: &SettingsUpdateMessage,
    ) -> Result<Vec<(BlockInfo, ValidationStatus)>, SettingsError> {
        self.settings.apply(msg)?;

        let (ready, waiting): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(_, proposal)| self.settings.get(&proposal.previous_state_root).is_some());
        self.pending = waiting;

        ready
            .into_iter()
            .map(|(block_info, proposal)| Ok((block_info, self.validate_block(&proposal)?)))
            .collect()
    }

    /// Validate a proposal, or hold it until its parent's settings arrive.
    /// Once more than `max_pending_blocks` are waiting, the oldest one's
    /// parent is reported as unknown.
    pub fn handle_block(
        &mut self,
        block_info: &BlockInfo,
        msg: &BlockProposedMessage,
    ) -> Result<Option<ValidationStatus>, SettingsError> {
        if self.settings.get(&msg.previous_state_root).is_some() {
            return self.validate_block(msg).map(Some);
        }

        warn!(
            block = block_info.number,
            "Holding block until settings for {} arrive", msg.previous_state_root
        );
        self.pending.push_back((block_info.clone(), msg.clone()));
        if self.pending.len() > self.max_pending_blocks {
            if let Some((_, oldest)) = self.pending.pop_front() {
                return Err(SettingsError::UnknownStateRoot(oldest.previous_state_root));
            }
        }
        Ok(None)
    }

    pub fn pending_blocks(&self) -> usize {
        self.pending.len()
    }

    pub fn validate_block(
        &self,
        msg: &BlockProposedMessage,
    ) -> Result<ValidationStatus, SettingsError> {
        ValidationRuleEnforcer::new(&self.settings).assess(&msg.block, &msg.previous_state_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeeper_common::{
        messages::SettingChange,
        settings::BLOCK_VALIDATION_RULES_KEY,
        validation::{BlockRuleViolation, ValidationError},
        StateRoot,
    };
    use gatekeeper_test_utils::make_block;

    fn too_many_intkey() -> ValidationStatus {
        ValidationStatus::NoGo(ValidationError::BlockRules(BlockRuleViolation::TooManyOfFamily {
            family: "intkey".to_string(),
            limit: 0,
            count: 1,
        }))
    }

    fn rules_update(
        root: &str,
        parent: Option<&str>,
        rules: Option<&str>,
    ) -> SettingsUpdateMessage {
        SettingsUpdateMessage {
            state_root: StateRoot::from(root),
            previous_state_root: parent.map(StateRoot::from),
            changes: vec![SettingChange {
                key: BLOCK_VALIDATION_RULES_KEY.to_string(),
                value: rules.map(str::to_string),
            }],
        }
    }

    fn proposal(families: &[&str], same_signer: bool, parent: &str) -> BlockProposedMessage {
        BlockProposedMessage {
            block: make_block(families, "pub_key", same_signer),
            previous_state_root: StateRoot::from(parent),
        }
    }

    #[test]
    fn validates_against_parent_settings() {
        let mut state = State::new(16, 4);
        state
            .handle_settings_update(&rules_update("root_1", None, Some("NofX:1,intkey")))
            .unwrap();
        state
            .handle_settings_update(&rules_update("root_2", Some("root_1"), Some("NofX:0,intkey")))
            .unwrap();

        let block = proposal(&["intkey"], true, "root_1");
        assert_eq!(state.validate_block(&block).unwrap(), ValidationStatus::Go);

        let block = proposal(&["intkey"], true, "root_2");
        assert_eq!(state.validate_block(&block).unwrap(), too_many_intkey());
    }

    #[test]
    fn removed_rules_accept_everything() {
        let mut state = State::new(16, 4);
        state.handle_settings_update(&rules_update("root_1", None, Some("local:0"))).unwrap();
        state.handle_settings_update(&rules_update("root_2", Some("root_1"), None)).unwrap();

        assert!(!state.validate_block(&proposal(&["intkey"], false, "root_1")).unwrap().is_go());
        assert!(state.validate_block(&proposal(&["intkey"], false, "root_2")).unwrap().is_go());
    }

    #[test]
    fn unknown_parent_state_is_an_error() {
        let state = State::new(16, 4);
        assert_eq!(
            state.validate_block(&proposal(&["intkey"], true, "missing")),
            Err(SettingsError::UnknownStateRoot(StateRoot::from("missing")))
        );
    }

    #[test]
    fn block_ahead_of_its_settings_is_held_then_validated() {
        let mut state = State::new(16, 4);
        let early = proposal(&["intkey"], true, "root_1");
        let early_info = BlockInfo::for_block(&early.block);

        assert_eq!(state.handle_block(&early_info, &early), Ok(None));
        assert_eq!(state.pending_blocks(), 1);

        let released = state
            .handle_settings_update(&rules_update("root_1", None, Some("NofX:0,intkey")))
            .unwrap();
        assert_eq!(released, vec![(early_info, too_many_intkey())]);
        assert_eq!(state.pending_blocks(), 0);
    }

    #[test]
    fn held_blocks_wait_for_their_own_parent() {
        let mut state = State::new(16, 4);
        state.handle_settings_update(&rules_update("root_1", None, None)).unwrap();

        let later = proposal(&["intkey"], true, "root_2");
        let later_info = BlockInfo { number: 2, ..BlockInfo::for_block(&later.block) };
        assert_eq!(state.handle_block(&later_info, &later), Ok(None));

        let known = proposal(&["intkey"], true, "root_1");
        let known_info = BlockInfo::for_block(&known.block);
        assert_eq!(state.handle_block(&known_info, &known), Ok(Some(ValidationStatus::Go)));

        let released = state
            .handle_settings_update(&rules_update("root_3", Some("root_1"), None))
            .unwrap();
        assert!(released.is_empty());
        assert_eq!(state.pending_blocks(), 1);

        let released = state
            .handle_settings_update(&rules_update("root_2", Some("root_1"), None))
            .unwrap();
        assert_eq!(released, vec![(later_info, ValidationStatus::Go)]);
    }

    #[test]
    fn too_many_held_blocks_is_an_error() {
        let mut state = State::new(16, 2);
        for parent in ["missing_1", "missing_2"] {
            let block = proposal(&["intkey"], true, parent);
            assert_eq!(state.handle_block(&BlockInfo::default(), &block), Ok(None));
        }

        let block = proposal(&["intkey"], true, "missing_3");
        assert_eq!(
            state.handle_block(&BlockInfo::default(), &block),
            Err(SettingsError::UnknownStateRoot(StateRoot::from("missing_1")))
        );
        assert_eq!(state.pending_blocks(), 2);
    }

    #[test]
    fn no_held_blocks_allowed_fails_at_once() {
        let mut state = State::new(16, 0);
        let block = proposal(&["intkey"], true, "missing");
        assert_eq!(
            state.handle_block(&BlockInfo::default(), &block),
            Err(SettingsError::UnknownStateRoot(StateRoot::from("missing")))
        );
        assert_eq!(state.pending_blocks(), 0);
    }
}
