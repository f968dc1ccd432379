//! Test helpers shared by Gatekeeper modules

use gatekeeper_common::{
    settings::{SettingsAccessor, SettingsError},
    Batch, Block, BlockHeader, StateRoot, Transaction, TransactionHeader,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// Transaction with the given family and signer
pub fn make_transaction(family: &str, signer: &str) -> Transaction {
    Transaction {
        header: TransactionHeader {
            family_name: family.to_string(),
            family_version: "1.0".to_string(),
            signer_public_key: signer.to_string(),
            batcher_public_key: signer.to_string(),
            nonce: String::new(),
        },
        header_signature: format!("txn_{family}_{signer}"),
        payload: Vec::new(),
    }
}

/// Block with one batch per entry of `batches`, each holding `(family, signer)` transactions
pub fn make_block_with_batches(batches: &[&[(&str, &str)]], block_signer: &str) -> Block {
    Block {
        header: BlockHeader {
            block_num: 1,
            previous_block_id: "genesis".to_string(),
            signer_public_key: block_signer.to_string(),
            state_root_hash: "next_state_root".to_string(),
        },
        header_signature: "block_1".to_string(),
        batches: batches
            .iter()
            .enumerate()
            .map(|(index, txns)| Batch {
                header_signature: format!("batch_{index}"),
                transactions: txns
                    .iter()
                    .map(|(family, signer)| make_transaction(family, signer))
                    .collect(),
            })
            .collect(),
    }
}

/// Block with a single batch of `families`, all signed by `signer`.
/// The block itself is signed by `signer` when `same_signer`, otherwise by "other".
pub fn make_block(families: &[&str], signer: &str, same_signer: bool) -> Block {
    let txns: Vec<(&str, &str)> = families.iter().map(|family| (*family, signer)).collect();
    let block_signer = if same_signer { signer } else { "other" };
    make_block_with_batches(&[txns.as_slice()], block_signer)
}

/// Settings accessor answering the same settings for every state root
#[derive(Default)]
pub struct MockSettings {
    settings: RwLock<HashMap<String, String>>,
    failure: RwLock<Option<SettingsError>>,
    reads: RwLock<Vec<(StateRoot, String)>>,
}

impl MockSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_setting(&self, key: &str, value: &str) {
        self.settings.write().unwrap().insert(key.to_string(), value.to_string());
    }

    pub fn remove_setting(&self, key: &str) {
        self.settings.write().unwrap().remove(key);
    }

    /// Make every subsequent read fail
    pub fn fail_with(&self, error: SettingsError) {
        *self.failure.write().unwrap() = Some(error);
    }

    /// Reads made so far, in order
    pub fn reads(&self) -> Vec<(StateRoot, String)> {
        self.reads.read().unwrap().clone()
    }
}

impl SettingsAccessor for MockSettings {
    fn get_setting(
        &self,
        state_root: &StateRoot,
        key: &str,
    ) -> Result<Option<String>, SettingsError> {
        self.reads.write().unwrap().push((state_root.clone(), key.to_string()));
        if let Some(error) = self.failure.read().unwrap().as_ref() {
            return Err(error.clone());
        }
        Ok(self.settings.read().unwrap().get(key).cloned())
    }
}
