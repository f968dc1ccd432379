//! Core type definitions for Gatekeeper

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block info, shared across multiple messages
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block number
    pub number: u64,

    /// Block id (header signature)
    pub id: String,
}

impl BlockInfo {
    /// Summary info for a block
    pub fn for_block(block: &Block) -> Self {
        Self {
            number: block.header.block_num,
            id: block.header_signature.clone(),
        }
    }
}

/// Identifies the chain state a block executes against
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRoot(pub String);

impl fmt::Display for StateRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateRoot {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StateRoot {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Transaction header - the fields validation rules look at
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Name of the transaction family (application) this targets
    pub family_name: String,

    /// Version of the transaction family
    pub family_version: String,

    /// Public key of the transaction signer
    pub signer_public_key: String,

    /// Public key of the batch signer
    pub batcher_public_key: String,

    /// Replay protection nonce
    pub nonce: String,
}

/// Transaction
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Decoded header
    pub header: TransactionHeader,

    /// Signature over the header, serves as the transaction id
    pub header_signature: String,

    /// Opaque payload for the transaction processor
    pub payload: Vec<u8>,
}

/// Batch of transactions, applied atomically
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Signature over the batch header, serves as the batch id
    pub header_signature: String,

    /// Transactions in execution order
    pub transactions: Vec<Transaction>,
}

/// Block header
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height of the block
    pub block_num: u64,

    /// Id of the parent block
    pub previous_block_id: String,

    /// Public key of the validator which published the block
    pub signer_public_key: String,

    /// State root after applying this block
    pub state_root_hash: String,
}

/// Block
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Decoded header
    pub header: BlockHeader,

    /// Signature over the header, serves as the block id
    pub header_signature: String,

    /// Batches in execution order
    pub batches: Vec<Batch>,
}

impl Block {
    /// Total number of transactions across all batches
    pub fn transaction_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.transactions.len()).sum()
    }
}
