//! Flattened transaction view of a block
//!
//! Positional rules index into this view: batches in block order, then
//! transactions in batch order. Index 0 is the first transaction of the first
//! batch and every transaction has exactly one index.

use gatekeeper_common::{Block, TransactionHeader};

/// Read-only, ordered transaction headers of one block
#[derive(Debug, Clone)]
pub struct FlattenedTransactions<'a> {
    headers: Vec<&'a TransactionHeader>,
}

impl<'a> FlattenedTransactions<'a> {
    pub fn from_block(block: &'a Block) -> Self {
        let headers = block
            .batches
            .iter()
            .flat_map(|batch| batch.transactions.iter())
            .map(|txn| &txn.header)
            .collect();
        Self { headers }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Header at a position, `None` when the block is too short
    pub fn get(&self, index: usize) -> Option<&'a TransactionHeader> {
        self.headers.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TransactionHeader> + '_ {
        self.headers.iter().copied()
    }
}
