use crate::specs::BlockSpec;
use alloy::{
    consensus::{Header, Receipt},
    primitives::{Sealed, B256},
};
use bridge_extract::BlockchainBackend;
use bridge_types::FinalizedBlock;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Errors returned by [`TestChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// No block with this hash is known.
    #[error("unknown block {0}")]
    UnknownBlock(B256),
}

/// An in-memory finalized chain.
#[derive(Debug, Clone, Default)]
pub struct TestChain {
    blocks: Arc<Mutex<BTreeMap<u64, FinalizedBlock>>>,
}

impl TestChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain of empty blocks `1..=tip`, produced by the test signer.
    ///
    /// Epochs start at 1, and each number in `epoch_ends` ends its epoch.
    /// Blocks after the last epoch end belong to the following epoch.
    pub fn with_epochs(tip: u64, epoch_ends: &[u64]) -> Self {
        let chain = Self::new();
        for number in 1..=tip {
            chain.insert(epoch_spec(number, epoch_ends).build());
        }
        chain
    }

    /// Insert a block, replacing any block with the same number.
    pub fn insert(&self, block: FinalizedBlock) {
        self.blocks.lock().unwrap().insert(block.number(), block);
    }

    /// Get a block by number.
    pub fn block(&self, number: u64) -> Option<FinalizedBlock> {
        self.blocks.lock().unwrap().get(&number).cloned()
    }

    /// Number of the highest block, zero if the chain is empty.
    pub fn tip(&self) -> u64 {
        self.blocks.lock().unwrap().keys().next_back().copied().unwrap_or_default()
    }

    /// Number of blocks in the chain.
    pub fn len(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    /// True if the chain has no blocks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The [`BlockSpec`] of block `number` in a chain whose epochs end at
/// `epoch_ends`.
pub fn epoch_spec(number: u64, epoch_ends: &[u64]) -> BlockSpec {
    let epoch = 1 + epoch_ends.iter().filter(|end| **end < number).count() as u64;
    let spec = BlockSpec::new(number, epoch);
    if epoch_ends.contains(&number) {
        spec.end_of_epoch()
    } else {
        spec
    }
}

impl BlockchainBackend for TestChain {
    type Error = ChainError;

    fn header_by_number(&self, number: u64) -> Option<Sealed<Header>> {
        self.blocks.lock().unwrap().get(&number).map(|block| block.header.clone())
    }

    fn receipts_by_hash(&self, hash: B256) -> Result<Vec<Receipt>, Self::Error> {
        self.blocks
            .lock()
            .unwrap()
            .values()
            .find(|block| block.hash() == hash)
            .map(|block| block.receipts.clone())
            .ok_or(ChainError::UnknownBlock(hash))
    }
}
