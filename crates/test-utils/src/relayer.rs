//! A mock root chain checkpoint manager.

use alloy::{
    primitives::{keccak256, Address, Bytes, U256},
    sol_types::{SolCall, SolValue},
};
use bridge_checkpoint::{SubmissionReceipt, TxRelayer};
use bridge_contracts::CheckpointManager::{
    currentCheckpointBlockNumberCall, getCheckpointBlockCall, submitCall,
};
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

/// Errors returned by [`MockRelayer`].
#[derive(Debug, thiserror::Error)]
pub enum MockRelayerError {
    /// The relayer was told to fail.
    #[error("root chain unavailable")]
    Unavailable,
    /// The call input matches no function of the checkpoint manager.
    #[error("unknown selector {0:?}")]
    UnknownSelector(Bytes),
    /// The call input could not be decoded.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
}

#[derive(Debug, Default)]
struct RootChain {
    cursor: u64,
    checkpoints: BTreeSet<u64>,
    submissions: Vec<submitCall>,
    revert: bool,
    unavailable: bool,
}

/// A [`TxRelayer`] that emulates the root chain checkpoint manager in memory.
///
/// Successful submissions move the cursor to the submitted block and make it
/// a checkpoint block. Every submission, reverted or not, is captured.
#[derive(Debug, Clone, Default)]
pub struct MockRelayer {
    state: Arc<Mutex<RootChain>>,
}

impl MockRelayer {
    /// Create a new mock relayer with the cursor at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock relayer whose last checkpoint is `cursor`.
    pub fn with_cursor(cursor: u64) -> Self {
        let relayer = Self::new();
        relayer.add_checkpoint(cursor);
        relayer
    }

    /// Record a checkpoint at `block` without a submission, and move the
    /// cursor to it if it is higher.
    pub fn add_checkpoint(&self, block: u64) {
        let mut state = self.state.lock().unwrap();
        state.cursor = state.cursor.max(block);
        state.checkpoints.insert(block);
    }

    /// Make every following submission revert.
    pub fn set_revert(&self, revert: bool) {
        self.state.lock().unwrap().revert = revert;
    }

    /// Make every following call and submission fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    /// The last checkpointed block.
    pub fn cursor(&self) -> u64 {
        self.state.lock().unwrap().cursor
    }

    /// Every checkpoint block, ascending.
    pub fn checkpoints(&self) -> Vec<u64> {
        self.state.lock().unwrap().checkpoints.iter().copied().collect()
    }

    /// Get the captured submissions.
    pub fn submissions(&self) -> Vec<submitCall> {
        self.state.lock().unwrap().submissions.clone()
    }

    /// Get the checkpointed block numbers of the captured submissions.
    pub fn submitted_blocks(&self) -> Vec<u64> {
        self.submissions().iter().map(|call| call.checkpoint.block_number()).collect()
    }
}

impl TxRelayer for MockRelayer {
    type Error = MockRelayerError;

    async fn call(&self, _from: Address, _to: Address, input: Bytes) -> Result<Bytes, Self::Error> {
        let state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(MockRelayerError::Unavailable);
        }

        let selector = input.get(..4).unwrap_or_default();
        if selector == currentCheckpointBlockNumberCall::SELECTOR {
            Ok(U256::from(state.cursor).abi_encode().into())
        } else if selector == getCheckpointBlockCall::SELECTOR {
            let call = getCheckpointBlockCall::abi_decode(&input)?;
            let block = call.blockNumber.saturating_to::<u64>();
            let found = state.checkpoints.range(block..).next().copied();
            Ok((found.is_some(), U256::from(found.unwrap_or_default())).abi_encode_params().into())
        } else {
            Err(MockRelayerError::UnknownSelector(input))
        }
    }

    async fn send_transaction(
        &self,
        _to: Address,
        input: Bytes,
    ) -> Result<SubmissionReceipt, Self::Error> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(MockRelayerError::Unavailable);
        }

        let call = submitCall::abi_decode(&input)?;
        let block = call.checkpoint.block_number();
        state.submissions.push(call);

        let status = !state.revert;
        if status {
            state.cursor = block;
            state.checkpoints.insert(block);
        }
        Ok(SubmissionReceipt { tx_hash: keccak256(&input), status, gas_used: 21_000 })
    }
}
