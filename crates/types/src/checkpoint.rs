use crate::{ConsensusExtra, ValidatorMetadata};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::SolCall,
};
use bridge_contracts::{CheckpointManager, SIGNATURE_LEN};

/// Errors encoding a checkpoint for the root chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The aggregated signature is not an uncompressed G1 point.
    #[error("aggregated signature must be {expected} bytes, got {got}")]
    SignatureLength {
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// A validator BLS key has the wrong length.
    #[error("bls key of validator {address} must be {expected} bytes, got {got}")]
    BlsKeyLength {
        /// The offending validator.
        address: Address,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
}

/// A commitment of finalized chain state, ready for submission to the root
/// chain.
///
/// Checkpoints are built on demand from a header and its consensus metadata
/// and are never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Epoch of the checkpointed block.
    pub epoch: u64,
    /// Number of the checkpointed block.
    pub block_number: u64,
    /// Hash of the checkpointed block.
    pub block_hash: B256,
    /// Consensus round of the checkpointed block.
    pub block_round: u64,
    /// Hash of the validator set that signed the block.
    pub current_validator_set_hash: B256,
    /// Exit event root of the epoch.
    pub event_root: B256,
    /// Aggregated signature over the block.
    pub aggregated_signature: Bytes,
    /// Signer bitmap of the aggregated signature.
    pub bitmap: Bytes,
    /// The validator set of the next epoch. Present on epoch-ending
    /// checkpoints only.
    pub next_validator_set: Option<Vec<ValidatorMetadata>>,
}

impl Checkpoint {
    /// Build a checkpoint for a block from its consensus metadata.
    pub fn new(
        block_number: u64,
        block_hash: B256,
        extra: &ConsensusExtra,
        next_validator_set: Option<Vec<ValidatorMetadata>>,
    ) -> Self {
        Self {
            epoch: extra.checkpoint.epoch_number,
            block_number,
            block_hash,
            block_round: extra.checkpoint.block_round,
            current_validator_set_hash: extra.checkpoint.current_validators_hash,
            event_root: extra.checkpoint.event_root,
            aggregated_signature: extra.committed.aggregated_signature.clone(),
            bitmap: extra.committed.bitmap.clone(),
            next_validator_set,
        }
    }

    /// True if the checkpoint carries a validator set transition.
    pub const fn is_end_of_epoch(&self) -> bool {
        self.next_validator_set.is_some()
    }

    /// The aggregated signature as two big-endian 256-bit words.
    pub fn signature_words(&self) -> Result<[U256; 2], EncodeError> {
        if self.aggregated_signature.len() != SIGNATURE_LEN {
            return Err(EncodeError::SignatureLength {
                expected: SIGNATURE_LEN,
                got: self.aggregated_signature.len(),
            });
        }
        let (x, y) = self.aggregated_signature.split_at(SIGNATURE_LEN / 2);
        Ok([U256::from_be_slice(x), U256::from_be_slice(y)])
    }

    /// Build the root chain `submit` call for this checkpoint.
    pub fn to_submit_call(&self) -> Result<CheckpointManager::submitCall, EncodeError> {
        let new_validator_set = self
            .next_validator_set
            .iter()
            .flatten()
            .map(ValidatorMetadata::to_contract)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CheckpointManager::submitCall {
            checkpointMetadata: CheckpointManager::CheckpointMetadata {
                blockHash: self.block_hash,
                blockRound: U256::from(self.block_round),
                currentValidatorSetHash: self.current_validator_set_hash,
            },
            checkpoint: CheckpointManager::Checkpoint {
                epoch: U256::from(self.epoch),
                blockNumber: U256::from(self.block_number),
                eventRoot: self.event_root,
            },
            signature: self.signature_words()?,
            newValidatorSet: new_validator_set,
            bitmap: self.bitmap.clone(),
        })
    }

    /// ABI-encode the `submit` calldata for this checkpoint.
    pub fn abi_encode(&self) -> Result<Bytes, EncodeError> {
        self.to_submit_call().map(|call| call.abi_encode().into())
    }
}
