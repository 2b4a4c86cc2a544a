use crate::TreeError;
use alloy::primitives::U256;
use bridge_extract::ExtractError;
use bridge_store::StoreError;
use bridge_types::{EncodeError, ExtraError};

/// Errors returned by the [`CheckpointManager`].
///
/// [`CheckpointManager`]: crate::CheckpointManager
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CheckpointError {
    /// A root chain call or transaction failed.
    #[error("root chain error: {0}")]
    Relayer(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// A header is not known to the local chain.
    #[error("block {0} was not found")]
    MissingHeader(u64),
    /// The consensus metadata of a header could not be decoded.
    #[error("could not get header extra of block {number}: {source}")]
    Extra {
        /// The block number.
        number: u64,
        /// The decode error.
        #[source]
        source: ExtraError,
    },
    /// The validator set could not be loaded.
    #[error("failed to get validators: {0}")]
    Validators(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// The checkpoint could not be encoded.
    #[error("failed to encode checkpoint: {0}")]
    Encode(#[from] EncodeError),
    /// A root chain response could not be decoded.
    #[error("failed to decode root chain response: {0}")]
    Abi(#[from] alloy::sol_types::Error),
    /// The checkpoint transaction was mined but reverted.
    #[error("checkpoint submission transaction failed for block {block}")]
    SubmissionFailed {
        /// The checkpointed block.
        block: u64,
    },
    /// No submitted checkpoint covers the block of an exit.
    #[error("checkpoint block not found for exit ID {exit_id}")]
    CheckpointNotFound {
        /// The exit id.
        exit_id: u64,
    },
    /// An exit is absent from the tree of its checkpoint.
    #[error("exit ID {exit_id} is not a leaf of its checkpoint tree")]
    LeafNotFound {
        /// The exit id.
        exit_id: u64,
    },
    /// A block number reported by the root chain does not fit in 64 bits.
    #[error("root chain block number {0} does not fit in 64 bits")]
    BlockOverflow(U256),
    /// The bridge is disabled.
    #[error("the bridge is disabled")]
    Disabled,
    /// Exit event storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Event extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Exit tree construction failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl CheckpointError {
    /// Wrap a root chain error.
    pub fn relayer<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Relayer(Box::new(error))
    }

    /// Wrap a validator lookup error.
    pub fn validators<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Validators(Box::new(error))
    }

    /// True if the error is caused by something that does not exist (yet):
    /// a header, an exit, or a checkpoint covering an exit.
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::MissingHeader(_) | Self::CheckpointNotFound { .. } | Self::LeafNotFound { .. } => {
                true
            }
            Self::Store(e) => e.is_not_found(),
            Self::Extract(e) => e.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(CheckpointError::MissingHeader(4).is_not_found());
        assert!(CheckpointError::CheckpointNotFound { exit_id: 1 }.is_not_found());
        assert!(CheckpointError::from(StoreError::NotFound { id: 2 }).is_not_found());
        assert!(CheckpointError::from(ExtractError::MissingBlock(3)).is_not_found());
        assert!(!CheckpointError::SubmissionFailed { block: 5 }.is_not_found());
        assert!(!CheckpointError::from(TreeError::Empty).is_not_found());
    }

    #[test]
    fn display() {
        assert_eq!(
            CheckpointError::SubmissionFailed { block: 15 }.to_string(),
            "checkpoint submission transaction failed for block 15"
        );
        assert_eq!(
            CheckpointError::CheckpointNotFound { exit_id: 9 }.to_string(),
            "checkpoint block not found for exit ID 9"
        );
    }
}
