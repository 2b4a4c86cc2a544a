#![allow(clippy::too_many_arguments)]
#![allow(missing_docs)]
use alloy::{
    primitives::{Address, Bytes, FixedBytes, U256},
    sol_types::SolValue,
};

mod checkpoint_manager {
    use super::*;

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        contract CheckpointManager {
            struct Validator {
                address _address;
                uint256[4] blsKey;
                uint256 votingPower;
            }

            struct CheckpointMetadata {
                bytes32 blockHash;
                uint256 blockRound;
                bytes32 currentValidatorSetHash;
            }

            struct Checkpoint {
                uint256 epoch;
                uint256 blockNumber;
                bytes32 eventRoot;
            }

            function submit(
                CheckpointMetadata calldata checkpointMetadata,
                Checkpoint calldata checkpoint,
                uint256[2] calldata signature,
                Validator[] calldata newValidatorSet,
                bytes calldata bitmap
            ) external;

            function currentCheckpointBlockNumber() external view returns (uint256);

            function getCheckpointBlock(uint256 blockNumber)
                external
                view
                returns (bool isFound, uint256 checkpointBlock);
        }
    );

    impl Copy for CheckpointManager::Validator {}
    impl Copy for CheckpointManager::CheckpointMetadata {}
    impl Copy for CheckpointManager::Checkpoint {}
    impl Copy for CheckpointManager::currentCheckpointBlockNumberCall {}
    impl Copy for CheckpointManager::getCheckpointBlockCall {}

    impl CheckpointManager::Validator {
        /// Get the validator address.
        pub const fn address(&self) -> Address {
            self._address
        }

        /// Get the voting power of the validator.
        pub const fn voting_power(&self) -> U256 {
            self.votingPower
        }
    }

    impl CheckpointManager::Checkpoint {
        /// Get the epoch of the checkpoint (discarding high bytes).
        pub const fn epoch(&self) -> u64 {
            self.epoch.as_limbs()[0]
        }

        /// Get the checkpointed block number (discarding high bytes).
        pub const fn block_number(&self) -> u64 {
            self.blockNumber.as_limbs()[0]
        }

        /// Get the exit event root committed by the checkpoint.
        pub const fn event_root(&self) -> FixedBytes<32> {
            self.eventRoot
        }
    }

    impl CheckpointManager::CheckpointMetadata {
        /// Get the hash of the checkpointed block.
        pub const fn block_hash(&self) -> FixedBytes<32> {
            self.blockHash
        }

        /// Get the consensus round of the checkpointed block (discarding high
        /// bytes).
        pub const fn block_round(&self) -> u64 {
            self.blockRound.as_limbs()[0]
        }
    }

    impl CheckpointManager::submitCall {
        /// True if the submission carries a validator set transition.
        #[allow(clippy::missing_const_for_fn)] // false positive
        pub fn is_end_of_epoch(&self) -> bool {
            !self.newValidatorSet.is_empty()
        }
    }
}
pub use checkpoint_manager::CheckpointManager;

mod state_sender {
    use super::*;

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        contract L2StateSender {
            event L2StateSynced(
                uint256 indexed id,
                address indexed sender,
                address indexed receiver,
                bytes data
            );
        }
    );

    impl L2StateSender::L2StateSynced {
        /// Get the exit id (discarding high bytes).
        pub const fn exit_id(&self) -> u64 {
            self.id.as_limbs()[0]
        }

        /// Get the address that initiated the exit.
        pub const fn sender(&self) -> Address {
            self.sender
        }

        /// Get the root chain receiver of the exit.
        pub const fn receiver(&self) -> Address {
            self.receiver
        }

        /// Get the opaque cross-chain message.
        pub const fn data(&self) -> &Bytes {
            &self.data
        }

        /// The canonical leaf bytes of the exit, i.e. the ABI encoding of
        /// `(id, sender, receiver, data)` as the root chain exit helper
        /// reconstructs it.
        pub fn leaf(&self) -> Vec<u8> {
            (self.id, self.sender, self.receiver, self.data.clone()).abi_encode_params()
        }
    }
}
pub use state_sender::L2StateSender;

mod validator_set {
    use super::*;

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        contract ValidatorSet {
            event Slashed(uint256 indexed exitId, address[] validators);
        }
    );

    impl ValidatorSet::Slashed {
        /// Get the id of the exit that was slashed.
        pub const fn exit_id(&self) -> U256 {
            self.exitId
        }

        /// Get the slashed validators.
        #[allow(clippy::missing_const_for_fn)] // false positive
        pub fn validators(&self) -> &[Address] {
            &self.validators
        }
    }
}
pub use validator_set::ValidatorSet;
