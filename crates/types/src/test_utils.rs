use crate::{
    BridgeConstants, CheckpointData, CommittedSeal, ConsensusExtra, ExitEvent, ValidatorMetadata,
    ValidatorSetDelta,
};
use alloy::primitives::{Address, Bytes, B256, U256};
use bridge_contracts::{L2StateSender, BLS_KEY_LEN, SIGNATURE_LEN};

/// Address of the block producer run by the node under test.
pub const TEST_SIGNER_ADDRESS: Address = Address::repeat_byte(0x81);

/// Test address for the exit event source.
pub const EXIT_SOURCE_ADDRESS: Address = Address::repeat_byte(0x82);

/// Test address for the slashing source.
pub const SLASH_SOURCE_ADDRESS: Address = Address::repeat_byte(0x83);

/// Test address for the root chain checkpoint manager.
pub const CHECKPOINT_MANAGER_ADDRESS: Address = Address::repeat_byte(0x84);

/// Bridge constants for testing.
pub const TEST_CONSTANTS: BridgeConstants =
    BridgeConstants::new(EXIT_SOURCE_ADDRESS, SLASH_SOURCE_ADDRESS, CHECKPOINT_MANAGER_ADDRESS);

/// A validator with every key byte set to `byte`.
pub fn test_validator(byte: u8) -> ValidatorMetadata {
    ValidatorMetadata {
        address: Address::repeat_byte(byte),
        bls_key: Bytes::from(vec![byte; BLS_KEY_LEN]),
        voting_power: U256::from(100u64),
        is_active: true,
    }
}

/// Consensus metadata for a block of `epoch`, with a well-formed signature.
/// Epoch-ending metadata carries an empty validator delta.
pub fn test_extra(epoch: u64, end_of_epoch: bool) -> ConsensusExtra {
    ConsensusExtra {
        validators: end_of_epoch.then(ValidatorSetDelta::default),
        parent: CommittedSeal::default(),
        committed: CommittedSeal {
            aggregated_signature: Bytes::from(vec![epoch as u8; SIGNATURE_LEN]),
            bitmap: Bytes::from_static(&[0b1111]),
        },
        checkpoint: CheckpointData {
            block_round: 0,
            epoch_number: epoch,
            current_validators_hash: B256::repeat_byte(0x11),
            next_validators_hash: B256::repeat_byte(0x11),
            event_root: B256::ZERO,
        },
    }
}

/// An exit to `0x42..42` whose payload is the big-endian id.
pub fn test_exit(id: u64, epoch: u64, block_number: u64, sender: Address) -> ExitEvent {
    ExitEvent::new(
        id,
        epoch,
        block_number,
        L2StateSender::L2StateSynced {
            id: U256::from(id),
            sender,
            receiver: Address::repeat_byte(0x42),
            data: Bytes::from(id.to_be_bytes().to_vec()),
        },
    )
}
