use alloy::primitives::{keccak256, Address, Bytes, B256};
use bridge_contracts::L2StateSender;

/// An exit event emitted on the chain, to be proven on the root chain once
/// its epoch is checkpointed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitEvent {
    /// Unique exit id.
    pub id: u64,
    /// Epoch the exit is attributed to.
    pub epoch: u64,
    /// Block the exit is attributed to.
    pub block_number: u64,
    /// The decoded log.
    pub event: L2StateSender::L2StateSynced,
}

impl ExitEvent {
    /// Create a new exit event.
    pub const fn new(
        id: u64,
        epoch: u64,
        block_number: u64,
        event: L2StateSender::L2StateSynced,
    ) -> Self {
        Self { id, epoch, block_number, event }
    }

    /// Address that initiated the exit.
    pub const fn sender(&self) -> Address {
        self.event.sender
    }

    /// Root chain receiver of the exit.
    pub const fn receiver(&self) -> Address {
        self.event.receiver
    }

    /// Message carried by the exit.
    pub const fn data(&self) -> &Bytes {
        &self.event.data
    }

    /// Canonical leaf bytes of the exit.
    pub fn leaf(&self) -> Vec<u8> {
        self.event.leaf()
    }

    /// Hash of the canonical leaf bytes.
    pub fn leaf_hash(&self) -> B256 {
        keccak256(self.leaf())
    }
}

/// A slash exit that was processed on the chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SlashedEvent {
    /// Id of the exit that carried the slashing.
    pub exit_id: u64,
}

impl SlashedEvent {
    /// Create a new slashed event.
    pub const fn new(exit_id: u64) -> Self {
        Self { exit_id }
    }
}
