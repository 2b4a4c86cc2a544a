use crate::ExitEvent;
use alloy::primitives::B256;

/// Inclusion proof of an exit in a checkpointed event root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitProof {
    /// Sibling hashes, leaf level first.
    pub data: Vec<B256>,
    /// Position of the exit among the epoch's leaves.
    pub leaf_index: u64,
    /// The proven exit.
    pub exit_event: ExitEvent,
    /// The checkpoint block whose event root contains the exit.
    pub checkpoint_block: u64,
}
