use alloy::{
    consensus::{Header, Receipt},
    primitives::{Address, Sealed, B256},
};

/// A finalized block as handed to the bridge: its sealed header and the
/// receipts of its transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedBlock {
    /// The sealed header.
    pub header: Sealed<Header>,
    /// Transaction receipts, in block order.
    pub receipts: Vec<Receipt>,
}

impl FinalizedBlock {
    /// Create a new finalized block.
    pub const fn new(header: Sealed<Header>, receipts: Vec<Receipt>) -> Self {
        Self { header, receipts }
    }

    /// The block number.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// The block hash.
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }

    /// The block producer.
    pub fn beneficiary(&self) -> Address {
        self.header.beneficiary
    }
}

/// Everything the finalization hook needs to know about a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBlockRequest {
    /// The finalized block.
    pub block: FinalizedBlock,
    /// Epoch of the block.
    pub epoch: u64,
    /// Whether the block ends its epoch.
    pub is_epoch_ending: bool,
    /// Blocks between regular checkpoints.
    pub checkpoint_interval: u64,
}

impl PostBlockRequest {
    /// Create a new request.
    pub const fn new(
        block: FinalizedBlock,
        epoch: u64,
        is_epoch_ending: bool,
        checkpoint_interval: u64,
    ) -> Self {
        Self { block, epoch, is_epoch_ending, checkpoint_interval }
    }
}
