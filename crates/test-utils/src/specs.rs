use crate::test_constants::{
    test_extra, EXIT_SOURCE_ADDRESS, SLASH_SOURCE_ADDRESS, TEST_SIGNER_ADDRESS,
};
use alloy::{
    consensus::{Header, Receipt},
    primitives::{Address, Bytes, Log, Sealable, U256},
    sol_types::SolEvent,
};
use bridge_contracts::{L2StateSender::L2StateSynced, ValidatorSet::Slashed};
use bridge_types::{FinalizedBlock, PostBlockRequest};

/// Address that receives every exit built by a [`BlockSpec`].
pub const EXIT_RECEIVER: Address = Address::repeat_byte(0x42);

/// An address the bridge does not watch.
pub const FOREIGN_ADDRESS: Address = Address::repeat_byte(0xee);

/// A block specification, built up transaction by transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpec {
    /// The block number.
    pub number: u64,
    /// The epoch of the block.
    pub epoch: u64,
    /// Whether the block ends its epoch.
    pub end_of_epoch: bool,
    /// The block producer.
    pub beneficiary: Address,
    /// Receipts, one per transaction.
    pub receipts: Vec<Receipt>,
}

impl BlockSpec {
    /// An empty block of `epoch`, produced by the test signer.
    pub const fn new(number: u64, epoch: u64) -> Self {
        Self {
            number,
            epoch,
            end_of_epoch: false,
            beneficiary: TEST_SIGNER_ADDRESS,
            receipts: Vec::new(),
        }
    }

    /// Mark the block as ending its epoch.
    pub const fn end_of_epoch(mut self) -> Self {
        self.end_of_epoch = true;
        self
    }

    /// Set the block producer.
    pub const fn with_beneficiary(mut self, beneficiary: Address) -> Self {
        self.beneficiary = beneficiary;
        self
    }

    /// Add an exit sent by `sender`.
    pub fn exit_from(self, id: u64, sender: Address, data: &'static [u8]) -> Self {
        self.push_log(true, EXIT_SOURCE_ADDRESS, &exit_event(id, sender, data))
    }

    /// Add a user exit.
    pub fn exit(self, id: u64, data: &'static [u8]) -> Self {
        self.exit_from(id, Address::repeat_byte(0x01), data)
    }

    /// Add an exit sent by the slashing source.
    pub fn slash_exit(self, id: u64) -> Self {
        self.exit_from(id, SLASH_SOURCE_ADDRESS, b"slash")
    }

    /// Add a slashing of the exit `exit_id`.
    pub fn slashed(self, exit_id: u64) -> Self {
        let event = Slashed {
            exitId: U256::from(exit_id),
            validators: vec![Address::repeat_byte(0x0a)],
        };
        self.push_log(true, SLASH_SOURCE_ADDRESS, &event)
    }

    /// Add an exit log emitted by an unwatched contract.
    pub fn foreign_exit(self, id: u64) -> Self {
        self.push_log(true, FOREIGN_ADDRESS, &exit_event(id, Address::repeat_byte(0x01), b""))
    }

    /// Add an exit in a reverted transaction.
    pub fn failed_exit(self, id: u64) -> Self {
        self.push_log(false, EXIT_SOURCE_ADDRESS, &exit_event(id, Address::repeat_byte(0x01), b""))
    }

    fn push_log<E: SolEvent>(mut self, status: bool, address: Address, event: &E) -> Self {
        let log = Log { address, data: event.encode_log_data() };
        let cumulative_gas_used = 30_000 * (self.receipts.len() as u64 + 1);
        self.receipts.push(Receipt { status: status.into(), cumulative_gas_used, logs: vec![log] });
        self
    }

    /// The header of the block, carrying well-formed consensus metadata.
    pub fn header(&self) -> Header {
        Header {
            number: self.number,
            beneficiary: self.beneficiary,
            extra_data: test_extra(self.epoch, self.end_of_epoch).to_extra_data(),
            gas_limit: 30_000_000,
            timestamp: 1_700_000_000 + self.number * 2,
            ..Default::default()
        }
    }

    /// Build the finalized block.
    pub fn build(&self) -> FinalizedBlock {
        FinalizedBlock::new(self.header().seal_slow(), self.receipts.clone())
    }

    /// Build the finalization hook request for the block.
    pub fn to_request(&self, checkpoint_interval: u64) -> PostBlockRequest {
        PostBlockRequest::new(self.build(), self.epoch, self.end_of_epoch, checkpoint_interval)
    }
}

/// An exit from `sender` to [`EXIT_RECEIVER`].
pub fn exit_event(id: u64, sender: Address, data: &'static [u8]) -> L2StateSynced {
    L2StateSynced {
        id: U256::from(id),
        sender,
        receiver: EXIT_RECEIVER,
        data: Bytes::from_static(data),
    }
}
