use alloy::primitives::{Address, Bytes, B256};
use bridge_types::ValidatorMetadata;
use core::future::Future;

/// A trait for reading the validator set known to consensus.
pub trait ValidatorSource: Send + Sync {
    /// The error type returned on lookup failure.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Get the validator set in effect after the given block.
    fn validators(&self, block: u64) -> Result<Vec<ValidatorMetadata>, Self::Error>;
}

/// The outcome of a transaction sent to the root chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Hash of the mined transaction.
    pub tx_hash: B256,
    /// True if the transaction succeeded.
    pub status: bool,
    /// Gas used by the transaction.
    pub gas_used: u64,
}

/// A trait for talking to the root chain.
///
/// Implementors own the transport, and the signing and fee handling of sent
/// transactions.
pub trait TxRelayer: Send + Sync {
    /// The error type returned by RPC operations.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Execute a read-only call and return its output.
    fn call(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
    ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;

    /// Send a transaction and wait for its receipt.
    fn send_transaction(
        &self,
        to: Address,
        input: Bytes,
    ) -> impl Future<Output = Result<SubmissionReceipt, Self::Error>> + Send;
}
