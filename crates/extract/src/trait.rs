use alloy::{
    consensus::{Header, Receipt},
    primitives::{Sealed, B256},
};
use bridge_types::{ConsensusExtra, ExtraError};
use std::sync::Arc;

/// Read access to the finalized local chain.
///
/// This is the narrow view of the blockchain the bridge needs: headers by
/// number, receipts by block hash, and decoding of the consensus metadata
/// carried in headers.
pub trait BlockchainBackend: Send + Sync {
    /// Error returned when receipts cannot be loaded.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Get a finalized header by number.
    fn header_by_number(&self, number: u64) -> Option<Sealed<Header>>;

    /// Get the receipts of a block by its hash.
    fn receipts_by_hash(&self, hash: B256) -> Result<Vec<Receipt>, Self::Error>;

    /// Decode the consensus metadata of a header.
    fn decode_extra(&self, header: &Header) -> Result<ConsensusExtra, ExtraError> {
        ConsensusExtra::from_header(header)
    }
}

impl<T> BlockchainBackend for Arc<T>
where
    T: BlockchainBackend + ?Sized,
{
    type Error = T::Error;

    fn header_by_number(&self, number: u64) -> Option<Sealed<Header>> {
        (**self).header_by_number(number)
    }

    fn receipts_by_hash(&self, hash: B256) -> Result<Vec<Receipt>, Self::Error> {
        (**self).receipts_by_hash(hash)
    }

    fn decode_extra(&self, header: &Header) -> Result<ConsensusExtra, ExtraError> {
        (**self).decode_extra(header)
    }
}
