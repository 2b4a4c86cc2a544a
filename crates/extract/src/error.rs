use alloy::primitives::U256;
use bridge_types::ExtraError;

/// Errors returned by the [`Extractor`].
///
/// [`Extractor`]: crate::Extractor
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// An intervening block is not known to the backend.
    #[error("block {0} was not found")]
    MissingBlock(u64),
    /// Receipts of a block could not be loaded.
    #[error("failed to load receipts of block {number}: {source}")]
    Receipts {
        /// The block number.
        number: u64,
        /// The backend error.
        #[source]
        source: Box<dyn core::error::Error + Send + Sync>,
    },
    /// The consensus metadata of a block could not be decoded.
    #[error("could not get header extra of block {number}: {source}")]
    Extra {
        /// The block number.
        number: u64,
        /// The decode error.
        #[source]
        source: ExtraError,
    },
    /// A log matched an event signature but did not decode.
    #[error("malformed {kind} log in block {number}: {source}")]
    Decode {
        /// The event name.
        kind: &'static str,
        /// The block number.
        number: u64,
        /// The ABI error.
        #[source]
        source: alloy::sol_types::Error,
    },
    /// An exit id does not fit in 64 bits.
    #[error("{kind} exit id {value} does not fit in 64 bits")]
    IdOverflow {
        /// The event name.
        kind: &'static str,
        /// The offending id.
        value: U256,
    },
}

impl ExtractError {
    /// True if the error is caused by a block missing from the backend.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MissingBlock(_))
    }
}
