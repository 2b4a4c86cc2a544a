use crate::{SubmissionReceipt, TxRelayer};
use alloy::{
    network::{ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{PendingTransactionError, Provider},
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use tracing::{debug, instrument};

/// Errors returned by [`ProviderRelayer`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayerError {
    /// RPC call failed.
    #[error("RPC error: {0}")]
    Transport(#[from] TransportError),
    /// Waiting for the transaction receipt failed.
    #[error("failed to get receipt: {0}")]
    Pending(#[from] PendingTransactionError),
}

/// A [`TxRelayer`] backed by an alloy [`Provider`].
///
/// The provider must be configured with fillers for gas, nonce, chain ID and
/// wallet signing (e.g. via `ProviderBuilder::new().wallet(..)`).
#[derive(Debug, Clone)]
pub struct ProviderRelayer<P> {
    provider: P,
}

impl<P> ProviderRelayer<P> {
    /// Create a new `ProviderRelayer`.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Unwrap the provider.
    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P> TxRelayer for ProviderRelayer<P>
where
    P: Provider + Send + Sync,
{
    type Error = RelayerError;

    async fn call(&self, from: Address, to: Address, input: Bytes) -> Result<Bytes, Self::Error> {
        let tx = TransactionRequest::default().with_from(from).with_to(to).with_input(input);
        self.provider.call(tx).await.map_err(Into::into)
    }

    #[instrument(skip_all, fields(to = %to))]
    async fn send_transaction(
        &self,
        to: Address,
        input: Bytes,
    ) -> Result<SubmissionReceipt, Self::Error> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        let pending = self.provider.send_transaction(tx).await?;
        debug!(tx_hash = %pending.tx_hash(), "sent transaction");

        let receipt = pending.get_receipt().await?;
        Ok(SubmissionReceipt {
            tx_hash: receipt.transaction_hash(),
            status: receipt.status(),
            gas_used: receipt.gas_used(),
        })
    }
}
