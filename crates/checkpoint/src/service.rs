use crate::{CheckpointError, CheckpointManager, TxRelayer, ValidatorSource};
use alloy::primitives::B256;
use bridge_extract::BlockchainBackend;
use bridge_store::ExitEventStore;
use bridge_types::{ExitProof, PostBlockRequest};
use core::future::Future;
use tokio::task::JoinHandle;

/// The bridge as seen by the consensus layer.
///
/// Implemented by [`CheckpointManager`], and by [`NoopCheckpointManager`] for
/// chains that run without a bridge.
pub trait CheckpointService: Send + Sync {
    /// Process a finalized block, possibly spawning a checkpoint submission.
    fn post_block(
        &self,
        req: &PostBlockRequest,
    ) -> Result<Option<JoinHandle<()>>, CheckpointError>;

    /// Compute the exit event root of an epoch.
    fn build_event_root(&self, epoch: u64) -> Result<B256, CheckpointError>;

    /// Generate the inclusion proof of an exit.
    fn generate_exit_proof(
        &self,
        exit_id: u64,
    ) -> impl Future<Output = Result<ExitProof, CheckpointError>> + Send;

    /// Generate proofs for every pending slash exit, skipping failures.
    fn generate_slash_exit_proofs(
        &self,
    ) -> impl Future<Output = Result<Vec<ExitProof>, CheckpointError>> + Send;
}

impl<B, V, R, S> CheckpointService for CheckpointManager<B, V, R, S>
where
    B: BlockchainBackend + 'static,
    V: ValidatorSource + 'static,
    R: TxRelayer + 'static,
    S: ExitEventStore + 'static,
{
    fn post_block(
        &self,
        req: &PostBlockRequest,
    ) -> Result<Option<JoinHandle<()>>, CheckpointError> {
        Self::post_block(self, req)
    }

    fn build_event_root(&self, epoch: u64) -> Result<B256, CheckpointError> {
        Self::build_event_root(self, epoch)
    }

    async fn generate_exit_proof(&self, exit_id: u64) -> Result<ExitProof, CheckpointError> {
        Self::generate_exit_proof(self, exit_id).await
    }

    async fn generate_slash_exit_proofs(&self) -> Result<Vec<ExitProof>, CheckpointError> {
        Self::generate_slash_exit_proofs(self).await
    }
}

/// A [`CheckpointService`] that does nothing, for chains without a bridge.
///
/// Blocks are accepted and ignored, every epoch has the zero event root, and
/// there is nothing to prove.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCheckpointManager;

impl CheckpointService for NoopCheckpointManager {
    fn post_block(
        &self,
        _req: &PostBlockRequest,
    ) -> Result<Option<JoinHandle<()>>, CheckpointError> {
        Ok(None)
    }

    fn build_event_root(&self, _epoch: u64) -> Result<B256, CheckpointError> {
        Ok(B256::ZERO)
    }

    async fn generate_exit_proof(&self, _exit_id: u64) -> Result<ExitProof, CheckpointError> {
        Err(CheckpointError::Disabled)
    }

    async fn generate_slash_exit_proofs(&self) -> Result<Vec<ExitProof>, CheckpointError> {
        Ok(vec![])
    }
}
