use crate::{
    metrics::{self, SubmissionStatus},
    CheckpointError, ExitTree, TxRelayer, ValidatorSource,
};
use alloy::{
    consensus::Header,
    primitives::{Address, Sealed, B256, U256},
    sol_types::SolCall,
};
use bridge_contracts::CheckpointManager::{currentCheckpointBlockNumberCall, getCheckpointBlockCall};
use bridge_extract::{BlockchainBackend, BridgeEvent, Extractor};
use bridge_store::ExitEventStore;
use bridge_types::{BridgeConstants, Checkpoint, ConsensusExtra, ExitProof, PostBlockRequest};
use core::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Commits finalized chain state to the root chain and proves exits against
/// the committed checkpoints.
///
/// The manager is cheap to clone; clones share the same collaborators and
/// submission cadence.
pub struct CheckpointManager<B, V, R, S> {
    inner: Arc<Inner<B, V, R, S>>,
}

struct Inner<B, V, R, S> {
    /// Address of the block producer run by this node.
    signer: Address,
    /// Root chain checkpoint manager contract.
    checkpoint_manager: Address,
    extractor: Extractor,

    blockchain: B,
    validators: V,
    relayer: R,
    store: S,

    /// Block of the last spawned submission.
    last_sent_block: AtomicU64,
}

impl<B, V, R, S> Clone for CheckpointManager<B, V, R, S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<B, V, R, S> fmt::Debug for CheckpointManager<B, V, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointManager")
            .field("signer", &self.inner.signer)
            .field("checkpoint_manager", &self.inner.checkpoint_manager)
            .field("last_sent_block", &self.last_sent_block())
            .finish_non_exhaustive()
    }
}

impl<B, V, R, S> CheckpointManager<B, V, R, S> {
    /// Create a new manager.
    ///
    /// `signer` is the address this node produces blocks with, and sends
    /// root chain transactions from.
    pub fn new(
        signer: Address,
        constants: BridgeConstants,
        blockchain: B,
        validators: V,
        relayer: R,
        store: S,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                signer,
                checkpoint_manager: constants.checkpoint_manager(),
                extractor: Extractor::new(constants),
                blockchain,
                validators,
                relayer,
                store,
                last_sent_block: AtomicU64::new(0),
            }),
        }
    }

    /// Get the signer address.
    pub fn signer(&self) -> Address {
        self.inner.signer
    }

    /// Get the exit event store.
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get the root chain relayer.
    pub fn relayer(&self) -> &R {
        &self.inner.relayer
    }

    /// Get the block of the last spawned submission.
    pub fn last_sent_block(&self) -> u64 {
        self.inner.last_sent_block.load(Ordering::Relaxed)
    }

    /// True if `number` is due for a checkpoint: it ends its epoch, or it is
    /// `interval` blocks after the last submission.
    pub fn is_checkpoint_block(&self, number: u64, interval: u64, is_epoch_ending: bool) -> bool {
        is_epoch_ending || self.last_sent_block().checked_add(interval) == Some(number)
    }
}

impl<B, V, R, S> CheckpointManager<B, V, R, S>
where
    B: BlockchainBackend,
    V: ValidatorSource,
    R: TxRelayer,
    S: ExitEventStore,
{
    /// Query the root chain for the last checkpointed block.
    pub async fn latest_checkpoint_block(&self) -> Result<u64, CheckpointError> {
        let input = currentCheckpointBlockNumberCall {}.abi_encode();
        let output = self
            .inner
            .relayer
            .call(self.inner.signer, self.inner.checkpoint_manager, input.into())
            .await
            .map_err(CheckpointError::relayer)?;

        let number = currentCheckpointBlockNumberCall::abi_decode_returns(&output)?;
        to_u64(number)
    }

    /// Reset the submission cadence from the root chain, e.g. after a
    /// restart. Returns the root chain cursor.
    pub async fn reconcile_last_sent_block(&self) -> Result<u64, CheckpointError> {
        let cursor = self.latest_checkpoint_block().await?;
        self.inner.last_sent_block.store(cursor, Ordering::Relaxed);
        debug!(cursor, "reconciled last sent checkpoint block");
        Ok(cursor)
    }

    /// Submit a checkpoint for `latest`, first submitting an epoch-ending
    /// checkpoint for every epoch boundary between the root chain cursor and
    /// `latest` that the root chain has not seen.
    ///
    /// Blocks between the cursor and `latest` are read from the backend.
    /// `latest` itself is taken as given and need not be there yet.
    ///
    /// Any lookup, decode or submission failure aborts the whole call.
    /// Nothing is recorded locally, so the next call retries from the root
    /// chain cursor.
    #[instrument(skip_all, fields(block = latest.number, is_end_of_epoch = is_end_of_epoch))]
    pub async fn submit_checkpoint(
        &self,
        latest: &Sealed<Header>,
        is_end_of_epoch: bool,
    ) -> Result<(), CheckpointError> {
        let cursor = self.latest_checkpoint_block().await?;
        debug!(cursor, "submitting checkpoint");

        let latest_extra = self.decode_extra(latest)?;
        let start = cursor.saturating_add(1);

        if start < latest.number {
            let mut parent_header = self.header(start)?;
            let mut parent_extra = self.decode_extra(&parent_header)?;

            for number in start + 1..latest.number {
                let header = self.header(number)?;
                let extra = self.decode_extra(&header)?;

                if number != 1 && parent_extra.epoch() != extra.epoch() {
                    self.encode_and_send_checkpoint(&parent_header, &parent_extra, true).await?;
                }

                parent_header = header;
                parent_extra = extra;
            }

            // Last step of the walk, against `latest`. Here `latest.number`
            // is at least 2.
            if parent_extra.epoch() != latest_extra.epoch() {
                self.encode_and_send_checkpoint(&parent_header, &parent_extra, true).await?;
            }
        }

        self.encode_and_send_checkpoint(latest, &latest_extra, is_end_of_epoch).await
    }

    /// Encode a checkpoint for `header` and send it to the root chain. An
    /// epoch-ending checkpoint carries the validator set of the next epoch.
    pub async fn encode_and_send_checkpoint(
        &self,
        header: &Sealed<Header>,
        extra: &ConsensusExtra,
        is_end_of_epoch: bool,
    ) -> Result<(), CheckpointError> {
        let block = header.number;
        debug!(block, epoch = extra.epoch(), is_end_of_epoch, "sending checkpoint");

        let next_validator_set = if is_end_of_epoch {
            Some(self.inner.validators.validators(block).map_err(CheckpointError::validators)?)
        } else {
            None
        };

        let checkpoint = Checkpoint::new(block, header.hash(), extra, next_validator_set);
        let input = checkpoint.abi_encode()?;

        let receipt = match self
            .inner
            .relayer
            .send_transaction(self.inner.checkpoint_manager, input)
            .await
        {
            Ok(receipt) => receipt,
            Err(error) => {
                metrics::record_submission(SubmissionStatus::Error);
                return Err(CheckpointError::relayer(error));
            }
        };

        if !receipt.status {
            metrics::record_submission(SubmissionStatus::Failed);
            return Err(CheckpointError::SubmissionFailed { block });
        }

        metrics::record_submission(SubmissionStatus::Success);
        metrics::set_checkpoint_block(block);
        debug!(block, gas_used = receipt.gas_used, tx_hash = %receipt.tx_hash, "checkpoint sent");
        Ok(())
    }

    /// Compute the exit event root of an epoch. An epoch without exits has
    /// the zero root.
    pub fn build_event_root(&self, epoch: u64) -> Result<B256, CheckpointError> {
        let exits = self.inner.store.exit_events_by_epoch(epoch)?;
        if exits.is_empty() {
            return Ok(B256::ZERO);
        }
        Ok(ExitTree::from_exit_events(&exits)?.root())
    }

    /// Ask the root chain which checkpoint covers `block`. `None` if no
    /// submitted checkpoint covers it yet.
    pub async fn checkpoint_block_for(&self, block: u64) -> Result<Option<u64>, CheckpointError> {
        let input = getCheckpointBlockCall { blockNumber: U256::from(block) }.abi_encode();
        let output = self
            .inner
            .relayer
            .call(Address::ZERO, self.inner.checkpoint_manager, input.into())
            .await
            .map_err(CheckpointError::relayer)?;

        let response = getCheckpointBlockCall::abi_decode_returns(&output)?;
        if !response.isFound {
            return Ok(None);
        }
        to_u64(response.checkpointBlock).map(Some)
    }

    /// Generate the inclusion proof of an exit against the event root of the
    /// checkpoint covering it.
    ///
    /// The tree is rebuilt from the exits of the same epoch attributed to
    /// blocks at or below the checkpoint block, which is exactly the leaf set
    /// the checkpoint committed to.
    #[instrument(skip(self))]
    pub async fn generate_exit_proof(&self, exit_id: u64) -> Result<ExitProof, CheckpointError> {
        debug!("generating proof for exit");

        let exit = self.inner.store.exit_event(exit_id)?;
        let checkpoint_block = self
            .checkpoint_block_for(exit.block_number)
            .await?
            .ok_or(CheckpointError::CheckpointNotFound { exit_id })?;

        let exits = self.inner.store.exit_events_for_proof(exit.epoch, checkpoint_block)?;
        let tree = ExitTree::from_exit_events(&exits)?;

        let leaf_index = tree
            .leaf_index(&exit.leaf())
            .ok_or(CheckpointError::LeafNotFound { exit_id })?;
        let data = tree.proof(leaf_index)?;

        debug!(leaf_index, proof_len = data.len(), checkpoint_block, "generated proof for exit");
        Ok(ExitProof { data, leaf_index: leaf_index as u64, exit_event: exit, checkpoint_block })
    }

    /// Generate proofs for every pending slash exit. Exits that cannot be
    /// proven yet are logged and skipped.
    pub async fn generate_slash_exit_proofs(&self) -> Result<Vec<ExitProof>, CheckpointError> {
        let ids = self.inner.store.pending_slash_exit_ids()?;

        let mut proofs = Vec::with_capacity(ids.len());
        for exit_id in ids {
            match self.generate_exit_proof(exit_id).await {
                Ok(proof) => proofs.push(proof),
                Err(error) => {
                    info!(exit_id, %error, "failed to create a proof for slash exit event")
                }
            }
        }
        Ok(proofs)
    }

    fn header(&self, number: u64) -> Result<Sealed<Header>, CheckpointError> {
        self.inner.blockchain.header_by_number(number).ok_or(CheckpointError::MissingHeader(number))
    }

    fn decode_extra(&self, header: &Header) -> Result<ConsensusExtra, CheckpointError> {
        self.inner
            .blockchain
            .decode_extra(header)
            .map_err(|source| CheckpointError::Extra { number: header.number, source })
    }
}

impl<B, V, R, S> CheckpointManager<B, V, R, S>
where
    B: BlockchainBackend + 'static,
    V: ValidatorSource + 'static,
    R: TxRelayer + 'static,
    S: ExitEventStore + 'static,
{
    /// Process a finalized block.
    ///
    /// The exit and slash events of every block since the last processed one
    /// are persisted together with the new watermark. If the block was
    /// produced by this node and is due for a checkpoint, submission is
    /// spawned onto the tokio runtime and its handle returned. Submission
    /// failures are logged, never returned.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip_all, fields(block = req.block.number(), epoch = req.epoch))]
    pub fn post_block(
        &self,
        req: &PostBlockRequest,
    ) -> Result<Option<JoinHandle<()>>, CheckpointError> {
        let block = &req.block;
        let number = block.number();

        let last_saved = self.inner.store.last_saved()?;
        let events = self.inner.extractor.extract_range(&self.inner.blockchain, last_saved, block)?;
        let (exits, slashed) = BridgeEvent::partition(events);
        self.inner.store.commit_block(number, &exits, &slashed)?;

        if block.beneficiary() != self.inner.signer
            || !self.is_checkpoint_block(number, req.checkpoint_interval, req.is_epoch_ending)
        {
            return Ok(None);
        }

        let this = self.clone();
        let header = block.header.clone();
        let epoch = req.epoch;
        let is_end_of_epoch = req.is_epoch_ending;
        let handle = tokio::spawn(async move {
            if let Err(error) = this.submit_checkpoint(&header, is_end_of_epoch).await {
                warn!(%error, block = header.number, epoch, "failed to submit checkpoint");
            }
        });

        self.inner.last_sent_block.store(number, Ordering::Relaxed);
        Ok(Some(handle))
    }
}

fn to_u64(value: U256) -> Result<u64, CheckpointError> {
    value.try_into().map_err(|_| CheckpointError::BlockOverflow(value))
}
