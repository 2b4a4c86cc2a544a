use bridge_store::{ExitEventStore, MemoryExitStore, StoreError};
use bridge_types::ExitEvent;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Error returned by [`FlakyStore`] while watermark writes are refused.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("watermark write refused")]
pub struct WatermarkRefused;

/// A [`MemoryExitStore`] whose watermark writes can be made to fail.
///
/// Block commits go through the default [`ExitEventStore::commit_block`], so
/// a refused watermark leaves the block's exits inserted and the watermark
/// where it was.
#[derive(Debug, Clone)]
pub struct FlakyStore {
    inner: MemoryExitStore,
    refuse_watermark: Arc<AtomicBool>,
}

impl FlakyStore {
    /// Wrap a store. Writes succeed until [`Self::refuse_watermark`] is set.
    pub fn new(inner: MemoryExitStore) -> Self {
        Self { inner, refuse_watermark: Default::default() }
    }

    /// Make watermark writes fail, or succeed again.
    pub fn refuse_watermark(&self, refuse: bool) {
        self.refuse_watermark.store(refuse, Ordering::SeqCst);
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &MemoryExitStore {
        &self.inner
    }
}

impl ExitEventStore for FlakyStore {
    fn insert_exit_events(&self, events: &[ExitEvent]) -> Result<(), StoreError> {
        self.inner.insert_exit_events(events)
    }

    fn exit_events_by_epoch(&self, epoch: u64) -> Result<Vec<ExitEvent>, StoreError> {
        self.inner.exit_events_by_epoch(epoch)
    }

    fn exit_events_for_proof(
        &self,
        epoch: u64,
        max_block: u64,
    ) -> Result<Vec<ExitEvent>, StoreError> {
        self.inner.exit_events_for_proof(epoch, max_block)
    }

    fn exit_event(&self, id: u64) -> Result<ExitEvent, StoreError> {
        self.inner.exit_event(id)
    }

    fn last_saved(&self) -> Result<u64, StoreError> {
        self.inner.last_saved()
    }

    fn update_last_saved(&self, block: u64) -> Result<(), StoreError> {
        if self.refuse_watermark.load(Ordering::SeqCst) {
            return Err(StoreError::backend(WatermarkRefused));
        }
        self.inner.update_last_saved(block)
    }

    fn remove_slash_exit_events(&self, ids: &[u64]) -> Result<(), StoreError> {
        self.inner.remove_slash_exit_events(ids)
    }

    fn pending_slash_exit_ids(&self) -> Result<Vec<u64>, StoreError> {
        self.inner.pending_slash_exit_ids()
    }
}
