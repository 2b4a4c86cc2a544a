use crate::StoreError;
use bridge_types::ExitEvent;

/// Ordered storage of exit events keyed by `(epoch, id)`, the set of pending
/// slash exits, and the last processed block watermark.
///
/// Events returned by the range queries are sorted by ascending id, which is
/// the canonical leaf order of the epoch's event tree.
pub trait ExitEventStore: Send + Sync {
    /// Insert exit events. Inserting an empty batch is a no-op. Exits
    /// originating from the slashing source are also queued as pending slash
    /// exits.
    fn insert_exit_events(&self, events: &[ExitEvent]) -> Result<(), StoreError>;

    /// Get every exit event of an epoch.
    fn exit_events_by_epoch(&self, epoch: u64) -> Result<Vec<ExitEvent>, StoreError>;

    /// Get the exit events of an epoch attributed to blocks at or below
    /// `max_block`.
    fn exit_events_for_proof(
        &self,
        epoch: u64,
        max_block: u64,
    ) -> Result<Vec<ExitEvent>, StoreError>;

    /// Get an exit event by id.
    fn exit_event(&self, id: u64) -> Result<ExitEvent, StoreError>;

    /// Get the last processed block. Zero if nothing was processed yet.
    fn last_saved(&self) -> Result<u64, StoreError>;

    /// Set the last processed block.
    fn update_last_saved(&self, block: u64) -> Result<(), StoreError>;

    /// Remove ids from the pending slash exits. Unknown ids are ignored.
    fn remove_slash_exit_events(&self, ids: &[u64]) -> Result<(), StoreError>;

    /// Get the pending slash exit ids, ascending.
    fn pending_slash_exit_ids(&self) -> Result<Vec<u64>, StoreError>;

    /// Persist the outcome of processing a block: insert its exits, advance
    /// the watermark to `block`, then drop the processed slash exits.
    ///
    /// Implementations backed by a transactional store should override this to
    /// commit all three writes at once.
    fn commit_block(
        &self,
        block: u64,
        exits: &[ExitEvent],
        slashed_ids: &[u64],
    ) -> Result<(), StoreError> {
        self.insert_exit_events(exits)?;
        self.update_last_saved(block)?;
        self.remove_slash_exit_events(slashed_ids)
    }
}
