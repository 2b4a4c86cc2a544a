use crate::{ExitEventStore, StoreError};
use alloy::primitives::Address;
use bridge_types::ExitEvent;
use core::fmt;
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};
use tracing::trace;

/// An in-memory [`ExitEventStore`].
///
/// All state lives under a single lock, so a reader never observes exits of
/// a block without the matching watermark. Clones share the same state.
#[derive(Clone)]
pub struct MemoryExitStore {
    inner: Arc<RwLock<StoreInner>>,
    slash_source: Address,
}

impl fmt::Debug for MemoryExitStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("MemoryExitStore")
            .field("exits", &inner.exits.len())
            .field("last_saved", &inner.last_saved)
            .field("pending_slash", &inner.pending_slash.len())
            .finish()
    }
}

#[derive(Default)]
struct StoreInner {
    exits: BTreeMap<(u64, u64), ExitEvent>,
    epochs: HashMap<u64, u64>,
    pending_slash: BTreeSet<u64>,
    last_saved: u64,
}

impl StoreInner {
    fn insert(&mut self, events: &[ExitEvent], slash_source: Address) {
        for event in events {
            if event.sender() == slash_source {
                self.pending_slash.insert(event.id);
            }
            // An id re-extracted under a different epoch replaces the old
            // record.
            if let Some(old_epoch) = self.epochs.insert(event.id, event.epoch) {
                self.exits.remove(&(old_epoch, event.id));
            }
            self.exits.insert((event.epoch, event.id), event.clone());
        }
    }

    fn epoch(&self, epoch: u64) -> impl Iterator<Item = &ExitEvent> {
        self.exits.range((epoch, 0)..=(epoch, u64::MAX)).map(|(_, event)| event)
    }

    fn remove_slash(&mut self, ids: &[u64]) {
        ids.iter().for_each(|id| {
            self.pending_slash.remove(id);
        });
    }
}

impl MemoryExitStore {
    /// Create an empty store. Exits sent by `slash_source` are tracked as
    /// pending slash exits.
    pub fn new(slash_source: Address) -> Self {
        Self { inner: Arc::new(RwLock::new(StoreInner::default())), slash_source }
    }

    /// Get the slashing source address.
    pub const fn slash_source(&self) -> Address {
        self.slash_source
    }

    /// Number of stored exit events.
    pub fn len(&self) -> usize {
        self.inner.read().exits.len()
    }

    /// True if no exit events are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().exits.is_empty()
    }
}

impl ExitEventStore for MemoryExitStore {
    fn insert_exit_events(&self, events: &[ExitEvent]) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }
        self.inner.write().insert(events, self.slash_source);
        Ok(())
    }

    fn exit_events_by_epoch(&self, epoch: u64) -> Result<Vec<ExitEvent>, StoreError> {
        Ok(self.inner.read().epoch(epoch).cloned().collect())
    }

    fn exit_events_for_proof(
        &self,
        epoch: u64,
        max_block: u64,
    ) -> Result<Vec<ExitEvent>, StoreError> {
        Ok(self
            .inner
            .read()
            .epoch(epoch)
            .filter(|event| event.block_number <= max_block)
            .cloned()
            .collect())
    }

    fn exit_event(&self, id: u64) -> Result<ExitEvent, StoreError> {
        let inner = self.inner.read();
        inner
            .epochs
            .get(&id)
            .and_then(|epoch| inner.exits.get(&(*epoch, id)))
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    fn last_saved(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().last_saved)
    }

    fn update_last_saved(&self, block: u64) -> Result<(), StoreError> {
        self.inner.write().last_saved = block;
        Ok(())
    }

    fn remove_slash_exit_events(&self, ids: &[u64]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.inner.write().remove_slash(ids);
        Ok(())
    }

    fn pending_slash_exit_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.inner.read().pending_slash.iter().copied().collect())
    }

    fn commit_block(
        &self,
        block: u64,
        exits: &[ExitEvent],
        slashed_ids: &[u64],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.insert(exits, self.slash_source);
        inner.last_saved = block;
        inner.remove_slash(slashed_ids);
        trace!(block, exits = exits.len(), slashed = slashed_ids.len(), "committed block");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::test_utils::{
        test_exit as exit, EXIT_SOURCE_ADDRESS, SLASH_SOURCE_ADDRESS,
    };

    fn store() -> MemoryExitStore {
        MemoryExitStore::new(SLASH_SOURCE_ADDRESS)
    }

    #[test]
    fn epochs_are_ordered_by_id() {
        let store = store();
        store
            .insert_exit_events(&[
                exit(5, 2, 20, EXIT_SOURCE_ADDRESS),
                exit(1, 1, 10, EXIT_SOURCE_ADDRESS),
                exit(3, 2, 18, EXIT_SOURCE_ADDRESS),
                exit(4, 3, 30, EXIT_SOURCE_ADDRESS),
            ])
            .unwrap();

        let ids = |events: Vec<ExitEvent>| events.into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(store.exit_events_by_epoch(2).unwrap()), vec![3, 5]);
        assert_eq!(ids(store.exit_events_by_epoch(1).unwrap()), vec![1]);
        assert!(store.exit_events_by_epoch(9).unwrap().is_empty());
        assert_eq!(ids(store.exit_events_for_proof(2, 19).unwrap()), vec![3]);
        assert_eq!(ids(store.exit_events_for_proof(2, 20).unwrap()), vec![3, 5]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn lookup_by_id() {
        let store = store();
        store.insert_exit_events(&[exit(7, 4, 40, EXIT_SOURCE_ADDRESS)]).unwrap();

        assert_eq!(store.exit_event(7).unwrap().epoch, 4);
        let err = store.exit_event(8).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, StoreError::NotFound { id: 8 }));
    }

    #[test]
    fn empty_insert_is_noop() {
        let store = store();
        store.insert_exit_events(&[]).unwrap();
        assert!(store.is_empty());
        assert!(store.pending_slash_exit_ids().unwrap().is_empty());
    }

    #[test]
    fn watermark() {
        let store = store();
        assert_eq!(store.last_saved().unwrap(), 0);
        store.update_last_saved(12).unwrap();
        assert_eq!(store.last_saved().unwrap(), 12);
    }

    #[test]
    fn slash_exits_are_queued_and_removed() {
        let store = store();
        store
            .insert_exit_events(&[
                exit(5, 1, 10, SLASH_SOURCE_ADDRESS),
                exit(6, 1, 10, EXIT_SOURCE_ADDRESS),
                exit(7, 1, 11, SLASH_SOURCE_ADDRESS),
            ])
            .unwrap();
        assert_eq!(store.pending_slash_exit_ids().unwrap(), vec![5, 7]);

        store.remove_slash_exit_events(&[5, 7]).unwrap();
        store.remove_slash_exit_events(&[5]).unwrap();
        assert!(store.pending_slash_exit_ids().unwrap().is_empty());
        // the exits themselves stay provable
        assert_eq!(store.exit_event(5).unwrap().id, 5);
    }

    #[test]
    fn commit_block_applies_everything() {
        let store = store();
        store.insert_exit_events(&[exit(1, 1, 3, SLASH_SOURCE_ADDRESS)]).unwrap();

        store
            .commit_block(
                8,
                &[exit(2, 1, 8, EXIT_SOURCE_ADDRESS), exit(3, 1, 8, SLASH_SOURCE_ADDRESS)],
                &[1],
            )
            .unwrap();

        assert_eq!(store.last_saved().unwrap(), 8);
        assert_eq!(store.exit_events_by_epoch(1).unwrap().len(), 3);
        assert_eq!(store.pending_slash_exit_ids().unwrap(), vec![3]);
    }

    #[test]
    fn reinsert_moves_epoch() {
        let store = store();
        store.insert_exit_events(&[exit(1, 1, 5, EXIT_SOURCE_ADDRESS)]).unwrap();
        store.insert_exit_events(&[exit(1, 2, 6, EXIT_SOURCE_ADDRESS)]).unwrap();

        assert!(store.exit_events_by_epoch(1).unwrap().is_empty());
        assert_eq!(store.exit_event(1).unwrap().epoch, 2);
        assert_eq!(store.len(), 1);
    }
}
