use crate::{ExitEventStore, StoreError};
use alloy::primitives::Address;
use bridge_types::ExitEvent;
use core::fmt;
use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::{collections::HashMap, path::Path, sync::Arc};
use tracing::{debug, trace};

/// Exit events keyed by big-endian `(epoch, id)`, JSON values.
const EXITS: &str = "exit_events";
/// Epoch of every stored exit, keyed by big-endian id.
const EXIT_EPOCHS: &str = "exit_epochs";
/// Pending slash exit ids, big-endian keys, empty values.
const PENDING_SLASH: &str = "pending_slash_exits";
/// Scalar metadata.
const META: &str = "meta";

const LAST_SAVED_KEY: &[u8] = b"last_saved";

const COLUMNS: [&str; 4] = [EXITS, EXIT_EPOCHS, PENDING_SLASH, META];

/// An [`ExitEventStore`] persisted to RocksDB.
///
/// Every write goes through a single synced [`WriteBatch`], so a block's
/// exits, the watermark and the slash removals of [`commit_block`] land
/// together or not at all. Clones share the same database handle.
///
/// [`commit_block`]: ExitEventStore::commit_block
#[derive(Clone)]
pub struct RocksExitStore {
    db: Arc<DB>,
    slash_source: Address,
}

impl fmt::Debug for RocksExitStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RocksExitStore")
            .field("path", &self.db.path())
            .field("slash_source", &self.slash_source)
            .finish_non_exhaustive()
    }
}

impl RocksExitStore {
    /// Open the store at `path`, creating it if missing. Exits sent by
    /// `slash_source` are tracked as pending slash exits.
    pub fn open(path: impl AsRef<Path>, slash_source: Address) -> Result<Self, StoreError> {
        let mut options = Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);

        let db = DB::open_cf(&options, path.as_ref(), COLUMNS).map_err(StoreError::backend)?;
        debug!(path = %path.as_ref().display(), "opened exit event store");
        Ok(Self { db: Arc::new(db), slash_source })
    }

    /// Get the slashing source address.
    pub const fn slash_source(&self) -> Address {
        self.slash_source
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily, StoreError> {
        self.db.cf_handle(name).ok_or(StoreError::Corrupt { column: name })
    }

    fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut options = WriteOptions::default();
        options.set_sync(true);
        self.db.write_opt(batch, &options).map_err(StoreError::backend)
    }

    fn stored_epoch(&self, id: u64) -> Result<Option<u64>, StoreError> {
        self.db
            .get_cf(self.cf(EXIT_EPOCHS)?, id.to_be_bytes())
            .map_err(StoreError::backend)?
            .map(|value| decode_u64(&value, EXIT_EPOCHS))
            .transpose()
    }

    fn stage_exits(&self, batch: &mut WriteBatch, events: &[ExitEvent]) -> Result<(), StoreError> {
        let exits = self.cf(EXITS)?;
        let epochs = self.cf(EXIT_EPOCHS)?;
        let pending = self.cf(PENDING_SLASH)?;

        // Epochs staged by this batch, which reads cannot see yet.
        let mut staged = HashMap::new();

        for event in events {
            let previous = match staged.get(&event.id) {
                Some(epoch) => Some(*epoch),
                None => self.stored_epoch(event.id)?,
            };
            // An id re-extracted under a different epoch replaces the old
            // record.
            if let Some(old_epoch) = previous.filter(|epoch| *epoch != event.epoch) {
                batch.delete_cf(exits, exit_key(old_epoch, event.id));
            }

            let value = serde_json::to_vec(event).map_err(StoreError::codec)?;
            batch.put_cf(exits, exit_key(event.epoch, event.id), value);
            batch.put_cf(epochs, event.id.to_be_bytes(), event.epoch.to_be_bytes());
            if event.sender() == self.slash_source {
                batch.put_cf(pending, event.id.to_be_bytes(), b"");
            }
            staged.insert(event.id, event.epoch);
        }
        Ok(())
    }

    fn stage_slash_removal(&self, batch: &mut WriteBatch, ids: &[u64]) -> Result<(), StoreError> {
        let pending = self.cf(PENDING_SLASH)?;
        ids.iter().for_each(|id| batch.delete_cf(pending, id.to_be_bytes()));
        Ok(())
    }

    fn stage_last_saved(&self, batch: &mut WriteBatch, block: u64) -> Result<(), StoreError> {
        batch.put_cf(self.cf(META)?, LAST_SAVED_KEY, block.to_be_bytes());
        Ok(())
    }

    /// Visit the exits of an epoch in ascending id order.
    fn scan_epoch(
        &self,
        epoch: u64,
        mut keep: impl FnMut(&ExitEvent) -> bool,
    ) -> Result<Vec<ExitEvent>, StoreError> {
        let start = exit_key(epoch, 0);
        let iter =
            self.db.iterator_cf(self.cf(EXITS)?, IteratorMode::From(&start, Direction::Forward));

        let mut events = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(StoreError::backend)?;
            if key.get(..8) != Some(&start[..8]) {
                break;
            }
            let event: ExitEvent = serde_json::from_slice(&value).map_err(StoreError::codec)?;
            if keep(&event) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

impl ExitEventStore for RocksExitStore {
    fn insert_exit_events(&self, events: &[ExitEvent]) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::default();
        self.stage_exits(&mut batch, events)?;
        self.write(batch)
    }

    fn exit_events_by_epoch(&self, epoch: u64) -> Result<Vec<ExitEvent>, StoreError> {
        self.scan_epoch(epoch, |_| true)
    }

    fn exit_events_for_proof(
        &self,
        epoch: u64,
        max_block: u64,
    ) -> Result<Vec<ExitEvent>, StoreError> {
        self.scan_epoch(epoch, |event| event.block_number <= max_block)
    }

    fn exit_event(&self, id: u64) -> Result<ExitEvent, StoreError> {
        let epoch = self.stored_epoch(id)?.ok_or(StoreError::NotFound { id })?;
        let value = self
            .db
            .get_cf(self.cf(EXITS)?, exit_key(epoch, id))
            .map_err(StoreError::backend)?
            .ok_or(StoreError::NotFound { id })?;
        serde_json::from_slice(&value).map_err(StoreError::codec)
    }

    fn last_saved(&self) -> Result<u64, StoreError> {
        self.db
            .get_cf(self.cf(META)?, LAST_SAVED_KEY)
            .map_err(StoreError::backend)?
            .map_or(Ok(0), |value| decode_u64(&value, META))
    }

    fn update_last_saved(&self, block: u64) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        self.stage_last_saved(&mut batch, block)?;
        self.write(batch)
    }

    fn remove_slash_exit_events(&self, ids: &[u64]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::default();
        self.stage_slash_removal(&mut batch, ids)?;
        self.write(batch)
    }

    fn pending_slash_exit_ids(&self) -> Result<Vec<u64>, StoreError> {
        self.db
            .iterator_cf(self.cf(PENDING_SLASH)?, IteratorMode::Start)
            .map(|item| {
                let (key, _) = item.map_err(StoreError::backend)?;
                decode_u64(&key, PENDING_SLASH)
            })
            .collect()
    }

    fn commit_block(
        &self,
        block: u64,
        exits: &[ExitEvent],
        slashed_ids: &[u64],
    ) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        self.stage_exits(&mut batch, exits)?;
        self.stage_last_saved(&mut batch, block)?;
        self.stage_slash_removal(&mut batch, slashed_ids)?;
        self.write(batch)?;
        trace!(block, exits = exits.len(), slashed = slashed_ids.len(), "committed block");
        Ok(())
    }
}

fn exit_key(epoch: u64, id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&epoch.to_be_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

fn decode_u64(bytes: &[u8], column: &'static str) -> Result<u64, StoreError> {
    bytes.try_into().map(u64::from_be_bytes).map_err(|_| StoreError::Corrupt { column })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::test_utils::{test_exit, EXIT_SOURCE_ADDRESS, SLASH_SOURCE_ADDRESS};

    fn ids(events: Vec<ExitEvent>) -> Vec<u64> {
        events.into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = RocksExitStore::open(dir.path(), SLASH_SOURCE_ADDRESS).unwrap();
            assert_eq!(store.last_saved().unwrap(), 0);
            store
                .commit_block(
                    12,
                    &[
                        test_exit(3, 2, 12, EXIT_SOURCE_ADDRESS),
                        test_exit(1, 2, 11, SLASH_SOURCE_ADDRESS),
                        test_exit(2, 1, 9, SLASH_SOURCE_ADDRESS),
                    ],
                    &[2],
                )
                .unwrap();
        }

        let store = RocksExitStore::open(dir.path(), SLASH_SOURCE_ADDRESS).unwrap();
        assert_eq!(store.last_saved().unwrap(), 12);
        assert_eq!(ids(store.exit_events_by_epoch(2).unwrap()), vec![1, 3]);
        assert_eq!(ids(store.exit_events_by_epoch(1).unwrap()), vec![2]);
        assert_eq!(store.exit_event(3).unwrap(), test_exit(3, 2, 12, EXIT_SOURCE_ADDRESS));
        assert_eq!(store.pending_slash_exit_ids().unwrap(), vec![1]);
    }

    #[test]
    fn epochs_do_not_bleed() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksExitStore::open(dir.path(), SLASH_SOURCE_ADDRESS).unwrap();
        store
            .insert_exit_events(&[
                test_exit(5, 2, 20, EXIT_SOURCE_ADDRESS),
                test_exit(1, 1, 5, EXIT_SOURCE_ADDRESS),
                test_exit(3, 2, 19, EXIT_SOURCE_ADDRESS),
                test_exit(9, 3, 30, EXIT_SOURCE_ADDRESS),
            ])
            .unwrap();

        assert_eq!(ids(store.exit_events_by_epoch(2).unwrap()), vec![3, 5]);
        assert_eq!(ids(store.exit_events_for_proof(2, 19).unwrap()), vec![3]);
        assert!(store.exit_events_by_epoch(4).unwrap().is_empty());
        assert!(store.exit_event(4).unwrap_err().is_not_found());
    }

    #[test]
    fn reinsert_moves_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksExitStore::open(dir.path(), SLASH_SOURCE_ADDRESS).unwrap();
        store.insert_exit_events(&[test_exit(7, 1, 10, EXIT_SOURCE_ADDRESS)]).unwrap();
        store.insert_exit_events(&[test_exit(7, 2, 11, EXIT_SOURCE_ADDRESS)]).unwrap();

        assert!(store.exit_events_by_epoch(1).unwrap().is_empty());
        assert_eq!(store.exit_event(7).unwrap().epoch, 2);
    }

    #[test]
    fn slash_removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksExitStore::open(dir.path(), SLASH_SOURCE_ADDRESS).unwrap();
        store
            .insert_exit_events(&[
                test_exit(5, 1, 10, SLASH_SOURCE_ADDRESS),
                test_exit(7, 1, 11, SLASH_SOURCE_ADDRESS),
            ])
            .unwrap();

        store.remove_slash_exit_events(&[5, 7]).unwrap();
        store.remove_slash_exit_events(&[5]).unwrap();
        assert!(store.pending_slash_exit_ids().unwrap().is_empty());
        assert_eq!(store.exit_event(5).unwrap().id, 5);
    }
}
