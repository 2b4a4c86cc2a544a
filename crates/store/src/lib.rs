#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Storage of exit events, pending slash exits, and the last processed block.
//!
//! [`MemoryExitStore`] keeps everything in memory. [`RocksExitStore`] (behind
//! the default `rocksdb` feature) persists to RocksDB and commits each block
//! in a single write batch.

mod error;
pub use error::StoreError;

mod memory;
pub use memory::MemoryExitStore;

#[cfg(feature = "rocksdb")]
mod rocks;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksExitStore;

mod r#trait;
pub use r#trait::ExitEventStore;
