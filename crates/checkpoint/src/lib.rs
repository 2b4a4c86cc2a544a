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

//! Checkpoint submission to the root chain, exit event roots, and exit
//! inclusion proofs.
//!
//! The [`CheckpointManager`] is driven by the finalization hook
//! [`CheckpointManager::post_block`]. It persists the exit events of each
//! finalized block, and submits checkpoints for the blocks this node
//! produced, catching up on any checkpoint the root chain missed. Proofs
//! against submitted checkpoints are built on demand with
//! [`CheckpointManager::generate_exit_proof`].

mod error;
pub use error::CheckpointError;

mod impls;
pub use impls::{ProviderRelayer, RelayerError};

mod manager;
pub use manager::CheckpointManager;

pub mod metrics;

mod service;
pub use service::{CheckpointService, NoopCheckpointManager};

mod traits;
pub use traits::{SubmissionReceipt, TxRelayer, ValidatorSource};

mod tree;
pub use tree::{verify_proof, ExitTree, TreeError};
