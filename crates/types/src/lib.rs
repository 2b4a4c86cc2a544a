//! Checkpoint bridge types and utilities used throughout the workspace.

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

mod block;
pub use block::{FinalizedBlock, PostBlockRequest};

mod checkpoint;
pub use checkpoint::{Checkpoint, EncodeError};

pub mod config;
pub use config::{BridgeConstants, ConfigError};

mod exit;
pub use exit::{ExitEvent, SlashedEvent};

mod extra;
pub use extra::{
    CheckpointData, CommittedSeal, ConsensusExtra, ExtraError, ValidatorMetadata,
    ValidatorSetDelta, EXTRA_VANITY,
};

mod proof;
pub use proof::ExitProof;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
