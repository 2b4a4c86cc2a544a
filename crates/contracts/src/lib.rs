//! Bindings for the contracts the checkpoint bridge talks to.
//!
//! - [`CheckpointManager`] lives on the root chain and accepts checkpoints.
//! - [`L2StateSender`] emits the exit events that checkpoints commit to.
//! - [`ValidatorSet`] emits slash confirmations for previously recorded
//!   exits.

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

mod bindings;
pub use bindings::{CheckpointManager, L2StateSender, ValidatorSet};

/// Size in bytes of an uncompressed BLS aggregated signature (a G1 point).
pub const SIGNATURE_LEN: usize = 64;

/// Size in bytes of a marshalled BLS public key (a G2 point).
pub const BLS_KEY_LEN: usize = 128;
