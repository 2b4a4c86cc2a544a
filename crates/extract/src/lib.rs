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

//! Contains logic for extracting bridge events from finalized blocks.

mod error;
pub use error::ExtractError;

mod events;
pub use events::BridgeEvent;

mod extractor;
pub use extractor::Extractor;

mod r#trait;
pub use r#trait::BlockchainBackend;
