//! Mock collaborators, fakes and block builders for testing the checkpoint
//! bridge.

pub mod chain;
pub mod relayer;
pub mod specs;
pub mod store;
pub mod validators;

pub use bridge_types::test_utils as test_constants;

use bridge_checkpoint::CheckpointManager;
use bridge_store::MemoryExitStore;
use std::sync::Arc;
use test_constants::{SLASH_SOURCE_ADDRESS, TEST_CONSTANTS, TEST_SIGNER_ADDRESS};
use tracing_subscriber::EnvFilter;

/// A [`CheckpointManager`] wired to the mocks of this crate.
pub type TestManager = CheckpointManager<
    Arc<chain::TestChain>,
    validators::MockValidators,
    relayer::MockRelayer,
    MemoryExitStore,
>;

/// Build a [`TestManager`] for the test signer over the given chain and
/// relayer, with the default validator set and an empty store.
pub fn test_manager(chain: Arc<chain::TestChain>, relayer: relayer::MockRelayer) -> TestManager {
    CheckpointManager::new(
        TEST_SIGNER_ADDRESS,
        TEST_CONSTANTS,
        chain,
        validators::MockValidators::default(),
        relayer,
        MemoryExitStore::new(SLASH_SOURCE_ADDRESS),
    )
}

/// Install a tracing subscriber for tests, honoring `RUST_LOG`. Safe to call
/// more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
