use alloy::primitives::U256;
use bridge_checkpoint::{CheckpointError, CheckpointManager};
use bridge_store::MemoryExitStore;
use bridge_test_utils::{
    chain::{epoch_spec, TestChain},
    relayer::MockRelayer,
    specs::BlockSpec,
    test_constants::*,
    test_manager,
    validators::MockValidators,
};
use std::sync::Arc;

#[tokio::test]
async fn catches_up_on_missed_epochs() {
    bridge_test_utils::init_tracing();

    let chain = Arc::new(TestChain::with_epochs(40, &[15, 25, 40]));
    let relayer = MockRelayer::with_cursor(10);
    let manager = test_manager(chain.clone(), relayer.clone());

    let latest = chain.block(40).unwrap();
    manager.submit_checkpoint(&latest.header, true).await.unwrap();

    assert_eq!(relayer.submitted_blocks(), vec![15, 25, 40]);
    assert_eq!(relayer.cursor(), 40);

    let submissions = relayer.submissions();
    let epochs: Vec<u64> = submissions.iter().map(|s| s.checkpoint.epoch()).collect();
    assert_eq!(epochs, vec![1, 2, 3]);
    for submission in &submissions {
        assert_eq!(submission.newValidatorSet.len(), 4);
    }
    assert_eq!(submissions[0].checkpointMetadata.blockHash, chain.block(15).unwrap().hash());
}

#[tokio::test]
async fn aborted_catch_up_is_redone_from_cursor() {
    let chain = Arc::new(TestChain::with_epochs(40, &[15, 25, 40]));
    let relayer = MockRelayer::with_cursor(10);
    let manager = test_manager(chain.clone(), relayer.clone());
    let latest = chain.block(40).unwrap();

    relayer.set_revert(true);
    let err = manager.submit_checkpoint(&latest.header, true).await.unwrap_err();
    assert!(matches!(err, CheckpointError::SubmissionFailed { block: 15 }));
    assert_eq!(relayer.submitted_blocks(), vec![15]);
    assert_eq!(relayer.cursor(), 10);

    relayer.set_revert(false);
    manager.submit_checkpoint(&latest.header, true).await.unwrap();
    assert_eq!(relayer.submitted_blocks(), vec![15, 15, 25, 40]);
    assert_eq!(relayer.cursor(), 40);
}

#[tokio::test]
async fn latest_block_need_not_be_in_backend() {
    let chain = Arc::new(TestChain::with_epochs(9, &[]));
    let relayer = MockRelayer::with_cursor(5);
    let manager = test_manager(chain.clone(), relayer.clone());

    let latest = epoch_spec(10, &[]).build();
    manager.submit_checkpoint(&latest.header, false).await.unwrap();

    assert_eq!(relayer.submitted_blocks(), vec![10]);
    assert_eq!(relayer.submissions()[0].checkpointMetadata.blockHash, latest.hash());
}

#[tokio::test]
async fn boundary_before_latest_outside_backend() {
    let chain = Arc::new(TestChain::with_epochs(9, &[9]));
    let relayer = MockRelayer::with_cursor(5);
    let manager = test_manager(chain.clone(), relayer.clone());

    let latest = epoch_spec(10, &[9]).build();
    manager.submit_checkpoint(&latest.header, false).await.unwrap();

    assert_eq!(relayer.submitted_blocks(), vec![9, 10]);
    let epochs: Vec<u64> = relayer.submissions().iter().map(|s| s.checkpoint.epoch()).collect();
    assert_eq!(epochs, vec![1, 2]);
    assert!(!relayer.submissions()[0].newValidatorSet.is_empty());
    assert!(relayer.submissions()[1].newValidatorSet.is_empty());
}

#[tokio::test]
async fn no_catch_up_when_root_chain_is_current() {
    let chain = Arc::new(TestChain::with_epochs(12, &[]));
    let relayer = MockRelayer::with_cursor(11);
    let manager = test_manager(chain.clone(), relayer.clone());

    manager.submit_checkpoint(&chain.block(12).unwrap().header, false).await.unwrap();

    let submissions = relayer.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].checkpoint.block_number(), 12);
    assert!(submissions[0].newValidatorSet.is_empty());
}

#[tokio::test]
async fn walk_within_one_epoch_sends_only_latest() {
    let chain = Arc::new(TestChain::with_epochs(30, &[10]));
    let relayer = MockRelayer::with_cursor(12);
    let manager = test_manager(chain.clone(), relayer.clone());

    manager.submit_checkpoint(&chain.block(30).unwrap().header, false).await.unwrap();

    assert_eq!(relayer.submitted_blocks(), vec![30]);
    assert_eq!(relayer.submissions()[0].checkpoint.epoch(), 2);
}

#[tokio::test]
async fn epoch_ending_checkpoint_carries_next_validator_set() {
    let chain = Arc::new(TestChain::with_epochs(10, &[10]));
    let relayer = MockRelayer::with_cursor(9);

    let validators = MockValidators::default();
    validators.set(10, vec![test_validator(0x07)]);
    let manager = CheckpointManager::new(
        TEST_SIGNER_ADDRESS,
        TEST_CONSTANTS,
        chain.clone(),
        validators,
        relayer.clone(),
        MemoryExitStore::new(SLASH_SOURCE_ADDRESS),
    );

    manager.submit_checkpoint(&chain.block(10).unwrap().header, true).await.unwrap();

    let submission = &relayer.submissions()[0];
    assert_eq!(submission.newValidatorSet.len(), 1);
    assert_eq!(submission.newValidatorSet[0].address(), test_validator(0x07).address);
    assert_eq!(submission.newValidatorSet[0].voting_power(), U256::from(100));
}

#[tokio::test]
async fn reverted_submission_is_an_error() {
    let chain = Arc::new(TestChain::with_epochs(5, &[]));
    let relayer = MockRelayer::with_cursor(4);
    relayer.set_revert(true);
    let manager = test_manager(chain.clone(), relayer.clone());

    let err = manager.submit_checkpoint(&chain.block(5).unwrap().header, false).await.unwrap_err();
    assert!(matches!(err, CheckpointError::SubmissionFailed { block: 5 }));
    assert_eq!(relayer.cursor(), 4);
}

#[tokio::test]
async fn missing_header_aborts_catch_up() {
    let chain = Arc::new(TestChain::with_epochs(20, &[5]));
    let latest = chain.block(20).unwrap();
    let sparse = Arc::new(TestChain::new());
    for number in [1, 2, 3, 20] {
        sparse.insert(chain.block(number).unwrap());
    }

    let relayer = MockRelayer::new();
    let manager = test_manager(sparse, relayer.clone());

    let err = manager.submit_checkpoint(&latest.header, false).await.unwrap_err();
    assert!(matches!(err, CheckpointError::MissingHeader(4)));
    assert!(relayer.submissions().is_empty());
}

#[tokio::test]
async fn missing_validators_abort_submission() {
    let chain = Arc::new(TestChain::with_epochs(3, &[3]));
    let relayer = MockRelayer::with_cursor(2);
    let manager = CheckpointManager::new(
        TEST_SIGNER_ADDRESS,
        TEST_CONSTANTS,
        chain.clone(),
        MockValidators::empty(),
        relayer.clone(),
        MemoryExitStore::new(SLASH_SOURCE_ADDRESS),
    );

    let err = manager.submit_checkpoint(&chain.block(3).unwrap().header, true).await.unwrap_err();
    assert!(matches!(err, CheckpointError::Validators(_)));
    assert!(relayer.submissions().is_empty());
}

#[tokio::test]
async fn unavailable_root_chain() {
    let chain = Arc::new(TestChain::with_epochs(3, &[]));
    let relayer = MockRelayer::new();
    relayer.set_unavailable(true);
    let manager = test_manager(chain.clone(), relayer);

    let err = manager.submit_checkpoint(&chain.block(3).unwrap().header, false).await.unwrap_err();
    assert!(matches!(err, CheckpointError::Relayer(_)));
    assert!(manager.reconcile_last_sent_block().await.is_err());
}

#[tokio::test]
async fn reconcile_from_root_chain() {
    let chain = Arc::new(TestChain::with_epochs(1, &[]));
    let manager = test_manager(chain, MockRelayer::with_cursor(33));

    assert_eq!(manager.last_sent_block(), 0);
    assert_eq!(manager.reconcile_last_sent_block().await.unwrap(), 33);
    assert_eq!(manager.last_sent_block(), 33);
    assert!(manager.is_checkpoint_block(43, 10, false));
}

#[test]
fn block_spec_defaults() {
    let block = BlockSpec::new(3, 1).build();
    assert_eq!(block.beneficiary(), TEST_SIGNER_ADDRESS);
    assert!(block.receipts.is_empty());
}
