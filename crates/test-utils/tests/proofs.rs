use alloy::primitives::Bytes;
use bridge_checkpoint::{verify_proof, CheckpointError, CheckpointService, ExitTree};
use bridge_store::ExitEventStore;
use bridge_test_utils::{
    chain::TestChain, relayer::MockRelayer, specs::BlockSpec, test_manager, TestManager,
};
use std::sync::Arc;

/// Finalize blocks 1..=6 of epoch 1 with exits 1 and 2 at block 2, exit 3 at
/// block 4, and exit 4 at block 6. No checkpoint is due.
fn setup() -> (MockRelayer, TestManager) {
    let chain = Arc::new(TestChain::new());
    let relayer = MockRelayer::new();
    let manager = test_manager(chain.clone(), relayer.clone());

    let specs = [
        BlockSpec::new(1, 1),
        BlockSpec::new(2, 1).exit(1, b"one").exit(2, b"two"),
        BlockSpec::new(3, 1),
        BlockSpec::new(4, 1).exit(3, b"three"),
        BlockSpec::new(5, 1),
        BlockSpec::new(6, 1).exit(4, b"four"),
    ];
    for spec in specs {
        let req = spec.to_request(100);
        chain.insert(req.block.clone());
        assert!(manager.post_block(&req).unwrap().is_none());
    }
    (relayer, manager)
}

#[tokio::test]
async fn proof_verifies_against_checkpointed_subset() {
    bridge_test_utils::init_tracing();
    let (relayer, manager) = setup();
    relayer.add_checkpoint(4);

    let proof = manager.generate_exit_proof(2).await.unwrap();
    assert_eq!(proof.checkpoint_block, 4);
    assert_eq!(proof.exit_event.id, 2);
    assert_eq!(proof.leaf_index, 1);

    // The checkpoint at block 4 committed to exits 1 through 3 only.
    let store = manager.store();
    let subset = store.exit_events_for_proof(1, 4).unwrap();
    assert_eq!(subset.len(), 3);
    let root = ExitTree::from_exit_events(&subset).unwrap().root();
    assert_ne!(root, manager.build_event_root(1).unwrap());

    let leaf = proof.exit_event.leaf();
    assert!(verify_proof(&leaf, proof.leaf_index, &proof.data, root));

    let mut tampered = proof.exit_event.clone();
    tampered.event.data = Bytes::from_static(b"tw0");
    assert!(!verify_proof(&tampered.leaf(), proof.leaf_index, &proof.data, root));
    assert!(!verify_proof(&leaf, proof.leaf_index + 1, &proof.data, root));
}

#[tokio::test]
async fn later_checkpoint_covers_all_exits() {
    let (relayer, manager) = setup();
    relayer.add_checkpoint(6);

    let root = manager.build_event_root(1).unwrap();
    for id in 1..=4 {
        let proof = manager.generate_exit_proof(id).await.unwrap();
        assert_eq!(proof.checkpoint_block, 6);
        assert!(verify_proof(&proof.exit_event.leaf(), proof.leaf_index, &proof.data, root));
    }
}

#[tokio::test]
async fn unchecked_exit_has_no_proof() {
    let (relayer, manager) = setup();
    relayer.add_checkpoint(4);

    let err = manager.generate_exit_proof(4).await.unwrap_err();
    assert!(matches!(err, CheckpointError::CheckpointNotFound { exit_id: 4 }));
    assert!(err.is_not_found());

    let err = manager.generate_exit_proof(99).await.unwrap_err();
    assert!(matches!(err, CheckpointError::Store(_)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn slash_proofs_skip_unprovable_exits() {
    let chain = Arc::new(TestChain::new());
    let relayer = MockRelayer::new();
    let manager = test_manager(chain.clone(), relayer.clone());

    let specs = [
        BlockSpec::new(1, 1).slash_exit(1),
        BlockSpec::new(2, 1),
        BlockSpec::new(3, 1).slash_exit(3),
        BlockSpec::new(4, 1).slash_exit(2),
    ];
    for spec in specs {
        let req = spec.to_request(100);
        chain.insert(req.block.clone());
        manager.post_block(&req).unwrap();
    }
    relayer.add_checkpoint(3);

    let proofs = CheckpointService::generate_slash_exit_proofs(&manager).await.unwrap();
    let ids: Vec<u64> = proofs.iter().map(|p| p.exit_event.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let root = ExitTree::from_exit_events(&manager.store().exit_events_for_proof(1, 3).unwrap())
        .unwrap()
        .root();
    for proof in &proofs {
        assert!(verify_proof(&proof.exit_event.leaf(), proof.leaf_index, &proof.data, root));
    }
}

#[tokio::test]
async fn single_exit_proof_is_empty() {
    let chain = Arc::new(TestChain::new());
    let relayer = MockRelayer::with_cursor(1);
    let manager = test_manager(chain.clone(), relayer);

    let req = BlockSpec::new(1, 1).exit(7, b"solo").to_request(100);
    chain.insert(req.block.clone());
    manager.post_block(&req).unwrap();

    let proof = manager.generate_exit_proof(7).await.unwrap();
    assert!(proof.data.is_empty());
    assert_eq!(proof.leaf_index, 0);
    assert_eq!(manager.build_event_root(1).unwrap(), proof.exit_event.leaf_hash());
}
