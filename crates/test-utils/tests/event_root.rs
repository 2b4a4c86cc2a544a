use alloy::primitives::{Address, B256};
use bridge_checkpoint::{verify_proof, ExitTree};
use bridge_store::ExitEventStore;
use bridge_test_utils::{
    chain::TestChain, relayer::MockRelayer, specs::exit_event, test_manager, TestManager,
};
use bridge_types::ExitEvent;
use proptest::prelude::*;
use std::sync::Arc;

fn manager() -> TestManager {
    test_manager(Arc::new(TestChain::new()), MockRelayer::new())
}

fn exit(id: u64, epoch: u64) -> ExitEvent {
    ExitEvent::new(id, epoch, id, exit_event(id, Address::repeat_byte(id as u8), b"payload"))
}

#[test]
fn empty_epoch_has_zero_root() {
    let manager = manager();
    assert_eq!(manager.build_event_root(1).unwrap(), B256::ZERO);

    manager.store().insert_exit_events(&[exit(1, 2)]).unwrap();
    assert_eq!(manager.build_event_root(1).unwrap(), B256::ZERO);
    assert_ne!(manager.build_event_root(2).unwrap(), B256::ZERO);
}

#[test]
fn epochs_have_independent_roots() {
    let manager = manager();
    let first: Vec<_> = (1..=3).map(|id| exit(id, 1)).collect();
    let second: Vec<_> = (4..=5).map(|id| exit(id, 2)).collect();
    manager.store().insert_exit_events(&first).unwrap();
    manager.store().insert_exit_events(&second).unwrap();

    assert_eq!(
        manager.build_event_root(1).unwrap(),
        ExitTree::from_exit_events(&first).unwrap().root()
    );
    assert_eq!(
        manager.build_event_root(2).unwrap(),
        ExitTree::from_exit_events(&second).unwrap().root()
    );
}

proptest! {
    #[test]
    fn prop_root_ignores_insertion_order(
        ids in Just((1..=12u64).collect::<Vec<_>>()).prop_shuffle(),
        count in 1..=12usize,
    ) {
        let manager = manager();
        for id in ids.iter().copied().filter(|id| *id <= count as u64) {
            manager.store().insert_exit_events(&[exit(id, 1)]).unwrap();
        }

        let sorted: Vec<_> = (1..=count as u64).map(|id| exit(id, 1)).collect();
        let tree = ExitTree::from_exit_events(&sorted).unwrap();
        let root = manager.build_event_root(1).unwrap();
        prop_assert_eq!(root, tree.root());

        for (index, event) in sorted.iter().enumerate() {
            let proof = tree.proof(index).unwrap();
            prop_assert!(verify_proof(&event.leaf(), index as u64, &proof, root));
        }
    }
}
