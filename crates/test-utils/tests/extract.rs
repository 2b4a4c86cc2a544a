use alloy::{
    consensus::Header,
    primitives::{Bytes, Sealable},
};
use bridge_extract::{BridgeEvent, ExtractError, Extractor};
use bridge_test_utils::{
    chain::TestChain,
    specs::{BlockSpec, EXIT_RECEIVER},
    test_constants::*,
};
use bridge_types::FinalizedBlock;

#[test]
fn extraction() {
    let chain = TestChain::new();
    chain.insert(BlockSpec::new(1, 1).exit(1, b"a").build());
    chain.insert(BlockSpec::new(2, 1).end_of_epoch().slash_exit(2).slashed(9).build());
    let block = BlockSpec::new(3, 2).foreign_exit(3).failed_exit(4).exit(5, b"e").build();

    let extractor = Extractor::new(TEST_CONSTANTS);
    let events = extractor.extract_range(&chain, 0, &block).unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[2].as_slashed().map(|s| s.exit_id), Some(9));

    let (exits, slashed) = BridgeEvent::partition(events);
    assert_eq!(slashed, vec![9]);

    let summary: Vec<_> = exits.iter().map(|e| (e.id, e.epoch, e.block_number)).collect();
    assert_eq!(summary, vec![(1, 1, 1), (2, 2, 3), (5, 2, 3)]);
    assert_eq!(exits[1].sender(), SLASH_SOURCE_ADDRESS);
    assert!(exits.iter().all(|e| e.receiver() == EXIT_RECEIVER));
}

#[test]
fn processed_blocks_are_skipped() {
    let chain = TestChain::new();
    chain.insert(BlockSpec::new(1, 1).exit(1, b"").build());
    let block = BlockSpec::new(2, 1).exit(2, b"").build();

    let events = Extractor::new(TEST_CONSTANTS).extract_range(&chain, 1, &block).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_exit().map(|e| e.id), Some(2));
}

#[test]
fn missing_block() {
    let chain = TestChain::new();
    let block = BlockSpec::new(2, 1).build();

    let err = Extractor::new(TEST_CONSTANTS).extract_range(&chain, 0, &block).unwrap_err();
    assert!(matches!(err, ExtractError::MissingBlock(1)));
    assert!(err.is_not_found());
}

#[test]
fn bad_extra_only_matters_with_exits() {
    let header = Header { number: 1, extra_data: Bytes::from_static(&[0; 8]), ..Default::default() };
    let spec = BlockSpec::new(1, 1).slashed(3);
    let extractor = Extractor::new(TEST_CONSTANTS);
    let chain = TestChain::new();

    let block = FinalizedBlock::new(header.clone().seal_slow(), spec.receipts.clone());
    assert_eq!(extractor.extract_range(&chain, 0, &block).unwrap().len(), 1);

    let spec = spec.exit(1, b"");
    let block = FinalizedBlock::new(header.seal_slow(), spec.receipts);
    let err = extractor.extract_range(&chain, 0, &block).unwrap_err();
    assert!(matches!(err, ExtractError::Extra { number: 1, .. }));
}
