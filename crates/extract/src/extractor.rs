use crate::{BlockchainBackend, BridgeEvent, ExtractError};
use alloy::{
    consensus::{Header, Receipt},
    primitives::{Log, U256},
    sol_types::SolEvent,
};
use bridge_contracts::{L2StateSender::L2StateSynced, ValidatorSet::Slashed};
use bridge_types::{BridgeConstants, ConsensusExtra, ExitEvent, FinalizedBlock, SlashedEvent};
use tracing::{debug, instrument, trace};

/// Extracts bridge events from finalized blocks.
///
/// The extractor is a newtype around the [`BridgeConstants`], which contain
/// the addresses of the contracts whose logs the bridge consumes. Logs from
/// any other address, and logs of failed transactions, are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    constants: BridgeConstants,
}

impl From<BridgeConstants> for Extractor {
    fn from(constants: BridgeConstants) -> Self {
        Self { constants }
    }
}

impl From<Extractor> for BridgeConstants {
    fn from(extractor: Extractor) -> Self {
        extractor.constants
    }
}

impl Extractor {
    /// Create a new [`Extractor`] from bridge constants.
    pub const fn new(constants: BridgeConstants) -> Self {
        Self { constants }
    }

    /// Get the bridge constants.
    pub const fn constants(&self) -> &BridgeConstants {
        &self.constants
    }

    /// Extract the events of every block after `last_processed`, up to and
    /// including `block`.
    ///
    /// Intervening blocks are loaded from the backend. The newly finalized
    /// block is taken as given, since the backend may not know it yet.
    /// Events are returned in block and log order.
    #[instrument(skip_all, fields(last_processed = last_processed, block = block.number()))]
    pub fn extract_range<B: BlockchainBackend>(
        &self,
        backend: &B,
        last_processed: u64,
        block: &FinalizedBlock,
    ) -> Result<Vec<BridgeEvent>, ExtractError> {
        let mut events = Vec::new();

        for number in last_processed.saturating_add(1)..block.number() {
            let header =
                backend.header_by_number(number).ok_or(ExtractError::MissingBlock(number))?;
            let receipts = backend
                .receipts_by_hash(header.hash())
                .map_err(|e| ExtractError::Receipts { number, source: Box::new(e) })?;
            self.extract_block(backend, &header, &receipts, &mut events)?;
        }
        self.extract_block(backend, &block.header, &block.receipts, &mut events)?;

        debug!(count = events.len(), "extracted bridge events");
        Ok(events)
    }

    /// Extract the events of a single block, appending them to `events`.
    ///
    /// The consensus metadata of the block is only decoded if the block
    /// contains an exit.
    pub fn extract_block<B: BlockchainBackend>(
        &self,
        backend: &B,
        header: &Header,
        receipts: &[Receipt],
        events: &mut Vec<BridgeEvent>,
    ) -> Result<(), ExtractError> {
        let mut extra = None;

        let logs = receipts
            .iter()
            .filter(|receipt| receipt.status.coerce_status())
            .flat_map(|receipt| receipt.logs.iter())
            .filter(|log| self.constants.is_watched(log.address));

        for log in logs {
            if let Some(event) = self.extract_log(backend, header, &mut extra, log)? {
                events.push(event);
            }
        }
        Ok(())
    }

    fn extract_log<B: BlockchainBackend>(
        &self,
        backend: &B,
        header: &Header,
        extra: &mut Option<ConsensusExtra>,
        log: &Log,
    ) -> Result<Option<BridgeEvent>, ExtractError> {
        let Some(topic) = log.topics().first() else {
            return Ok(None);
        };

        if *topic == L2StateSynced::SIGNATURE_HASH {
            let decoded = match extra.take() {
                Some(decoded) => decoded,
                None => backend
                    .decode_extra(header)
                    .map_err(|source| ExtractError::Extra { number: header.number, source })?,
            };
            let exit = decode_exit(header.number, &decoded, log);
            *extra = Some(decoded);
            exit.map(|e| Some(e.into()))
        } else if *topic == Slashed::SIGNATURE_HASH {
            decode_slashed(header.number, log).map(|e| Some(e.into()))
        } else {
            trace!(%topic, "skipping unknown log");
            Ok(None)
        }
    }
}

/// Decode an exit log. Exits emitted in an epoch-ending block belong to the
/// tree of the next epoch, at the next block.
fn decode_exit(number: u64, extra: &ConsensusExtra, log: &Log) -> Result<ExitEvent, ExtractError> {
    let event = L2StateSynced::decode_log_data(&log.data).map_err(|source| {
        ExtractError::Decode { kind: "L2StateSynced", number, source }
    })?;
    let id = to_u64("L2StateSynced", event.id)?;

    let (epoch, block_number) = if extra.is_end_of_epoch() {
        (extra.epoch() + 1, number + 1)
    } else {
        (extra.epoch(), number)
    };

    Ok(ExitEvent::new(id, epoch, block_number, event))
}

fn decode_slashed(number: u64, log: &Log) -> Result<SlashedEvent, ExtractError> {
    let event = Slashed::decode_log_data(&log.data)
        .map_err(|source| ExtractError::Decode { kind: "Slashed", number, source })?;
    to_u64("Slashed", event.exit_id()).map(SlashedEvent::new)
}

fn to_u64(kind: &'static str, value: U256) -> Result<u64, ExtractError> {
    value.try_into().map_err(|_| ExtractError::IdOverflow { kind, value })
}
