use bridge_types::{ExitEvent, SlashedEvent};

/// Events the bridge extracts from finalized blocks.
///
/// Exit events are emitted by the exit source and end up in the epoch's
/// event root. Slashed events are emitted by the validator set contract and
/// mark a pending slash exit as processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// An exit, attributed to its epoch and block.
    Exit(ExitEvent),
    /// A processed slash exit.
    Slashed(SlashedEvent),
}

impl From<ExitEvent> for BridgeEvent {
    fn from(e: ExitEvent) -> Self {
        BridgeEvent::Exit(e)
    }
}

impl From<SlashedEvent> for BridgeEvent {
    fn from(e: SlashedEvent) -> Self {
        BridgeEvent::Slashed(e)
    }
}

impl BridgeEvent {
    /// True if this event is an [`ExitEvent`].
    pub const fn is_exit(&self) -> bool {
        matches!(self, BridgeEvent::Exit(_))
    }

    /// Fallible cast to an [`ExitEvent`].
    pub const fn as_exit(&self) -> Option<&ExitEvent> {
        match &self {
            BridgeEvent::Exit(e) => Some(e),
            _ => None,
        }
    }

    /// True if this event is a [`SlashedEvent`].
    pub const fn is_slashed(&self) -> bool {
        matches!(self, BridgeEvent::Slashed(_))
    }

    /// Fallible cast to a [`SlashedEvent`].
    pub const fn as_slashed(&self) -> Option<&SlashedEvent> {
        match &self {
            BridgeEvent::Slashed(e) => Some(e),
            _ => None,
        }
    }

    /// Split a sequence of events into exits sorted by id, and the ids of
    /// processed slash exits in discovery order.
    pub fn partition(events: impl IntoIterator<Item = Self>) -> (Vec<ExitEvent>, Vec<u64>) {
        let mut exits = Vec::new();
        let mut slashed = Vec::new();
        for event in events {
            match event {
                BridgeEvent::Exit(e) => exits.push(e),
                BridgeEvent::Slashed(e) => slashed.push(e.exit_id),
            }
        }
        exits.sort_by_key(|e| e.id);
        (exits, slashed)
    }
}
