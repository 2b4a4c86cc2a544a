use crate::test_constants::test_validator;
use bridge_checkpoint::ValidatorSource;
use bridge_types::ValidatorMetadata;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Errors returned by [`MockValidators`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorsError {
    /// No validator set is known for this block.
    #[error("no validator set for block {0}")]
    NotFound(u64),
}

#[derive(Debug)]
struct Sets {
    default: Option<Vec<ValidatorMetadata>>,
    by_block: BTreeMap<u64, Vec<ValidatorMetadata>>,
}

/// A [`ValidatorSource`] with a default validator set and per-block
/// overrides.
#[derive(Debug, Clone)]
pub struct MockValidators {
    sets: Arc<Mutex<Sets>>,
}

impl Default for MockValidators {
    /// Four validators, keyed `0x01` to `0x04`.
    fn default() -> Self {
        Self::new((1..=4).map(test_validator).collect())
    }
}

impl MockValidators {
    /// Create a source returning `validators` for every block.
    pub fn new(validators: Vec<ValidatorMetadata>) -> Self {
        Self::from_default(Some(validators))
    }

    /// Create a source that knows no validator set.
    pub fn empty() -> Self {
        Self::from_default(None)
    }

    fn from_default(default: Option<Vec<ValidatorMetadata>>) -> Self {
        Self { sets: Arc::new(Mutex::new(Sets { default, by_block: BTreeMap::new() })) }
    }

    /// Override the validator set returned for `block`.
    pub fn set(&self, block: u64, validators: Vec<ValidatorMetadata>) {
        self.sets.lock().unwrap().by_block.insert(block, validators);
    }
}

impl ValidatorSource for MockValidators {
    type Error = ValidatorsError;

    fn validators(&self, block: u64) -> Result<Vec<ValidatorMetadata>, Self::Error> {
        let sets = self.sets.lock().unwrap();
        sets.by_block
            .get(&block)
            .or(sets.default.as_ref())
            .cloned()
            .ok_or(ValidatorsError::NotFound(block))
    }
}
