use crate::EncodeError;
use alloy::{
    consensus::Header,
    primitives::{Address, Bytes, B256, U256},
};
use alloy_rlp::{
    BufMut, Decodable, Encodable, Header as RlpHeader, RlpDecodable, RlpEncodable,
    EMPTY_LIST_CODE,
};
use bridge_contracts::{CheckpointManager, BLS_KEY_LEN};

/// Number of opaque bytes preceding the RLP-encoded consensus metadata in a
/// header's `extra_data`.
pub const EXTRA_VANITY: usize = 32;

/// Errors decoding consensus metadata from a header.
#[derive(Debug, thiserror::Error)]
pub enum ExtraError {
    /// The extra data cannot hold the vanity prefix.
    #[error("extra data is {len} bytes, shorter than the 32 byte vanity")]
    VanityTooShort {
        /// Length of the extra data.
        len: usize,
    },
    /// The RLP payload is malformed.
    #[error("malformed consensus extra: {0}")]
    Rlp(#[from] alloy_rlp::Error),
}

/// An aggregated validator seal over a block.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    RlpEncodable,
    RlpDecodable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct CommittedSeal {
    /// Aggregated BLS signature, an uncompressed G1 point.
    pub aggregated_signature: Bytes,
    /// Bitmap of the validators that contributed to the signature.
    pub bitmap: Bytes,
}

/// The checkpoint-relevant consensus data of a block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    RlpEncodable,
    RlpDecodable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct CheckpointData {
    /// Consensus round in which the block was finalized.
    pub block_round: u64,
    /// Epoch the block belongs to.
    pub epoch_number: u64,
    /// Hash of the validator set that signed the block.
    pub current_validators_hash: B256,
    /// Hash of the validator set of the following block.
    pub next_validators_hash: B256,
    /// Exit event root of the epoch.
    pub event_root: B256,
}

/// A validator as known to consensus.
#[derive(
    Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable, serde::Serialize, serde::Deserialize,
)]
pub struct ValidatorMetadata {
    /// Validator address.
    pub address: Address,
    /// Marshalled BLS public key, four 32-byte words.
    pub bls_key: Bytes,
    /// Voting power of the validator.
    pub voting_power: U256,
    /// Whether the validator is active.
    pub is_active: bool,
}

impl ValidatorMetadata {
    /// Split the BLS key into the four words the root chain expects.
    pub fn bls_key_words(&self) -> Result<[U256; 4], EncodeError> {
        if self.bls_key.len() != BLS_KEY_LEN {
            return Err(EncodeError::BlsKeyLength {
                address: self.address,
                expected: BLS_KEY_LEN,
                got: self.bls_key.len(),
            });
        }

        let mut words = [U256::ZERO; 4];
        words
            .iter_mut()
            .zip(self.bls_key.chunks_exact(32))
            .for_each(|(word, chunk)| *word = U256::from_be_slice(chunk));
        Ok(words)
    }

    /// Convert into the root chain representation of a validator.
    pub fn to_contract(&self) -> Result<CheckpointManager::Validator, EncodeError> {
        Ok(CheckpointManager::Validator {
            _address: self.address,
            blsKey: self.bls_key_words()?,
            votingPower: self.voting_power,
        })
    }
}

/// Changes to the validator set, present only on epoch-ending blocks.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    RlpEncodable,
    RlpDecodable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct ValidatorSetDelta {
    /// Validators joining the set.
    pub added: Vec<ValidatorMetadata>,
    /// Bitmap of the validators leaving the set.
    pub removed: Bytes,
}

/// Consensus metadata carried in a header's `extra_data`.
///
/// The extra data is [`EXTRA_VANITY`] opaque bytes followed by the RLP list
/// `[validators, parent, committed, checkpoint]`. An absent validator delta
/// is encoded as the empty list and marks a block that does not end its
/// epoch.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ConsensusExtra {
    /// Validator set changes. `Some` only on epoch-ending blocks.
    pub validators: Option<ValidatorSetDelta>,
    /// Seal over the parent block.
    pub parent: CommittedSeal,
    /// Seal over this block.
    pub committed: CommittedSeal,
    /// Checkpoint data of this block.
    pub checkpoint: CheckpointData,
}

impl ConsensusExtra {
    /// Decode the metadata from raw header extra data.
    pub fn decode_extra_data(extra_data: &[u8]) -> Result<Self, ExtraError> {
        if extra_data.len() < EXTRA_VANITY {
            return Err(ExtraError::VanityTooShort { len: extra_data.len() });
        }
        alloy_rlp::decode_exact(&extra_data[EXTRA_VANITY..]).map_err(Into::into)
    }

    /// Decode the metadata from a header.
    pub fn from_header(header: &Header) -> Result<Self, ExtraError> {
        Self::decode_extra_data(&header.extra_data)
    }

    /// Encode the metadata as header extra data, behind a zeroed vanity.
    pub fn to_extra_data(&self) -> Bytes {
        let mut out = Vec::with_capacity(EXTRA_VANITY + self.length());
        out.extend_from_slice(&[0u8; EXTRA_VANITY]);
        self.encode(&mut out);
        out.into()
    }

    /// True if the block carrying this metadata ends its epoch.
    pub const fn is_end_of_epoch(&self) -> bool {
        self.validators.is_some()
    }

    /// The epoch of the block carrying this metadata.
    pub const fn epoch(&self) -> u64 {
        self.checkpoint.epoch_number
    }

    fn payload_length(&self) -> usize {
        self.validators.as_ref().map_or(1, Encodable::length)
            + self.parent.length()
            + self.committed.length()
            + self.checkpoint.length()
    }
}

impl Encodable for ConsensusExtra {
    fn encode(&self, out: &mut dyn BufMut) {
        RlpHeader { list: true, payload_length: self.payload_length() }.encode(out);
        match &self.validators {
            Some(delta) => delta.encode(out),
            None => out.put_u8(EMPTY_LIST_CODE),
        }
        self.parent.encode(out);
        self.committed.encode(out);
        self.checkpoint.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + alloy_rlp::length_of_length(payload_length)
    }
}

impl Decodable for ConsensusExtra {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = RlpHeader::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let started = buf.len();
        if started < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }

        let validators = if buf.first() == Some(&EMPTY_LIST_CODE) {
            *buf = &buf[1..];
            None
        } else {
            Some(ValidatorSetDelta::decode(buf)?)
        };
        let parent = CommittedSeal::decode(buf)?;
        let committed = CommittedSeal::decode(buf)?;
        let checkpoint = CheckpointData::decode(buf)?;

        let consumed = started - buf.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            });
        }

        Ok(Self { validators, parent, committed, checkpoint })
    }
}
