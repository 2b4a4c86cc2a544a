use alloy::primitives::{keccak256, B256};
use bridge_types::ExitEvent;

/// Errors building or querying an [`ExitTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A tree needs at least one leaf.
    #[error("cannot build a tree without leaves")]
    Empty,
    /// The requested leaf does not exist.
    #[error("leaf index {index} out of bounds for {len} leaves")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of leaves in the tree.
        len: usize,
    },
}

/// A binary keccak Merkle tree over exit leaves.
///
/// Leaves are hashed with keccak256 and the leaf layer is padded with zero
/// hashes up to the next power of two. Each parent is the hash of its two
/// children concatenated, left first. The tree over a single leaf has that
/// leaf's hash as its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitTree {
    /// Hash layers, leaves first. The last layer holds the root alone.
    layers: Vec<Vec<B256>>,
    /// Number of leaves before padding.
    leaf_count: usize,
}

impl ExitTree {
    /// Build a tree over raw leaf bytes, in the given order.
    pub fn new<I, T>(leaves: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut layer: Vec<B256> = leaves.into_iter().map(keccak256).collect();
        if layer.is_empty() {
            return Err(TreeError::Empty);
        }
        let leaf_count = layer.len();
        layer.resize(leaf_count.next_power_of_two(), B256::ZERO);

        let mut layers = vec![layer];
        while let Some(last) = layers.last().filter(|layer| layer.len() > 1) {
            let next = last.chunks_exact(2).map(|pair| hash_pair(pair[0], pair[1])).collect();
            layers.push(next);
        }

        Ok(Self { layers, leaf_count })
    }

    /// Build the tree of an epoch. Events must be sorted by ascending id.
    pub fn from_exit_events(events: &[ExitEvent]) -> Result<Self, TreeError> {
        Self::new(events.iter().map(ExitEvent::leaf))
    }

    /// The root hash.
    pub fn root(&self) -> B256 {
        self.layers.last().and_then(|layer| layer.first()).copied().unwrap_or_default()
    }

    /// Number of leaves, excluding padding.
    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Depth of the tree, i.e. the length of every proof.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Find the position of a leaf.
    pub fn leaf_index(&self, leaf: &[u8]) -> Option<usize> {
        let hash = keccak256(leaf);
        self.layers[0][..self.leaf_count].iter().position(|h| *h == hash)
    }

    /// Generate the inclusion proof of a leaf: its sibling at every level,
    /// leaf level first.
    pub fn proof(&self, index: usize) -> Result<Vec<B256>, TreeError> {
        if index >= self.leaf_count {
            return Err(TreeError::IndexOutOfBounds { index, len: self.leaf_count });
        }

        Ok(self.layers[..self.depth()]
            .iter()
            .enumerate()
            .map(|(level, layer)| layer[(index >> level) ^ 1])
            .collect())
    }
}

/// Check an inclusion proof of `leaf` at `index` against `root`.
pub fn verify_proof(leaf: &[u8], index: u64, proof: &[B256], root: B256) -> bool {
    if proof.len() > 64 || (proof.len() < 64 && index >> proof.len() != 0) {
        return false;
    }

    let computed = proof.iter().enumerate().fold(keccak256(leaf), |node, (level, sibling)| {
        if (index >> level) & 1 == 1 {
            hash_pair(*sibling, node)
        } else {
            hash_pair(node, *sibling)
        }
    });
    computed == root
}

fn hash_pair(left: B256, right: B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    keccak256(buf)
}
