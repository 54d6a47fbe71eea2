//! Hash collaborator seam and the tree hash-chain contracts.
//!
//! The core never implements a hash function; it consumes one through
//! [`TreeHasher`] and wraps it in the two tree-specific contracts: the
//! domain-tagged leaf hash and the ordered two-child node hash.

use ark_bn254::Fr;
use ark_ff::One;

/// A fixed-arity hash over field elements, injected at construction time.
///
/// Implementations must be deterministic and safe for concurrent read-only
/// use: `hash` takes `&self` and must not buffer state across calls. The
/// tree invokes it with two elements (node hash) or three (leaf hash).
pub trait TreeHasher {
    fn hash(&self, inputs: &[Fr]) -> Fr;
}

impl<T: TreeHasher + ?Sized> TreeHasher for &T {
    fn hash(&self, inputs: &[Fr]) -> Fr {
        (**self).hash(inputs)
    }
}

/// Left/right assignment from a path bit: the descending child sits left
/// when the bit is clear, right when it is set. Hashing stays
/// order-sensitive per level; this is not the sorted-pair convention some
/// flat Merkle variants use.
pub fn ordered_pair(path_bit: bool, child: Fr, sibling: Fr) -> (Fr, Fr) {
    if path_bit {
        (sibling, child)
    } else {
        (child, sibling)
    }
}

/// The leaf and node hash contracts over an injected hasher.
#[derive(Clone, Debug)]
pub struct HashChain<H: TreeHasher> {
    hasher: H,
}

impl<H: TreeHasher> HashChain<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Leaf commitment: `H(key, value, 1)`. The trailing constant is the
    /// domain tag separating leaves from internal nodes; externally stored
    /// trees depend on it exactly.
    pub fn leaf_hash(&self, key: Fr, value: Fr) -> Fr {
        self.hasher.hash(&[key, value, Fr::one()])
    }

    /// Internal node: `H(left, right)`.
    pub fn node_hash(&self, left: Fr, right: Fr) -> Fr {
        self.hasher.hash(&[left, right])
    }
}

/// Boolean selection weight for the branchless reconstruction.
pub(crate) fn weight(active: bool) -> Fr {
    Fr::from(active as u64)
}
