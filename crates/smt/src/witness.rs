//! Flat witness records consumed by the verifier and processor.
//!
//! Siblings are ordered root to leaf and zero-padded to the fixed proof
//! depth; the surrounding tree implementation produces them. Field values
//! are canonical by construction of `Fr`.

use ark_bn254::Fr;

use crate::error::SmtError;

/// Verifier proof mode: membership (`Inclusion`) or non-membership
/// (`Exclusion`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Inclusion,
    Exclusion,
}

impl Mode {
    pub(crate) fn is_exclusion(self) -> bool {
        matches!(self, Mode::Exclusion)
    }
}

/// Operation encoded by the (fnc0, fnc1) flag pair of a processor witness.
///
/// `Delete` is the reserved (1,1) combination. The underlying algebra runs
/// it enabled with the old/new reconstruction roles swapped, which undoes an
/// insert; this behavior is inherited from the flag algebra rather than a
/// designed surface, so lean on `Insert`/`Update` where possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// (0,0): proof slot disabled, all checks bypassed.
    Nop,
    /// (1,0): graft a new leaf.
    Insert,
    /// (0,1): replace the value of an existing leaf.
    Update,
    /// (1,1): delete-equivalent, see type docs.
    Delete,
}

impl Operation {
    pub fn from_flags(fnc0: bool, fnc1: bool) -> Self {
        match (fnc0, fnc1) {
            (false, false) => Operation::Nop,
            (true, false) => Operation::Insert,
            (false, true) => Operation::Update,
            (true, true) => Operation::Delete,
        }
    }

    pub fn flags(self) -> (bool, bool) {
        match self {
            Operation::Nop => (false, false),
            Operation::Insert => (true, false),
            Operation::Update => (false, true),
            Operation::Delete => (true, true),
        }
    }

    /// Whether any checks run at all: `fnc0 OR fnc1`.
    pub fn enabled(self) -> bool {
        !matches!(self, Operation::Nop)
    }
}

/// Witness for an inclusion or exclusion proof.
///
/// For inclusion, `old_key`/`old_value` mirror `key`/`value` and `is_old0`
/// is false. For exclusion, they name the neighbour leaf blocking the
/// claimed-absent `key`, or are zero with `is_old0` set when the blocking
/// slot is the implicit empty leaf.
#[derive(Clone, Debug)]
pub struct VerifierWitness {
    pub root: Fr,
    pub siblings: Vec<Fr>,
    pub old_key: Fr,
    pub old_value: Fr,
    pub is_old0: bool,
    pub key: Fr,
    pub value: Fr,
    pub mode: Mode,
}

/// Verifier witness with precomputed leaf commitments, for callers that
/// hash leaves once and reuse them across proofs.
#[derive(Clone, Debug)]
pub struct VerifierLeafWitness {
    pub root: Fr,
    pub siblings: Vec<Fr>,
    pub old_key: Fr,
    pub old_leaf_hash: Fr,
    pub is_old0: bool,
    pub key: Fr,
    pub new_leaf_hash: Fr,
    pub mode: Mode,
}

/// Witness for a root transition (insert/update).
#[derive(Clone, Debug)]
pub struct ProcessorWitness {
    pub old_root: Fr,
    pub siblings: Vec<Fr>,
    pub old_key: Fr,
    pub old_value: Fr,
    pub is_old0: bool,
    pub new_key: Fr,
    pub new_value: Fr,
    pub op: Operation,
}

/// Processor witness with precomputed leaf commitments.
#[derive(Clone, Debug)]
pub struct ProcessorLeafWitness {
    pub old_root: Fr,
    pub siblings: Vec<Fr>,
    pub old_key: Fr,
    pub old_leaf_hash: Fr,
    pub is_old0: bool,
    pub new_key: Fr,
    pub new_leaf_hash: Fr,
    pub op: Operation,
}

/// Reject witnesses whose sibling array does not span the proof depth.
pub(crate) fn check_depth(expected: usize, siblings: &[Fr]) -> Result<(), SmtError> {
    if siblings.len() != expected {
        return Err(SmtError::SiblingCount {
            expected,
            got: siblings.len(),
        });
    }
    Ok(())
}
