//! Inclusion and exclusion proof verification.
//!
//! A proof is evaluated in three passes over the fixed depth: the
//! insertion-level detector scans the siblings, the per-level automaton is
//! advanced root to leaf, and the root is reconstructed leaf to root by
//! chaining node hashes, selecting each level's contribution by state
//! weight. The final result combines the detector validity, the leaf-level
//! state uniqueness, the key-reuse guard and the root comparison.
//!
//! Both API shapes are provided: flag forms return the combined boolean (so
//! an enclosing check can AND it with other conditions), strict forms turn
//! the first failed check into an [`SmtError`]. A malformed witness (wrong
//! sibling count) is fatal in both shapes.

use ark_bn254::Fr;
use ark_ff::Zero;
use rayon::prelude::*;
use tracing::debug;

use crate::error::SmtError;
use crate::hasher::{ordered_pair, weight, HashChain, TreeHasher};
use crate::lev_ins::level_insertion;
use crate::path::key_bits;
use crate::state::VerifierState;
use crate::witness::{check_depth, Mode, VerifierLeafWitness, VerifierWitness};

/// Outcome of the individual sub-checks of one evaluation.
pub(crate) struct Checks {
    pub lev_ins: bool,
    pub states: bool,
    pub key_reuse: bool,
    pub root: bool,
}

impl Checks {
    pub(crate) fn bypass() -> Self {
        Checks {
            lev_ins: true,
            states: true,
            key_reuse: true,
            root: true,
        }
    }

    pub(crate) fn all(&self) -> bool {
        self.lev_ins && self.states && self.key_reuse && self.root
    }

    pub(crate) fn strict(&self) -> Result<(), SmtError> {
        if !self.lev_ins {
            return Err(SmtError::InsertionLevel);
        }
        if !self.states {
            return Err(SmtError::StateSum);
        }
        if !self.key_reuse {
            return Err(SmtError::KeyReuse);
        }
        if !self.root {
            return Err(SmtError::RootMismatch);
        }
        Ok(())
    }
}

/// Membership and non-membership proof verifier for a fixed proof depth.
pub struct Verifier<H: TreeHasher> {
    chain: HashChain<H>,
    depth: usize,
}

impl<H: TreeHasher> Verifier<H> {
    /// Build a verifier over an injected hasher and an explicit proof depth.
    pub fn new(hasher: H, depth: usize) -> Self {
        Self {
            chain: HashChain::new(hasher),
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check that `(key, value)` is present in the tree committed to by
    /// `root`.
    pub fn verify_inclusion(
        &self,
        root: Fr,
        siblings: &[Fr],
        key: Fr,
        value: Fr,
    ) -> Result<bool, SmtError> {
        self.verify_flag(
            true,
            &VerifierWitness {
                root,
                siblings: siblings.to_vec(),
                old_key: key,
                old_value: value,
                is_old0: false,
                key,
                value,
                mode: Mode::Inclusion,
            },
        )
    }

    /// Check that `key` is absent from the tree, given the neighbour leaf
    /// (`old_key`, `old_value`) blocking its slot, or `is_old0` when the
    /// slot is the implicit empty leaf.
    pub fn verify_exclusion(
        &self,
        root: Fr,
        siblings: &[Fr],
        old_key: Fr,
        old_value: Fr,
        is_old0: bool,
        key: Fr,
    ) -> Result<bool, SmtError> {
        self.verify_flag(
            true,
            &VerifierWitness {
                root,
                siblings: siblings.to_vec(),
                old_key,
                old_value,
                is_old0,
                key,
                value: Fr::zero(),
                mode: Mode::Exclusion,
            },
        )
    }

    /// Flag form: all sub-checks combined into one boolean. `enabled =
    /// false` bypasses everything and returns `true`.
    pub fn verify_flag(&self, enabled: bool, witness: &VerifierWitness) -> Result<bool, SmtError> {
        self.verify_leaf_hash_flag(enabled, &self.hash_leaves(witness))
    }

    /// Strict form: the first failed sub-check aborts with its error.
    pub fn verify(&self, enabled: bool, witness: &VerifierWitness) -> Result<(), SmtError> {
        self.verify_leaf_hash(enabled, &self.hash_leaves(witness))
    }

    /// Flag form over precomputed leaf commitments.
    pub fn verify_leaf_hash_flag(
        &self,
        enabled: bool,
        witness: &VerifierLeafWitness,
    ) -> Result<bool, SmtError> {
        Ok(self.evaluate(enabled, witness)?.all())
    }

    /// Strict form over precomputed leaf commitments.
    pub fn verify_leaf_hash(
        &self,
        enabled: bool,
        witness: &VerifierLeafWitness,
    ) -> Result<(), SmtError> {
        self.evaluate(enabled, witness)?.strict()
    }

    /// Evaluate a batch of independent witnesses in parallel. Each
    /// evaluation is pure, so no synchronization is involved.
    pub fn verify_batch(&self, witnesses: &[VerifierWitness]) -> Result<Vec<bool>, SmtError>
    where
        H: Sync,
    {
        witnesses
            .par_iter()
            .map(|w| self.verify_flag(true, w))
            .collect()
    }

    fn hash_leaves(&self, w: &VerifierWitness) -> VerifierLeafWitness {
        VerifierLeafWitness {
            root: w.root,
            siblings: w.siblings.clone(),
            old_key: w.old_key,
            old_leaf_hash: self.chain.leaf_hash(w.old_key, w.old_value),
            is_old0: w.is_old0,
            key: w.key,
            new_leaf_hash: self.chain.leaf_hash(w.key, w.value),
            mode: w.mode,
        }
    }

    fn evaluate(&self, enabled: bool, w: &VerifierLeafWitness) -> Result<Checks, SmtError> {
        check_depth(self.depth, &w.siblings)?;
        debug!(depth = self.depth, mode = ?w.mode, enabled, "evaluating smt proof");

        let n = self.depth;
        if n == 0 {
            let mut checks = Checks::bypass();
            checks.lev_ins = !enabled;
            return Ok(checks);
        }

        let exclusion = w.mode.is_exclusion();
        let (lev_valid, lev_ins) = level_insertion(enabled, &w.siblings);

        // Root-to-leaf state sweep.
        let mut states = Vec::with_capacity(n);
        let mut conflict = false;
        let mut cur = VerifierState::initial(enabled);
        for &fired in &lev_ins {
            let step = cur.advance(fired, exclusion, w.is_old0);
            conflict |= step.conflict;
            cur = step.state;
            states.push(cur);
        }
        let states_ok = !conflict && states[n - 1].is_terminal();

        // Leaf-to-root reconstruction; every term is computed and selected
        // by state weight so all witnesses take the same path.
        let bits = key_bits(w.key, n);
        let mut child = Fr::zero();
        for i in (0..n).rev() {
            let (left, right) = ordered_pair(bits[i], child, w.siblings[i]);
            let node = self.chain.node_hash(left, right);
            child = node * weight(states[i] == VerifierState::Top)
                + w.old_leaf_hash * weight(states[i] == VerifierState::IsOld)
                + w.new_leaf_hash * weight(states[i] == VerifierState::IsNew);
        }

        // An exclusion proof cannot present the claimed-absent key as its
        // own occupied blocking neighbour.
        let key_reuse_ok = !(enabled && exclusion && !w.is_old0 && w.old_key == w.key);
        let root_ok = !enabled || child == w.root;

        Ok(Checks {
            lev_ins: lev_valid,
            states: states_ok,
            key_reuse: key_reuse_ok,
            root: root_ok,
        })
    }
}
