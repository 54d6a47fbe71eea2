//! Root-transition proofs: insert and update.
//!
//! The processor reconstructs two roots per witness, one for the tree
//! before the operation and one after, sharing the verifier's level sweep.
//! Inserts may grow a chain of single-child nodes while the old and new key
//! paths agree below the graft point (`Bot`), closing it at the first
//! diverging bit (`New1`); detecting that divergence correctly is what
//! keeps structurally invalid trees out.
//!
//! Flag and strict forms mirror the verifier. A disabled witness
//! (`Operation::Nop`) validates trivially and leaves the root unchanged.

use ark_bn254::Fr;
use ark_ff::Zero;
use tracing::debug;

use crate::error::SmtError;
use crate::hasher::{ordered_pair, weight, HashChain, TreeHasher};
use crate::lev_ins::level_insertion;
use crate::path::key_bits;
use crate::state::ProcessorState;
use crate::verifier::Checks;
use crate::witness::{check_depth, ProcessorLeafWitness, ProcessorWitness};

/// Result of a flag-form transition evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Whether every sub-check held.
    pub valid: bool,
    /// The root after the operation; equals the supplied old root for
    /// disabled witnesses. Meaningless when `valid` is false.
    pub new_root: Fr,
}

/// Insert/update root-transition processor for a fixed proof depth.
pub struct Processor<H: TreeHasher> {
    chain: HashChain<H>,
    depth: usize,
}

impl<H: TreeHasher> Processor<H> {
    /// Build a processor over an injected hasher and an explicit proof
    /// depth.
    pub fn new(hasher: H, depth: usize) -> Self {
        Self {
            chain: HashChain::new(hasher),
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Flag form: evaluate the transition, reporting validity and the new
    /// root.
    pub fn process_flag(&self, witness: &ProcessorWitness) -> Result<Transition, SmtError> {
        self.process_leaf_hash_flag(&self.hash_leaves(witness))
    }

    /// Strict form: the first failed sub-check aborts; on success returns
    /// the new root.
    pub fn process(&self, witness: &ProcessorWitness) -> Result<Fr, SmtError> {
        self.process_leaf_hash(&self.hash_leaves(witness))
    }

    /// Flag form over precomputed leaf commitments.
    pub fn process_leaf_hash_flag(
        &self,
        witness: &ProcessorLeafWitness,
    ) -> Result<Transition, SmtError> {
        let (checks, new_root) = self.evaluate(witness)?;
        Ok(Transition {
            valid: checks.all(),
            new_root,
        })
    }

    /// Strict form over precomputed leaf commitments.
    pub fn process_leaf_hash(&self, witness: &ProcessorLeafWitness) -> Result<Fr, SmtError> {
        let (checks, new_root) = self.evaluate(witness)?;
        checks.strict()?;
        Ok(new_root)
    }

    fn hash_leaves(&self, w: &ProcessorWitness) -> ProcessorLeafWitness {
        ProcessorLeafWitness {
            old_root: w.old_root,
            siblings: w.siblings.clone(),
            old_key: w.old_key,
            old_leaf_hash: self.chain.leaf_hash(w.old_key, w.old_value),
            is_old0: w.is_old0,
            new_key: w.new_key,
            new_leaf_hash: self.chain.leaf_hash(w.new_key, w.new_value),
            op: w.op,
        }
    }

    fn evaluate(&self, w: &ProcessorLeafWitness) -> Result<(Checks, Fr), SmtError> {
        check_depth(self.depth, &w.siblings)?;
        let (fnc0, fnc1) = w.op.flags();
        let enabled = w.op.enabled();
        debug!(depth = self.depth, op = ?w.op, "evaluating smt transition");

        let n = self.depth;
        if n == 0 {
            let mut checks = Checks::bypass();
            checks.lev_ins = !enabled;
            return Ok((checks, w.old_root));
        }

        let (lev_valid, lev_ins) = level_insertion(enabled, &w.siblings);

        let old_bits = key_bits(w.old_key, n);
        let new_bits = key_bits(w.new_key, n);
        let xor: Vec<bool> = old_bits
            .iter()
            .zip(new_bits.iter())
            .map(|(a, b)| a != b)
            .collect();

        // Root-to-leaf state sweep.
        let mut states = Vec::with_capacity(n);
        let mut cur = ProcessorState::initial(enabled);
        for i in 0..n {
            cur = cur.advance(lev_ins[i], fnc0, w.is_old0, xor[i]);
            states.push(cur);
        }
        let states_ok = states[n - 1].is_terminal();

        // Leaf-to-root reconstruction of both roots. All terms are computed
        // and selected by state weight; the old-subtree hash pairs the old
        // child with the sibling, the new-subtree hash additionally muxes
        // the two leaves into position at the divergence level.
        let mut old_child = Fr::zero();
        let mut new_child = Fr::zero();
        for i in (0..n).rev() {
            let st = states[i];
            let top = weight(st == ProcessorState::Top);
            let old0 = weight(st == ProcessorState::Old0);
            let bot = weight(st == ProcessorState::Bot);
            let new1 = weight(st == ProcessorState::New1);
            let upd = weight(st == ProcessorState::Upd);

            let (left, right) = ordered_pair(new_bits[i], old_child, w.siblings[i]);
            let old_node = self.chain.node_hash(left, right);
            let old_level = w.old_leaf_hash * (bot + new1 + upd) + old_node * top;

            let descend = new_child * (top + bot) + w.new_leaf_hash * new1;
            let beside = w.siblings[i] * top + w.old_leaf_hash * new1;
            let (left, right) = ordered_pair(new_bits[i], descend, beside);
            let new_node = self.chain.node_hash(left, right);
            let new_level = new_node * (top + bot + new1) + w.new_leaf_hash * (old0 + upd);

            old_child = old_level;
            new_child = new_level;
        }

        // The (1,1) combination swaps the reconstruction roles: the
        // supplied root must match the post-operation side and the
        // pre-operation side is returned, undoing an insert.
        let (checked, produced) = if fnc0 && fnc1 {
            (new_child, old_child)
        } else {
            (old_child, new_child)
        };
        let root_ok = !enabled || checked == w.old_root;
        let new_root = if enabled { produced } else { w.old_root };

        // An update must target the same key it read.
        let key_reuse_ok = !(!fnc0 && fnc1 && w.old_key != w.new_key);

        Ok((
            Checks {
                lev_ins: lev_valid,
                states: states_ok,
                key_reuse: key_reuse_ok,
                root: root_ok,
            },
            new_root,
        ))
    }
}
