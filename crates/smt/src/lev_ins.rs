//! Insertion-level detection.
//!
//! Given the sibling array of a proof (ordered root to leaf), finds the
//! single level at which a new leaf would be grafted: the level whose own
//! and deeper siblings are all zero while the parent level's sibling is
//! non-zero. The root level counts as having a non-zero parent, so an
//! all-zero array selects level 0.
//!
//! The deepest sibling must be zero whenever the proof is enabled; a
//! non-empty subtree below the maximum depth cannot be proven at all.

use ark_bn254::Fr;
use ark_ff::Zero;

/// Locate the insertion level in `siblings`.
///
/// Returns `(valid, lev_ins)` where `lev_ins` is a one-hot vector over the
/// levels and `valid` reports whether the array respects the tree rules:
/// the deepest sibling is zero and exactly one level is selected. With
/// `enabled == false` the result is unconditionally valid and `lev_ins` is
/// unused downstream.
pub fn level_insertion(enabled: bool, siblings: &[Fr]) -> (bool, Vec<bool>) {
    let n = siblings.len();
    let mut lev_ins = vec![false; n];
    if n < 2 {
        // A single-level (or empty) proof cannot graft anything.
        return (!enabled, lev_ins);
    }

    let is_zero: Vec<bool> = siblings.iter().map(|s| s.is_zero()).collect();

    // Walk root-ward from the deepest level, accumulating `done` so that at
    // most one level fires.
    let mut done = vec![false; n - 1];
    lev_ins[n - 1] = !is_zero[n - 2];
    done[n - 2] = lev_ins[n - 1];
    for i in (1..=n - 2).rev() {
        lev_ins[i] = !done[i] && !is_zero[i - 1];
        done[i - 1] = lev_ins[i] || done[i];
    }
    lev_ins[0] = !done[0];

    let leaf_zero = is_zero[n - 1];
    let one_hot = lev_ins.iter().filter(|b| **b).count() == 1;
    let valid = !enabled || (leaf_zero && one_hot);
    (valid, lev_ins)
}
