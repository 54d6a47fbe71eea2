//! Native sparse-Merkle-tree proof verification for census trees.
//!
//! This crate checks membership, non-membership and single-leaf root
//! transitions against a fixed-depth SMT root commitment, given only the
//! root, the claimed leaf and an ordered sibling path. It holds no tree:
//! an external tree implementation produces siblings and roots, and the
//! hash function is injected through [`TreeHasher`].
//!
//! - [`Verifier`]: inclusion/exclusion proofs.
//! - [`Processor`]: insert/update root-transition proofs.
//!
//! Both expose a flag form (combined boolean, composable with enclosing
//! checks) and a strict form (first failed check aborts). Evaluation is
//! pure and deterministic; independent witnesses can be checked
//! concurrently with no synchronization.

pub mod error;
pub mod hasher;
pub mod lev_ins;
pub mod mimc;
pub mod path;
pub mod poseidon;
pub mod processor;
mod state;
pub mod verifier;
pub mod witness;

#[cfg(test)]
mod tree;

pub use error::SmtError;
pub use hasher::{ordered_pair, HashChain, TreeHasher};
pub use lev_ins::level_insertion;
pub use mimc::Mimc7Hasher;
pub use path::key_bits;
pub use poseidon::PoseidonHasher;
pub use processor::{Processor, Transition};
pub use verifier::Verifier;
pub use witness::{
    Mode, Operation, ProcessorLeafWitness, ProcessorWitness, VerifierLeafWitness, VerifierWitness,
};

/// The working field of the trees: the BN254 scalar field.
pub use ark_bn254::Fr;
