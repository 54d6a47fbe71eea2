//! Poseidon tree hasher: a permutation-based sponge over BN254.
//!
//! One of the two interchangeable hash collaborators the tree contracts can
//! be instantiated with; see [`crate::mimc`] for the other.

mod config;

pub use config::poseidon_config;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;

use crate::hasher::TreeHasher;

/// Poseidon hash collaborator.
///
/// Holds the round parameters; every `hash` call runs a fresh sponge, so a
/// single instance is safe to share across concurrent proof evaluations.
#[derive(Clone)]
pub struct PoseidonHasher {
    config: PoseidonConfig<Fr>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self {
            config: poseidon_config(),
        }
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeHasher for PoseidonHasher {
    fn hash(&self, inputs: &[Fr]) -> Fr {
        let mut sponge = PoseidonSponge::new(&self.config);
        for input in inputs {
            sponge.absorb(input);
        }
        sponge.squeeze_field_elements(1)[0]
    }
}
