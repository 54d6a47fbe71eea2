//! MiMC7 tree hasher over BN254.
//!
//! The alternative round-function hash collaborator: 91 rounds of the x^7
//! round function with Keccak256-derived round constants, combined over
//! multiple inputs with the Miyaguchi-Preneel construction (field addition
//! in place of XOR). Interchangeable with [`crate::poseidon::PoseidonHasher`]
//! behind [`TreeHasher`].

use ark_bn254::Fr;
use ark_ff::{PrimeField, Zero};
use sha3::{Digest, Keccak256};

use crate::hasher::TreeHasher;

const N_ROUNDS: usize = 91;
const SEED: &[u8] = b"mimc7_seed";

/// MiMC7 hash collaborator.
///
/// Round constants are derived once at construction; `hash` is stateless
/// per call and safe for concurrent use.
#[derive(Clone)]
pub struct Mimc7Hasher {
    constants: Vec<Fr>,
}

impl Mimc7Hasher {
    pub fn new() -> Self {
        Self {
            constants: round_constants(N_ROUNDS),
        }
    }

    /// One MiMC7 encryption of `message` under the running key `key`.
    fn encrypt(&self, message: Fr, key: Fr) -> Fr {
        let mut x = message;
        for c in &self.constants {
            x = pow7(x + key + c);
        }
        x + key
    }
}

impl Default for Mimc7Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeHasher for Mimc7Hasher {
    fn hash(&self, inputs: &[Fr]) -> Fr {
        let mut h = Fr::zero();
        for &m in inputs {
            h += self.encrypt(m, h) + m;
        }
        h
    }
}

fn pow7(x: Fr) -> Fr {
    let x2 = x * x;
    let x4 = x2 * x2;
    x4 * x2 * x
}

/// Keccak256 chain from the fixed seed, each link reduced into the field.
/// The first constant is zero by convention.
fn round_constants(rounds: usize) -> Vec<Fr> {
    let mut constants = Vec::with_capacity(rounds);
    constants.push(Fr::zero());
    let mut digest = Keccak256::digest(SEED);
    for _ in 1..rounds {
        digest = Keccak256::digest(&digest);
        constants.push(Fr::from_be_bytes_mod_order(&digest));
    }
    constants
}
