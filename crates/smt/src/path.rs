//! Key-to-path decoding.
//!
//! A key addresses a leaf by its binary expansion, least-significant bit
//! first: bit `i` selects the child taken at tree level `i` (level 0 is the
//! root), `false` = left, `true` = right. Bits above the proof depth are
//! simply unused by a depth-`L` proof.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

/// Decode `depth` path bits from a key, LSB first.
///
/// The key is always a canonical field representative, so there is no error
/// condition here; requesting more bits than the field carries yields
/// `false` for the excess.
pub fn key_bits(key: Fr, depth: usize) -> Vec<bool> {
    let repr = key.into_bigint();
    (0..depth).map(|i| repr.get_bit(i)).collect()
}
