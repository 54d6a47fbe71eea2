//! Error taxonomy for proof evaluation.
//!
//! Malformed witnesses (wrong sibling count) are fatal in both API forms:
//! the algorithm never runs on them. Structural and semantic failures are
//! reported as `false` by the flag forms and as one of the variants below by
//! the strict forms.

use thiserror::Error;

/// Errors raised by the verifier and processor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtError {
    /// The witness sibling array does not match the configured tree depth.
    #[error("witness carries {got} siblings, expected {expected}")]
    SiblingCount { expected: usize, got: usize },

    /// The insertion-level detector rejected the sibling array: either the
    /// deepest sibling is non-zero or no unique insertion level exists.
    #[error("no unique insertion level in the sibling array")]
    InsertionLevel,

    /// The per-level automaton did not end in exactly one state at the leaf
    /// level.
    #[error("leaf-level state is not uniquely determined")]
    StateSum,

    /// An exclusion proof presented the claimed-absent key as its own
    /// blocking neighbour, or an update targeted a different key than it
    /// read.
    #[error("key reuse between old and new leaf")]
    KeyReuse,

    /// The reconstructed root does not equal the caller-supplied root.
    #[error("reconstructed root does not match the supplied root")]
    RootMismatch,
}
