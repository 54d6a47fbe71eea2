//! Per-level automata driving the root reconstruction.
//!
//! Both automata walk the levels root to leaf. They stay in `Top` while
//! descending, fire exactly once at the insertion level, and collapse into
//! the absorbing `Na` state below it. The leaf-level state must be uniquely
//! determined for a proof to be valid; the reconstruction then selects hash
//! terms by state weight rather than branching.

/// Verifier automaton states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VerifierState {
    /// Still descending towards the insertion level.
    Top,
    /// Exclusion fired against the implicit empty leaf.
    IsOld0,
    /// Exclusion fired against an occupied neighbour leaf.
    IsOld,
    /// Inclusion fired: the claimed leaf sits here.
    IsNew,
    /// Below the insertion level; contributes nothing.
    Na,
}

/// One advance of the verifier automaton.
///
/// `conflict` reports the one input combination where the level-state
/// algebra activates two states at once (inclusion mode with `is_old0`
/// set at the graft level). The doubled state weight makes the leaf-level
/// sum check fail, so callers must treat any conflict as invalid; the
/// carried state keeps the reconstruction weight the algebra assigns.
pub(crate) struct VerifierStep {
    pub state: VerifierState,
    pub conflict: bool,
}

impl VerifierState {
    pub(crate) fn initial(enabled: bool) -> Self {
        if enabled {
            VerifierState::Top
        } else {
            VerifierState::Na
        }
    }

    /// Advance one level given the level's insertion flag, the proof mode
    /// (`exclusion`) and the empty-neighbour flag.
    pub(crate) fn advance(self, lev_ins: bool, exclusion: bool, is_old0: bool) -> VerifierStep {
        let ok = |state| VerifierStep { state, conflict: false };
        match self {
            VerifierState::Top if !lev_ins => ok(VerifierState::Top),
            VerifierState::Top => match (exclusion, is_old0) {
                (true, true) => ok(VerifierState::IsOld0),
                (true, false) => ok(VerifierState::IsOld),
                (false, false) => ok(VerifierState::IsNew),
                // Inclusion with is_old0 activates both IsNew and IsOld0 in
                // the underlying algebra; IsNew carries the reconstruction
                // weight, the extra activation invalidates the proof.
                (false, true) => VerifierStep {
                    state: VerifierState::IsNew,
                    conflict: true,
                },
            },
            _ => ok(VerifierState::Na),
        }
    }

    /// Whether this state, at the leaf level, satisfies the uniqueness
    /// requirement (`Top` at the leaf means the automaton never fired).
    pub(crate) fn is_terminal(self) -> bool {
        !matches!(self, VerifierState::Top)
    }
}

/// Processor automaton states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProcessorState {
    /// Still descending towards the insertion level.
    Top,
    /// Insert into an empty slot: the new leaf replaces the implicit zero.
    Old0,
    /// Old and new key paths still agree below the graft point; the tree
    /// grows a single-child chain here.
    Bot,
    /// First level where the two key paths diverge; old and new leaf become
    /// siblings of each other.
    New1,
    /// Below the action; contributes nothing.
    Na,
    /// Update of the existing leaf in place.
    Upd,
}

impl ProcessorState {
    pub(crate) fn initial(enabled: bool) -> Self {
        if enabled {
            ProcessorState::Top
        } else {
            ProcessorState::Na
        }
    }

    /// Advance one level. `insert` is the fnc0 flag; `xor` is whether the
    /// old and new key path bits diverge at this level.
    pub(crate) fn advance(self, lev_ins: bool, insert: bool, is_old0: bool, xor: bool) -> Self {
        match self {
            ProcessorState::Top if !lev_ins => ProcessorState::Top,
            ProcessorState::Top if !insert => ProcessorState::Upd,
            ProcessorState::Top if is_old0 => ProcessorState::Old0,
            ProcessorState::Top | ProcessorState::Bot => {
                if xor {
                    ProcessorState::New1
                } else {
                    ProcessorState::Bot
                }
            }
            _ => ProcessorState::Na,
        }
    }

    /// Leaf-level uniqueness: a chain still in `Top` or `Bot` at the leaf
    /// never closed and invalidates the proof.
    pub(crate) fn is_terminal(self) -> bool {
        matches!(
            self,
            ProcessorState::Na | ProcessorState::New1 | ProcessorState::Old0 | ProcessorState::Upd
        )
    }
}
