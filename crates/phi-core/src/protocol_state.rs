use std::fmt;

/// States of a single resolve-and-verify run.
///
/// Transitions only move forward:
/// - Start → Resolving
/// - Resolving → Resolved | ResolutionFailed
/// - Resolved → Validating
/// - Validating → StructurallyValid | StructurallyInvalid
/// - StructurallyValid → VerifyingProof
/// - VerifyingProof → Accepted | Rejected
///
/// A subject mismatch short-circuits `Start → Rejected` before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProtocolState {
    Start,
    Resolving,
    Resolved,
    ResolutionFailed,
    Validating,
    StructurallyValid,
    StructurallyInvalid,
    VerifyingProof,
    Accepted,
    Rejected,
}

impl ProtocolState {
    /// Whether the run ends in this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed | Self::StructurallyInvalid | Self::Accepted | Self::Rejected
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: ProtocolState) -> bool {
        use ProtocolState::*;
        matches!(
            (self, next),
            (Start, Resolving)
                | (Start, Rejected)
                | (Resolving, Resolved)
                | (Resolving, ResolutionFailed)
                | (Resolved, Validating)
                | (Validating, StructurallyValid)
                | (Validating, StructurallyInvalid)
                | (StructurallyValid, VerifyingProof)
                | (StructurallyValid, Rejected)
                | (VerifyingProof, Accepted)
                | (VerifyingProof, Rejected)
        )
    }
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "Start",
            Self::Resolving => "Resolving",
            Self::Resolved => "Resolved",
            Self::ResolutionFailed => "ResolutionFailed",
            Self::Validating => "Validating",
            Self::StructurallyValid => "StructurallyValid",
            Self::StructurallyInvalid => "StructurallyInvalid",
            Self::VerifyingProof => "VerifyingProof",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        };
        f.write_str(name)
    }
}
