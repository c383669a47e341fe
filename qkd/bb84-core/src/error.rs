use thiserror::Error;

use crate::phase::{Action, Phase, Role};

/// Canonical error surface for session operations.
///
/// `MalformedDocument` and `StaleWriteConflict` are recoverable by re-reading
/// the shared document; `InvalidParameter` and `LengthMismatch` are rejected
/// before any document mutation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("{role} may not {action} while the session is {phase}")]
    RoleNotPermitted {
        role: Role,
        action: Action,
        phase: Phase,
    },
    #[error("length mismatch: {0}")]
    LengthMismatch(String),
    #[error("insufficient bits: have {have}, need at least {need}")]
    InsufficientBits { have: usize, need: usize },
    #[error("malformed session document: {0}")]
    MalformedDocument(String),
    #[error("stale write: expected document version {expected}, found {found}")]
    StaleWriteConflict { expected: u64, found: u64 },
    #[error("peer unresponsive after {waited_ms} ms")]
    PeerUnresponsive { waited_ms: u64 },
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
}
