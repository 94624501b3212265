//! Engine error taxonomy. The engine never panics on a bad caller request;
//! every fallible operation returns a `Result`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All recoverable and fatal errors the engine can raise.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum EngineError {
    #[error("stacking violation: {reason}")]
    StackingViolation { reason: String },

    #[error("no pieces available: need {needed} {kind}, have {available}")]
    NoAvailable {
        kind: String,
        needed: u32,
        available: u32,
    },

    #[error("not present: {reason}")]
    NotPresent { reason: String },

    #[error("cannot remove the permanent Fort from Provincia")]
    PermanentFortProtection,

    #[error("proximity violation: {reason}")]
    ProximityViolation { reason: String },

    #[error("resource shortfall: need {needed}, have {available}")]
    ResourceShortfall { needed: u32, available: u32 },

    #[error("forbidden under Frost: {reason}")]
    FrostRestriction { reason: String },

    #[error("eligibility violation: {reason}")]
    EligibilityViolation { reason: String },

    #[error("unknown piece kind: {0}")]
    UnknownPieceKind(String),

    #[error("unknown leader: {0}")]
    UnknownLeader(String),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("cap exceeded: {reason}")]
    CapExceeded { reason: String },

    #[error("invalid action: {reason}")]
    InvalidAction { reason: String },

    #[error("invariant violation: {0:?}")]
    InvariantViolation(Vec<String>),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
