use hl_core::Chips;

use crate::entry::Source;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger entry {sequence} failed checksum verification")]
    ChecksumMismatch { sequence: u64 },
    #[error("attempted to append an entry out of sequence: expected {expected}, got {actual}")]
    SequenceGap { expected: u64, actual: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("rake total {rake_total} does not equal the sum of its shares {computed}")]
    RakeMismatch { rake_total: Chips, computed: Chips },
    #[error("agent share {amount} is non-zero but no agentId was supplied")]
    AgentShareWithoutAgent { amount: Chips },
    #[error("settlement attribution carries no pot winners and no rake")]
    EmptyAttribution,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("required field {0} is missing")]
    MissingField(&'static str),
    #[error("intent id must be non-empty and at most 256 characters")]
    InvalidIntentId,
    #[error("intent id {0} has already been processed")]
    DuplicateIntent(String),
    #[error("amount must be a positive integer, got {0}")]
    InvalidAmount(Chips),
    #[error("target of an external credit must be a player")]
    ForbiddenTarget,
    #[error("table {0} is in active settlement; external credits are blocked until it ends")]
    ForbiddenTiming(String),
    #[error("metadata key or value \"{0}\" is forbidden in {1}: {2}")]
    ForbiddenVocabulary(String, &'static str, String),
    #[error("admin {0} is not registered")]
    UnregisteredAdmin(String),
    #[error("admin credit note must not be empty")]
    EmptyNote,
    #[error("source {0:?} may never be produced by this boundary")]
    ForbiddenSource(Source),
}
