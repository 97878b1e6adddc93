//! Append-only, hash-chained value ledger (C6) with attribution and
//! settlement recording (C7), invariant checking (C8), and the external
//! value boundaries that are the only doors chips can enter through
//! (TopUp, AdminCredit).
#![allow(dead_code)]

mod admin;
mod boundary;
mod canonical;
mod chain;
mod entry;
mod errors;
mod invariants;
mod settlement;

pub use admin::{AdminCreditIntent, AdminCreditReason, AdminCreditService};
pub use boundary::{TopUpBoundary, TopUpIntent, TopUpOutcome};
pub use chain::{Ledger, LedgerBatch};
pub use entry::{BatchId, EntryId, EntryInput, LedgerEntry, Party, Source};
pub use errors::{BoundaryError, LedgerError, SettlementError};
pub use invariants::{InvariantChecker, InvariantName, InvariantReport, Severity, Violation};
pub use settlement::{PotWinner, RakeBreakdown, SettlementAttribution, SettlementRecorder};
