//! Shared type aliases, identifiers, configuration, and runtime utilities
//! used across the table engine and the value ledger.
#![allow(dead_code)]

mod clock;
mod config;
mod id;
#[cfg(feature = "server")]
pub mod runtime;

pub use clock::{Clock, FixedClock, Millis, SystemClock};
pub use config::Config;
pub use id::{marker, ID};

/// Chip amounts: stack sizes, bets, pot totals, and ledger deltas.
/// Signed so that ledger deltas can represent debits.
pub type Chips = i64;
/// Seat index around the table (0-based).
pub type Position = usize;
/// Monotonic sequence number, scoped to a hand, a ledger, or a table's
/// snapshot history depending on where it appears.
pub type Sequence = u64;

#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    runtime::interrupted()
}
