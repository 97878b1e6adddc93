//! Versioned, checksummed table snapshots and the reconnect/recovery
//! state machine built on top of them.
#![allow(dead_code)]

mod errors;
mod recovery;
mod snapshot;
mod store;

pub use errors::SnapshotError;
pub use recovery::{DisconnectedPlayer, RecoveredTable, RecoveryManager};
pub use snapshot::{SnapshotId, SnapshotInput, SnapshotWriter, TableId, TableSnapshot};
pub use store::{InMemorySnapshotStore, SnapshotStore};
