//! Versioned, checksummed point-in-time captures of a table. A
//! snapshot's checksum covers everything but itself, so a tampered or
//! truncated snapshot file is detected on load rather than silently
//! accepted.
use sha2::{Digest, Sha256};

use hl_core::{Config, Millis, Sequence, ID};
use hl_engine::{Player, TableState};

pub type SnapshotId = ID<hl_core::marker::Snapshot>;
pub type TableId = ID<hl_core::marker::Table>;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TableSnapshot {
    pub snapshot_id: SnapshotId,
    pub version: Sequence,
    pub table_id: TableId,
    pub timestamp: Millis,
    pub config: Config,
    pub game_state: TableState,
    pub players: Vec<Player>,
    pub hand_id: Option<ID<hl_core::marker::Hand>>,
    pub hand_number: u64,
    pub dealer_index: hl_core::Position,
    pub checksum: [u8; 32],
}

/// Everything needed to build a snapshot except the id, version, and
/// checksum, which `SnapshotWriter` assigns.
#[derive(Debug, Clone)]
pub struct SnapshotInput {
    pub table_id: TableId,
    pub config: Config,
    pub game_state: TableState,
    pub hand_id: Option<ID<hl_core::marker::Hand>>,
    pub hand_number: u64,
    pub dealer_index: hl_core::Position,
}

const DOMAIN_SNAPSHOT: &[u8] = b"hl-snapshot/table/v1";

fn compute_checksum(snapshot: &TableSnapshot) -> [u8; 32] {
    // A config/game-state-bearing struct has no string-keyed maps whose
    // iteration order could vary, so a single canonical-JSON encode (field
    // order is struct-declaration order, stable across runs) is enough of
    // a canonical form here; the ledger's entry-by-entry domain separation
    // is reserved for C6, where forward-compatible field addition must not
    // silently reorder the hash input.
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_SNAPSHOT);
    hasher.update(snapshot.snapshot_id.inner().as_bytes());
    hasher.update(snapshot.version.to_be_bytes());
    hasher.update(snapshot.table_id.inner().as_bytes());
    hasher.update(snapshot.timestamp.to_be_bytes());
    let body = serde_json::to_vec(&(&snapshot.config, &snapshot.game_state, &snapshot.players, snapshot.hand_number, snapshot.dealer_index))
        .expect("snapshot body is always serializable");
    hasher.update(body);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

impl TableSnapshot {
    pub fn verify_checksum(&self) -> bool {
        compute_checksum(self) == self.checksum
    }
}

/// Assigns monotonic per-table versions and computes checksums; holds no
/// store of its own (see `SnapshotStore`).
#[derive(Debug, Default)]
pub struct SnapshotWriter;

impl SnapshotWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, clock: &dyn hl_core::Clock, next_version: Sequence, input: SnapshotInput) -> TableSnapshot {
        let mut snapshot = TableSnapshot {
            snapshot_id: SnapshotId::default(),
            version: next_version,
            table_id: input.table_id,
            timestamp: clock.now_millis(),
            players: input.game_state.players.clone(),
            config: input.config,
            game_state: input.game_state,
            hand_id: input.hand_id,
            hand_number: input.hand_number,
            dealer_index: input.dealer_index,
            checksum: [0u8; 32],
        };
        snapshot.checksum = compute_checksum(&snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::FixedClock;

    fn input() -> SnapshotInput {
        SnapshotInput {
            table_id: ID::default(),
            config: Config::default(),
            game_state: TableState::new(Vec::new(), 5, 10),
            hand_id: None,
            hand_number: 1,
            dealer_index: 0,
        }
    }

    #[test]
    fn built_snapshot_verifies_its_own_checksum() {
        let clock = FixedClock::at(0);
        let snapshot = SnapshotWriter::new().build(&clock, 1, input());
        assert!(snapshot.verify_checksum());
    }

    #[test]
    fn tampering_with_the_body_breaks_verification() {
        let clock = FixedClock::at(0);
        let mut snapshot = SnapshotWriter::new().build(&clock, 1, input());
        snapshot.hand_number = 99;
        assert!(!snapshot.verify_checksum());
    }
}
