//! A minimal persistence seam for snapshots. `SnapshotStore` is the
//! trait a filesystem- or database-backed store would implement; this
//! crate ships only the in-memory implementation, sufficient for tests
//! and for the in-process server binary.
use std::collections::HashMap;

use crate::errors::SnapshotError;
use crate::snapshot::{TableId, TableSnapshot};

pub trait SnapshotStore: std::fmt::Debug + Send + Sync {
    fn save(&mut self, snapshot: TableSnapshot) -> Result<(), SnapshotError>;
    fn load_latest(&self, table_id: TableId) -> Result<TableSnapshot, SnapshotError>;
    fn known_tables(&self) -> Vec<TableId>;
}

/// Keeps every version ever written, per table, in memory. `save` does not
/// compact; callers wanting retention limits should call `compact`
/// explicitly (e.g. on a timer) — compaction is never implicit in a write.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    by_table: HashMap<uuid::Uuid, Vec<TableSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all but the most recent `keep` versions for a table.
    pub fn compact(&mut self, table_id: TableId, keep: usize) {
        if let Some(versions) = self.by_table.get_mut(&table_id.inner()) {
            let drop_count = versions.len().saturating_sub(keep);
            versions.drain(0..drop_count);
        }
    }

    pub fn version_count(&self, table_id: TableId) -> usize {
        self.by_table.get(&table_id.inner()).map(|v| v.len()).unwrap_or(0)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&mut self, snapshot: TableSnapshot) -> Result<(), SnapshotError> {
        self.by_table.entry(snapshot.table_id.inner()).or_default().push(snapshot);
        Ok(())
    }

    fn load_latest(&self, table_id: TableId) -> Result<TableSnapshot, SnapshotError> {
        let versions = self.by_table.get(&table_id.inner()).ok_or_else(|| SnapshotError::not_found(table_id))?;
        let latest = versions.last().ok_or_else(|| SnapshotError::not_found(table_id))?;
        if !latest.verify_checksum() {
            return Err(SnapshotError::corrupt(table_id));
        }
        Ok(latest.clone())
    }

    fn known_tables(&self) -> Vec<TableId> {
        self.by_table.keys().map(|&u| TableId::from(u)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotInput, SnapshotWriter};
    use hl_core::{Config, FixedClock, ID};
    use hl_engine::TableState;

    fn snapshot(table_id: TableId, version: u64) -> TableSnapshot {
        let clock = FixedClock::at(0);
        SnapshotWriter::new().build(
            &clock,
            version,
            SnapshotInput {
                table_id,
                config: Config::default(),
                game_state: TableState::new(Vec::new(), 5, 10),
                hand_id: None,
                hand_number: version,
                dealer_index: 0,
            },
        )
    }

    #[test]
    fn load_latest_returns_the_highest_version() {
        let mut store = InMemorySnapshotStore::new();
        let table_id = ID::default();
        store.save(snapshot(table_id, 1)).unwrap();
        store.save(snapshot(table_id, 2)).unwrap();
        let loaded = store.load_latest(table_id).unwrap();
        assert_eq!(loaded.version, 2);
    }

    #[test]
    fn missing_table_is_not_found() {
        let store = InMemorySnapshotStore::new();
        let err = store.load_latest(ID::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[test]
    fn corrupted_snapshot_is_detected_on_load() {
        let mut store = InMemorySnapshotStore::new();
        let table_id = ID::default();
        let mut bad = snapshot(table_id, 1);
        bad.hand_number = 999;
        store.save(bad).unwrap();
        let err = store.load_latest(table_id).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt(_)));
    }

    #[test]
    fn compact_drops_all_but_the_most_recent_versions() {
        let mut store = InMemorySnapshotStore::new();
        let table_id = ID::default();
        for v in 1..=5 {
            store.save(snapshot(table_id, v)).unwrap();
        }
        store.compact(table_id, 2);
        assert_eq!(store.version_count(table_id), 2);
        assert_eq!(store.load_latest(table_id).unwrap().version, 5);
    }
}
