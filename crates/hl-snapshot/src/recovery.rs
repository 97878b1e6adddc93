//! Restart and reconnection. Recovering a table from
//! its latest snapshot marks every seated player
//! disconnected-reconnectable rather than simply absent, because the
//! server has no way yet to tell "crashed mid-hand" from "never coming
//! back" apart from the grace period elapsing.
use std::collections::HashMap;
use std::time::Duration;

use hl_core::{Millis, Position};
use hl_engine::{PlayerId, TableState};

use crate::errors::SnapshotError;
use crate::snapshot::{TableId, TableSnapshot};
use crate::store::SnapshotStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisconnectedPlayer {
    pub seat: Position,
    pub stack: hl_core::Chips,
    pub disconnected_at: Millis,
}

/// A table reconstructed from its latest snapshot, with every previously
/// seated player parked as disconnected-reconnectable until they either
/// reconnect within the grace period or are dropped.
#[derive(Debug, Clone)]
pub struct RecoveredTable {
    pub table_id: TableId,
    pub snapshot_version: u64,
    pub table: TableState,
    pub hand_id: Option<hl_core::ID<hl_core::marker::Hand>>,
    pending: HashMap<PlayerId, DisconnectedPlayer>,
}

impl RecoveredTable {
    pub fn is_pending_reconnect(&self, player_id: PlayerId) -> bool {
        self.pending.contains_key(&player_id)
    }

    pub fn pending_players(&self) -> impl Iterator<Item = (&PlayerId, &DisconnectedPlayer)> {
        self.pending.iter()
    }
}

#[derive(Debug)]
pub struct RecoveryManager {
    grace_period: Duration,
}

impl RecoveryManager {
    pub fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    /// Load the latest snapshot for `table_id` and reconstruct a
    /// `RecoveredTable`, marking every seated player as pending reconnect
    /// as of the snapshot's own timestamp (the last moment the server
    /// knew them to be present).
    pub fn recover(&self, store: &dyn SnapshotStore, table_id: TableId) -> Result<RecoveredTable, SnapshotError> {
        let snapshot: TableSnapshot = store.load_latest(table_id)?;
        let pending = snapshot
            .players
            .iter()
            .map(|p| {
                (
                    p.id,
                    DisconnectedPlayer {
                        seat: p.seat,
                        stack: p.stack,
                        disconnected_at: snapshot.timestamp,
                    },
                )
            })
            .collect();
        Ok(RecoveredTable {
            table_id,
            snapshot_version: snapshot.version,
            table: snapshot.game_state,
            hand_id: snapshot.hand_id,
            pending,
        })
    }

    /// Restore a reconnecting player at their original seat and stack if
    /// they are within the grace period; otherwise drop their pending
    /// entry and report elapsed.
    pub fn reconnect(&self, recovered: &mut RecoveredTable, player_id: PlayerId, now: Millis) -> Result<Position, SnapshotError> {
        let pending = recovered
            .pending
            .get(&player_id)
            .copied()
            .ok_or_else(|| SnapshotError::NotReconnectable(player_id.to_string(), recovered.table_id.to_string()))?;

        let elapsed = now.saturating_sub(pending.disconnected_at);
        if elapsed > self.grace_period.as_millis() as Millis {
            recovered.pending.remove(&player_id);
            return Err(SnapshotError::GracePeriodElapsed(player_id.to_string(), recovered.table_id.to_string()));
        }
        recovered.pending.remove(&player_id);
        Ok(pending.seat)
    }

    /// Drop every pending entry whose grace period has elapsed as of `now`,
    /// without requiring a reconnect attempt. A server sweeps this
    /// periodically so abandoned seats free up.
    pub fn drop_expired(&self, recovered: &mut RecoveredTable, now: Millis) -> Vec<PlayerId> {
        let grace = self.grace_period.as_millis() as Millis;
        let expired: Vec<PlayerId> = recovered
            .pending
            .iter()
            .filter(|(_, p)| now.saturating_sub(p.disconnected_at) > grace)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            recovered.pending.remove(id);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotInput, SnapshotWriter};
    use crate::store::InMemorySnapshotStore;
    use hl_core::{Config, FixedClock, ID};
    use hl_engine::Player;

    fn store_with_one_table() -> (InMemorySnapshotStore, TableId, PlayerId) {
        let mut store = InMemorySnapshotStore::new();
        let table_id = ID::default();
        let player_id = PlayerId::default();
        let mut table = TableState::new(vec![Player::new(player_id, "p1", 0, 1000)], 5, 10);
        table.hand_number = 3;
        let clock = FixedClock::at(10_000);
        let snapshot = SnapshotWriter::new().build(
            &clock,
            1,
            SnapshotInput {
                table_id,
                config: Config::default(),
                game_state: table,
                hand_id: None,
                hand_number: 3,
                dealer_index: 0,
            },
        );
        store.save(snapshot).unwrap();
        (store, table_id, player_id)
    }

    #[test]
    fn recovery_marks_every_seated_player_pending() {
        let (store, table_id, player_id) = store_with_one_table();
        let manager = RecoveryManager::new(Duration::from_secs(60));
        let recovered = manager.recover(&store, table_id).unwrap();
        assert!(recovered.is_pending_reconnect(player_id));
    }

    #[test]
    fn reconnect_within_grace_period_restores_seat_and_stack() {
        let (store, table_id, player_id) = store_with_one_table();
        let manager = RecoveryManager::new(Duration::from_secs(60));
        let mut recovered = manager.recover(&store, table_id).unwrap();
        let seat = manager.reconnect(&mut recovered, player_id, 10_000 + 5_000).unwrap();
        assert_eq!(seat, 0);
        assert!(!recovered.is_pending_reconnect(player_id));
    }

    #[test]
    fn reconnect_after_grace_period_is_dropped() {
        let (store, table_id, player_id) = store_with_one_table();
        let manager = RecoveryManager::new(Duration::from_secs(60));
        let mut recovered = manager.recover(&store, table_id).unwrap();
        let err = manager.reconnect(&mut recovered, player_id, 10_000 + 61_000).unwrap_err();
        assert!(matches!(err, SnapshotError::GracePeriodElapsed(_, _)));
        assert!(!recovered.is_pending_reconnect(player_id));
    }

    #[test]
    fn drop_expired_sweeps_without_a_reconnect_attempt() {
        let (store, table_id, player_id) = store_with_one_table();
        let manager = RecoveryManager::new(Duration::from_secs(60));
        let mut recovered = manager.recover(&store, table_id).unwrap();
        let dropped = manager.drop_expired(&mut recovered, 10_000 + 61_000);
        assert_eq!(dropped, vec![player_id]);
        assert!(!recovered.is_pending_reconnect(player_id));
    }
}
