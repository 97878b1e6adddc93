use hl_core::ID;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot for table {0} failed checksum verification")]
    Corrupt(String),
    #[error("no snapshot found for table {0}")]
    NotFound(String),
    #[error("snapshot store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("player {0} is not known to be disconnected-reconnectable for table {1}")]
    NotReconnectable(String, String),
    #[error("reconnect grace period for player {0} at table {1} has elapsed")]
    GracePeriodElapsed(String, String),
}

impl SnapshotError {
    pub fn corrupt(table_id: ID<hl_core::marker::Table>) -> Self {
        Self::Corrupt(table_id.to_string())
    }
    pub fn not_found(table_id: ID<hl_core::marker::Table>) -> Self {
        Self::NotFound(table_id.to_string())
    }
}
