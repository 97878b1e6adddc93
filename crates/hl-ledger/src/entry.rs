use std::collections::BTreeMap;

use hl_core::{Chips, Millis, Sequence, ID};

pub type EntryId = ID<hl_core::marker::Entry>;
pub type BatchId = ID<hl_core::marker::Batch>;

/// Where a ledger entry's value came from. `HandSettlement` entries may
/// only be produced by the settlement recorder (C7); `TopUp`/`AdminCredit`
/// only by the corresponding boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    HandSettlement,
    TopUp,
    AdminCredit,
}

/// The party a delta is attributed to. Tagged so a player can never be
/// confused with a club, agent, or the platform account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "partyType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Party {
    Player { id: ID<hl_core::marker::Player> },
    Club { id: ID<hl_core::marker::Club> },
    Agent { id: ID<hl_core::marker::Agent> },
    Platform,
}

impl Party {
    pub fn is_player(&self) -> bool {
        matches!(self, Party::Player { .. })
    }
}

/// An immutable, hash-chained record of one chip movement. `append` is the
/// only way one of these comes into being; nothing mutates it afterward
/// nothing mutates it afterward.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub sequence: Sequence,
    pub timestamp: Millis,
    pub source: Source,
    pub affected_party: Party,
    pub delta: Chips,
    pub state_version: u64,
    pub table_id: Option<ID<hl_core::marker::Table>>,
    pub club_id: Option<ID<hl_core::marker::Club>>,
    pub hand_id: Option<ID<hl_core::marker::Hand>>,
    pub description: String,
    pub metadata: BTreeMap<String, String>,
    pub checksum: [u8; 32],
}

/// Everything needed to append a new entry except the sequence, checksum,
/// and timestamp, which the ledger itself assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    pub source: Source,
    pub affected_party: Party,
    pub delta: Chips,
    pub state_version: u64,
    pub table_id: Option<ID<hl_core::marker::Table>>,
    pub club_id: Option<ID<hl_core::marker::Club>>,
    pub hand_id: Option<ID<hl_core::marker::Hand>>,
    pub description: String,
    pub metadata: BTreeMap<String, String>,
}

impl EntryInput {
    pub fn new(source: Source, affected_party: Party, delta: Chips, description: impl Into<String>) -> Self {
        Self {
            source,
            affected_party,
            delta,
            state_version: 0,
            table_id: None,
            club_id: None,
            hand_id: None,
            description: description.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
    pub fn with_table(mut self, table_id: ID<hl_core::marker::Table>) -> Self {
        self.table_id = Some(table_id);
        self
    }
    pub fn with_club(mut self, club_id: ID<hl_core::marker::Club>) -> Self {
        self.club_id = Some(club_id);
        self
    }
    pub fn with_hand(mut self, hand_id: ID<hl_core::marker::Hand>) -> Self {
        self.hand_id = Some(hand_id);
        self
    }
    pub fn with_state_version(mut self, state_version: u64) -> Self {
        self.state_version = state_version;
        self
    }
}
