use hl_cards::Deck;
use hl_core::{Millis, Sequence, ID};

use crate::action::Action;
use crate::phase::Phase;
use crate::table::{TableId, TableState};

pub type HandId = ID<hl_core::marker::Hand>;

/// A recorded action, kept for audit/replay display purposes. The
/// authoritative replay source is the command list a caller feeds the
/// reducer with; `action_history` is a denormalized view of it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordedAction {
    pub seat: hl_core::Position,
    pub action: Action,
    pub street: crate::street::Street,
}

/// `TableState` plus everything that is specific to the hand currently in
/// progress: the remaining deck, the phase (a finer-grained state machine
/// than `street`, see `Phase`), and timing/audit metadata.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HandState {
    pub hand_id: HandId,
    pub table_id: TableId,
    pub table: TableState,
    pub deck: Deck,
    pub phase: Phase,
    pub start_time: Millis,
    pub last_action_time: Millis,
    pub action_history: Vec<RecordedAction>,
    /// Next sequence number the hand's `EventSequencer` will assign;
    /// persisted here so sequencing stays monotonic across the separate
    /// calls that make up a hand (start, each player action).
    pub next_sequence: Sequence,
}

impl HandState {
    pub fn new(hand_id: HandId, table_id: TableId, table: TableState, deck: Deck, now: Millis) -> Self {
        Self {
            hand_id,
            table_id,
            table,
            deck,
            phase: Phase::Waiting,
            start_time: now,
            last_action_time: now,
            action_history: Vec::new(),
            next_sequence: 1,
        }
    }
}
