use hl_cards::Card;
use hl_core::{Chips, Millis, Position, Sequence, ID};

use crate::action::Action;
use crate::hand::HandId;
use crate::player::PlayerId;
use crate::table::{PotAward, TableId};

pub type EventId = ID<hl_core::marker::Event>;

/// Every event a hand's reducers emit shares this envelope; `kind` carries
/// the per-type payload. `sequence` is strictly monotonic within a hand
/// (two runs fed the same commands produce identical sequences).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameEvent {
    pub event_id: EventId,
    pub hand_id: HandId,
    pub table_id: TableId,
    pub sequence: Sequence,
    pub timestamp: Millis,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    HandStarted {
        hand_number: u64,
        dealer_index: Position,
    },
    BlindsPosted {
        small_blind_seat: Position,
        big_blind_seat: Position,
        pot: Chips,
    },
    HoleCardsDealt,
    PlayerToAct {
        seat: Position,
    },
    PlayerActed {
        seat: Position,
        action: Action,
    },
    BettingRoundComplete,
    StreetChanged {
        street: crate::street::Street,
    },
    CommunityCardsDealt {
        cards: Vec<Card>,
    },
    ShowdownStarted,
    HandRevealed {
        seat: Position,
        hole: [Card; 2],
    },
    PotAwarded(PotAward),
    HandEnded {
        reason: HandEndReason,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandEndReason {
    AllFold,
    Showdown,
}

/// Owned by each hand runtime; hands out strictly increasing sequence
/// numbers. Never a process-wide static, per the "no global mutable
/// counters" design note.
#[derive(Debug, Clone)]
pub struct EventSequencer {
    hand_id: HandId,
    table_id: TableId,
    next: Sequence,
}

impl EventSequencer {
    pub fn new(hand_id: HandId, table_id: TableId) -> Self {
        Self { hand_id, table_id, next: 1 }
    }

    /// Resume a sequencer picking up where a previous one left off, so
    /// sequence numbers stay monotonic across the separate reducer calls
    /// that make up one hand's lifetime.
    pub fn resume(hand_id: HandId, table_id: TableId, next: Sequence) -> Self {
        Self { hand_id, table_id, next }
    }

    pub fn next_sequence(&self) -> Sequence {
        self.next
    }

    pub fn emit(&mut self, clock: &dyn hl_core::Clock, kind: EventKind) -> GameEvent {
        let sequence = self.next;
        self.next += 1;
        GameEvent {
            event_id: EventId::default(),
            hand_id: self.hand_id,
            table_id: self.table_id,
            sequence,
            timestamp: clock.now_millis(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::FixedClock;

    #[test]
    fn sequence_numbers_are_strictly_monotonic() {
        let mut seq = EventSequencer::new(HandId::default(), TableId::default());
        let clock = FixedClock::at(0);
        let a = seq.emit(&clock, EventKind::HoleCardsDealt);
        let b = seq.emit(&clock, EventKind::BettingRoundComplete);
        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
    }
}
