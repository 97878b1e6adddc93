use hl_cards::Card;
use hl_core::{Chips, Position, ID};

use crate::player::{Player, PlayerId};
use crate::street::Street;

pub type TableId = ID<hl_core::marker::Table>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PotAward {
    pub player_id: PlayerId,
    pub amount: Chips,
    pub pot_label: String,
}

/// Immutable snapshot of a table between (or during) hands. Every
/// transition produces a new `TableState`; nothing here is ever mutated
/// in place once constructed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TableState {
    pub players: Vec<Player>,
    pub dealer_index: Position,
    pub street: Street,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub active_player_index: Option<Position>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_raise: Chips,
    pub last_raiser_index: Option<Position>,
    pub actions_this_round: usize,
    pub hand_number: u64,
    pub winners: Vec<PotAward>,
    pub winning_hand_description: Option<String>,
    /// Per-player-index flag: has this player acted voluntarily since the
    /// last bet/raise? Forced blinds do not set this (the big blind option).
    pub acted_since_raise: Vec<bool>,
}

impl TableState {
    pub fn new(players: Vec<Player>, small_blind: Chips, big_blind: Chips) -> Self {
        let n = players.len();
        Self {
            players,
            acted_since_raise: vec![false; n],
            dealer_index: 0,
            street: Street::Waiting,
            community_cards: Vec::new(),
            pot: 0,
            current_bet: 0,
            active_player_index: None,
            small_blind,
            big_blind,
            min_raise: big_blind,
            last_raiser_index: None,
            actions_this_round: 0,
            hand_number: 0,
            winners: Vec::new(),
            winning_hand_description: None,
        }
    }

    pub fn player_at(&self, seat: Position) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.active_player_index.and_then(|i| self.players.get(i))
    }

    /// Players who have not folded or sat out — still in the hand.
    pub fn contenders(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.status.contests_pots())
    }

    pub fn contenders_count(&self) -> usize {
        self.contenders().count()
    }

    /// Players who can still take a betting action this street (active,
    /// not all-in).
    pub fn acting_players_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.status.is_active())
            .count()
    }

    pub fn next_seat_after(&self, index: usize) -> usize {
        (index + 1) % self.players.len()
    }
}
