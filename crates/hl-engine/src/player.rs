use hl_cards::Card;
use hl_core::{Chips, Position, ID};

pub type PlayerId = ID<hl_core::marker::Player>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
    Out,
    SittingOut,
}

impl PlayerStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, PlayerStatus::Active)
    }
    /// Players still eligible to contest a pot: active or all-in, never folded/out.
    pub fn contests_pots(&self) -> bool {
        matches!(self, PlayerStatus::Active | PlayerStatus::AllIn)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub stack: Chips,
    pub status: PlayerStatus,
    pub hole: Option<[Card; 2]>,
    pub current_bet: Chips,
    pub total_bet_this_hand: Chips,
    pub is_dealer: bool,
    pub seat: Position,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, seat: Position, stack: Chips) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            status: PlayerStatus::Active,
            hole: None,
            current_bet: 0,
            total_bet_this_hand: 0,
            is_dealer: false,
            seat,
        }
    }

    pub fn reset_for_new_hand(&mut self) {
        self.current_bet = 0;
        self.total_bet_this_hand = 0;
        self.hole = None;
        if self.status != PlayerStatus::Out && self.status != PlayerStatus::SittingOut {
            self.status = PlayerStatus::Active;
        }
    }

    pub fn reset_for_new_street(&mut self) {
        self.current_bet = 0;
    }

    /// Move `amount` from stack into the bet; marks the player all-in if
    /// their stack hits zero. `amount` is clamped to the available stack.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let committed = amount.min(self.stack);
        self.stack -= committed;
        self.current_bet += committed;
        self.total_bet_this_hand += committed;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_clamps_to_stack_and_marks_all_in() {
        let mut player = Player::new(PlayerId::default(), "p1", 0, 40);
        let committed = player.commit(100);
        assert_eq!(committed, 40);
        assert_eq!(player.stack, 0);
        assert_eq!(player.status, PlayerStatus::AllIn);
    }

    #[test]
    fn commit_below_stack_leaves_player_active() {
        let mut player = Player::new(PlayerId::default(), "p1", 0, 100);
        player.commit(40);
        assert_eq!(player.stack, 60);
        assert_eq!(player.status, PlayerStatus::Active);
    }
}
