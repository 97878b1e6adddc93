use hl_cards::{Card, Evaluator, Strength};
use hl_core::Position;

use crate::player::{Player, PlayerId};
use crate::pots::{split_evenly, Pot};
use crate::table::PotAward;

/// Evaluates every eligible player's best hand and distributes each pot to
/// its winner(s), splitting ties with the odd chip going to the earliest
/// eligible seat after the dealer.
pub fn resolve_showdown(
    players: &[Player],
    community: &[Card],
    pots: &[Pot],
    dealer_index: Position,
) -> (Vec<PotAward>, Option<String>) {
    let n = players.len();
    let strength_of = |id: PlayerId| -> Strength {
        let player = players.iter().find(|p| p.id == id).expect("eligible player exists");
        let hole = player.hole.expect("showdown participant must have hole cards");
        let mut cards: Vec<Card> = hole.to_vec();
        cards.extend_from_slice(community);
        Evaluator::best_of(&cards)
    };

    let mut awards: Vec<PotAward> = Vec::new();
    let mut best_description = None;

    for (pot_index, pot) in pots.iter().enumerate() {
        let mut ranked: Vec<(PlayerId, Strength)> = pot
            .eligible
            .iter()
            .map(|&id| (id, strength_of(id)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top = ranked[0].1.clone();
        let mut winners: Vec<PlayerId> = ranked
            .into_iter()
            .filter(|(_, s)| *s == top)
            .map(|(id, _)| id)
            .collect();

        // Order winners by seat distance clockwise from the dealer so the
        // earliest seat after the dealer receives any odd remainder chip.
        winners.sort_by_key(|&id| {
            let seat = players.iter().find(|p| p.id == id).unwrap().seat;
            (seat + n - dealer_index - 1) % n
        });

        let shares = split_evenly(pot.amount, winners.len(), 0);
        let label = if pots.len() == 1 {
            "main".to_string()
        } else if pot_index == 0 {
            "main".to_string()
        } else {
            format!("side-{pot_index}")
        };
        for (winner, share) in winners.iter().zip(shares) {
            awards.push(PotAward {
                player_id: *winner,
                amount: share,
                pot_label: label.clone(),
            });
        }
        if pot_index == pots.len() - 1 {
            best_description = Some(top.to_string());
        }
    }

    (awards, best_description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerStatus;
    use hl_cards::{Rank, Suit};
    use hl_core::ID;

    fn player_with(seat: usize, hole: [Card; 2], contributed: i64) -> Player {
        let mut player = Player::new(ID::default(), format!("seat{seat}"), seat, 0);
        player.hole = Some(hole);
        player.total_bet_this_hand = contributed;
        player.status = PlayerStatus::Active;
        player
    }

    #[test]
    fn best_hand_wins_the_whole_pot() {
        let community = vec![
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::Seven, Suit::Diamond),
            Card::new(Rank::Nine, Suit::Heart),
            Card::new(Rank::Jack, Suit::Spade),
            Card::new(Rank::Three, Suit::Club),
        ];
        let p1 = player_with(0, [Card::new(Rank::Ace, Suit::Club), Card::new(Rank::Ace, Suit::Diamond)], 100);
        let p2 = player_with(1, [Card::new(Rank::King, Suit::Club), Card::new(Rank::Queen, Suit::Diamond)], 100);
        let players = vec![p1.clone(), p2.clone()];
        let pots = vec![Pot { amount: 200, eligible: vec![p1.id, p2.id] }];
        let (awards, _) = resolve_showdown(&players, &community, &pots, 0);
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].player_id, p1.id);
        assert_eq!(awards[0].amount, 200);
    }

    #[test]
    fn ties_split_with_odd_chip_to_earliest_seat_after_dealer() {
        let community = vec![
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::Seven, Suit::Diamond),
            Card::new(Rank::Nine, Suit::Heart),
            Card::new(Rank::Jack, Suit::Spade),
            Card::new(Rank::Three, Suit::Club),
        ];
        // Both players play the board (same kickers from community beyond what's dealt).
        let p1 = player_with(0, [Card::new(Rank::Four, Suit::Heart), Card::new(Rank::Five, Suit::Spade)], 51);
        let p2 = player_with(1, [Card::new(Rank::Four, Suit::Club), Card::new(Rank::Five, Suit::Diamond)], 51);
        let players = vec![p1.clone(), p2.clone()];
        let pots = vec![Pot { amount: 101, eligible: vec![p1.id, p2.id] }];
        let (awards, _) = resolve_showdown(&players, &community, &pots, 1);
        let total: i64 = awards.iter().map(|a| a.amount).sum();
        assert_eq!(total, 101);
        // dealer at seat 1 -> earliest seat after dealer is seat 0 (p1)
        let p1_award = awards.iter().find(|a| a.player_id == p1.id).unwrap();
        assert_eq!(p1_award.amount, 51);
    }
}
