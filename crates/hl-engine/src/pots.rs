use hl_core::Chips;

use crate::player::{Player, PlayerId};

/// A single main or side pot: an amount and the set of players still
/// eligible to win it (folded players contribute chips to a pot but are
/// never eligible for it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
}

/// Buckets players by total hand contribution and builds one pot per
/// distinct contribution level, the way a cardroom builds side pots for
/// uneven all-ins: a player's chips above the shortest all-in stack spill
/// into a pot that stack has no claim on.
pub fn build_pots(players: &[Player]) -> Vec<Pot> {
    let mut levels: Vec<Chips> = players
        .iter()
        .map(|p| p.total_bet_this_hand)
        .filter(|&c| c > 0)
        .collect();
    levels.sort();
    levels.dedup();

    let mut pots = Vec::new();
    let mut previous = 0;
    for level in levels {
        let contributors = players
            .iter()
            .filter(|p| p.total_bet_this_hand >= level)
            .count() as Chips;
        let amount = (level - previous) * contributors;
        let eligible: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.total_bet_this_hand >= level && p.status.contests_pots())
            .map(|p| p.id)
            .collect();
        if amount > 0 && !eligible.is_empty() {
            pots.push(Pot { amount, eligible });
        }
        previous = level;
    }
    pots
}

/// Splits `amount` evenly among `shares` recipients, integer division,
/// with any odd remainder distributed one chip at a time starting from
/// `first_index` (the earliest eligible seat after the dealer) and moving
/// forward through the recipient list.
pub fn split_evenly(amount: Chips, shares: usize, first_index: usize) -> Vec<Chips> {
    assert!(shares > 0, "cannot split a pot among zero recipients");
    let base = amount / shares as Chips;
    let mut remainder = amount % shares as Chips;
    let mut out = vec![base; shares];
    let mut i = first_index % shares;
    while remainder > 0 {
        out[i] += 1;
        remainder -= 1;
        i = (i + 1) % shares;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerStatus;
    use hl_core::ID;

    fn player(id_seed: u8, seat: usize, contributed: Chips, status: PlayerStatus) -> Player {
        let mut player = Player::new(ID::default(), format!("p{id_seed}"), seat, 0);
        player.total_bet_this_hand = contributed;
        player.status = status;
        player
    }

    #[test]
    fn equal_contributions_produce_a_single_pot() {
        let players = vec![
            player(1, 0, 100, PlayerStatus::Active),
            player(2, 1, 100, PlayerStatus::Active),
        ];
        let pots = build_pots(&players);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 200);
        assert_eq!(pots[0].eligible.len(), 2);
    }

    #[test]
    fn short_all_in_creates_a_side_pot() {
        // p1 shoves 50, p2 and p3 each put in 150.
        let players = vec![
            player(1, 0, 50, PlayerStatus::AllIn),
            player(2, 1, 150, PlayerStatus::Active),
            player(3, 2, 150, PlayerStatus::Active),
        ];
        let pots = build_pots(&players);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 150); // 50 * 3 contributors
        assert_eq!(pots[0].eligible.len(), 3);
        assert_eq!(pots[1].amount, 200); // (150-50) * 2 contributors
        assert_eq!(pots[1].eligible.len(), 2);
    }

    #[test]
    fn folded_contributions_stay_in_the_pot_but_are_not_eligible() {
        let players = vec![
            player(1, 0, 100, PlayerStatus::Folded),
            player(2, 1, 100, PlayerStatus::Active),
        ];
        let pots = build_pots(&players);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 200);
        assert_eq!(pots[0].eligible.len(), 1);
    }

    #[test]
    fn split_evenly_gives_odd_chip_to_first_index() {
        let shares = split_evenly(10, 3, 1);
        assert_eq!(shares, vec![3, 4, 3]);
    }
}
