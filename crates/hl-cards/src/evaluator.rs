use super::card::Card;
use super::rank::Rank;
use super::ranking::Ranking;
use super::strength::Strength;
use std::collections::HashMap;

/// Evaluates the best 5-card hand obtainable from a set of 5, 6, or 7 cards
/// (hole cards plus however much of the community board is visible) and
/// returns a `Strength` that totally orders against any other evaluation.
pub struct Evaluator;

impl Evaluator {
    pub fn best_of(cards: &[Card]) -> Strength {
        assert!(
            (5..=7).contains(&cards.len()),
            "evaluator requires 5 to 7 cards, got {}",
            cards.len()
        );
        combinations(cards.len(), 5)
            .into_iter()
            .map(|idxs| {
                let five: Vec<Card> = idxs.into_iter().map(|i| cards[i]).collect();
                evaluate_five(&five)
            })
            .max()
            .expect("at least one 5-card combination exists")
    }
}

fn evaluate_five(cards: &[Card]) -> Strength {
    debug_assert_eq!(cards.len(), 5);

    let mut ranks: Vec<Rank> = cards.iter().map(Card::rank).collect();
    ranks.sort_by(|a, b| b.cmp(a));

    let is_flush = cards.windows(2).all(|w| w[0].suit() == w[1].suit());
    let straight_high = straight_high_rank(&ranks);

    let mut counts: HashMap<Rank, u8> = HashMap::new();
    for r in &ranks {
        *counts.entry(*r).or_insert(0) += 1;
    }
    let mut by_count: Vec<(Rank, u8)> = counts.into_iter().collect();
    // Sort by count desc, then rank desc, so the "shape" of the hand reads
    // off the front of the vector (e.g. quad rank, then kicker).
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let shape: Vec<u8> = by_count.iter().map(|(_, c)| *c).collect();
    let ranked = |i: usize| by_count[i].0;
    let kickers_from = |used: &[Rank]| -> Vec<Rank> {
        let mut rest: Vec<Rank> = ranks.iter().copied().filter(|r| !used.contains(r)).collect();
        rest.dedup();
        rest
    };

    if let (true, Some(high)) = (is_flush, straight_high) {
        return Strength::new(Ranking::StraightFlush(high), vec![]);
    }
    if shape == [4, 1] {
        let ranking = Ranking::FourOAK(ranked(0));
        return Strength::new(ranking, kickers_from(&[ranked(0)]));
    }
    if shape == [3, 2] {
        return Strength::new(Ranking::FullHouse(ranked(0), ranked(1)), vec![]);
    }
    if is_flush {
        let ranking = Ranking::Flush(ranks[0]);
        return Strength::new(ranking, kickers_from(&[ranks[0]]));
    }
    if let Some(high) = straight_high {
        return Strength::new(Ranking::Straight(high), vec![]);
    }
    if shape == [3, 1, 1] {
        let ranking = Ranking::ThreeOAK(ranked(0));
        return Strength::new(ranking, kickers_from(&[ranked(0)]));
    }
    if shape == [2, 2, 1] {
        let (hi, lo) = (ranked(0).max(ranked(1)), ranked(0).min(ranked(1)));
        let ranking = Ranking::TwoPair(hi, lo);
        return Strength::new(ranking, kickers_from(&[hi, lo]));
    }
    if shape == [2, 1, 1, 1] {
        let ranking = Ranking::OnePair(ranked(0));
        return Strength::new(ranking, kickers_from(&[ranked(0)]));
    }
    let ranking = Ranking::HighCard(ranks[0]);
    Strength::new(ranking, kickers_from(&[ranks[0]]))
}

/// Returns the high rank of a straight if the five ranks (already sorted
/// descending, possibly with duplicates which disqualify a straight) form
/// one, accounting for the wheel (A-2-3-4-5, where the straight is headed
/// by the Five, not the Ace).
fn straight_high_rank(ranks_desc: &[Rank]) -> Option<Rank> {
    let mut values: Vec<u8> = ranks_desc.iter().map(Rank::value).collect();
    values.dedup();
    if values.len() != 5 {
        return None;
    }
    if values[0] - values[4] == 4 {
        return Some(ranks_desc[0]);
    }
    // wheel: A,5,4,3,2 -> values [14,5,4,3,2]
    if values == [14, 5, 4, 3, 2] {
        return Some(Rank::Five);
    }
    None
}

/// All length-`k` index combinations out of `0..n`, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut chosen = Vec::with_capacity(k);
    fn recurse(start: usize, n: usize, k: usize, chosen: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if chosen.len() == k {
            out.push(chosen.clone());
            return;
        }
        for i in start..n {
            chosen.push(i);
            recurse(i + 1, n, k, chosen, out);
            chosen.pop();
        }
    }
    recurse(0, n, k, &mut chosen, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::suit::Suit;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn royal_flush_beats_everything() {
        let hand = [
            card(Rank::Ace, Suit::Spade),
            card(Rank::King, Suit::Spade),
            card(Rank::Queen, Suit::Spade),
            card(Rank::Jack, Suit::Spade),
            card(Rank::Ten, Suit::Spade),
        ];
        let strength = Evaluator::best_of(&hand);
        assert_eq!(strength.ranking(), Ranking::StraightFlush(Rank::Ace));
    }

    #[test]
    fn wheel_straight_is_five_high() {
        let hand = [
            card(Rank::Ace, Suit::Spade),
            card(Rank::Two, Suit::Heart),
            card(Rank::Three, Suit::Club),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Five, Suit::Spade),
        ];
        let strength = Evaluator::best_of(&hand);
        assert_eq!(strength.ranking(), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn four_of_a_kind_beats_full_house() {
        let quads = [
            card(Rank::Nine, Suit::Club),
            card(Rank::Nine, Suit::Diamond),
            card(Rank::Nine, Suit::Heart),
            card(Rank::Nine, Suit::Spade),
            card(Rank::Two, Suit::Club),
        ];
        let boat = [
            card(Rank::King, Suit::Club),
            card(Rank::King, Suit::Diamond),
            card(Rank::King, Suit::Heart),
            card(Rank::Queen, Suit::Spade),
            card(Rank::Queen, Suit::Club),
        ];
        assert!(Evaluator::best_of(&quads) > Evaluator::best_of(&boat));
    }

    #[test]
    fn best_of_seven_picks_the_best_five() {
        // Board makes a flush available; hole cards are irrelevant rags.
        let seven = [
            card(Rank::Two, Suit::Heart),
            card(Rank::Seven, Suit::Club),
            card(Rank::Three, Suit::Spade),
            card(Rank::Six, Suit::Spade),
            card(Rank::Nine, Suit::Spade),
            card(Rank::Queen, Suit::Spade),
            card(Rank::King, Suit::Spade),
        ];
        let strength = Evaluator::best_of(&seven);
        assert_eq!(strength.ranking(), Ranking::Flush(Rank::King));
    }

    #[test]
    fn kickers_break_ties_between_equal_pairs() {
        let pair_ace_kicker = [
            card(Rank::Jack, Suit::Club),
            card(Rank::Jack, Suit::Diamond),
            card(Rank::Ace, Suit::Heart),
            card(Rank::Four, Suit::Spade),
            card(Rank::Two, Suit::Club),
        ];
        let pair_king_kicker = [
            card(Rank::Jack, Suit::Heart),
            card(Rank::Jack, Suit::Spade),
            card(Rank::King, Suit::Club),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Heart),
        ];
        assert!(Evaluator::best_of(&pair_ace_kicker) > Evaluator::best_of(&pair_king_kicker));
    }
}
