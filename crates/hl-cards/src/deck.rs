use super::card::Card;
use super::rank::Rank;
use super::suit::Suit;

/// An ordered sequence of cards to be dealt. A deck is always *supplied*
/// to the hand reducer, never generated by it — shuffling lives here as a
/// convenience for callers (tools, tests) assembling the external input,
/// not as something the reducer invokes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck must contain exactly 52 cards, got {0}")]
    WrongSize(usize),
    #[error("deck contains a duplicate card: {0}")]
    Duplicate(Card),
}

impl Deck {
    /// The canonical, unshuffled 52-card sequence: suits in Club, Diamond,
    /// Heart, Spade order, ranks Two through Ace within each suit.
    pub fn canonical() -> Deck {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::all() {
            for rank in Rank::all() {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// Build a deck from an externally supplied, already-ordered sequence
    /// of 52 distinct cards. This is the constructor the engine is meant
    /// to receive input through.
    pub fn from_cards(cards: Vec<Card>) -> Result<Deck, DeckError> {
        if cards.len() != 52 {
            return Err(DeckError::WrongSize(cards.len()));
        }
        let mut seen = std::collections::HashSet::with_capacity(52);
        for card in &cards {
            if !seen.insert(card.to_int()) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(Deck { cards })
    }

    /// Randomly permute the canonical deck. Intended for tools and test
    /// fixtures assembling external input, never called by a reducer.
    pub fn shuffled(rng: &mut impl rand::Rng) -> Deck {
        use rand::seq::SliceRandom;
        let mut deck = Self::canonical();
        deck.cards.shuffle(rng);
        deck
    }

    /// Consume and return the next card from the front of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn peek(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_has_52_distinct_cards() {
        let deck = Deck::canonical();
        assert_eq!(deck.remaining(), 52);
        let unique: std::collections::HashSet<_> =
            deck.peek().iter().map(Card::to_int).collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn draw_consumes_from_the_front() {
        let mut deck = Deck::canonical();
        let first = deck.peek()[0];
        assert_eq!(deck.draw(), Some(first));
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn from_cards_rejects_wrong_size() {
        let cards = Deck::canonical().peek()[..51].to_vec();
        assert_eq!(Deck::from_cards(cards), Err(DeckError::WrongSize(51)));
    }

    #[test]
    fn from_cards_rejects_duplicates() {
        let mut cards = Deck::canonical().peek().to_vec();
        cards[1] = cards[0];
        match Deck::from_cards(cards) {
            Err(DeckError::Duplicate(_)) => {}
            other => panic!("expected Duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn two_independent_shuffles_with_same_seed_agree() {
        use rand::SeedableRng;
        let mut a = rand::rngs::StdRng::seed_from_u64(7);
        let mut b = rand::rngs::StdRng::seed_from_u64(7);
        assert_eq!(Deck::shuffled(&mut a), Deck::shuffled(&mut b));
    }
}
