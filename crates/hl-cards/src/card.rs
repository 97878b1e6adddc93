use super::rank::Rank;
use super::suit::Suit;
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub const fn rank(&self) -> Rank {
        self.rank
    }
    pub const fn suit(&self) -> Suit {
        self.suit
    }
    pub fn to_int(&self) -> u8 {
        (self.rank as u8) * 4 + (self.suit as u8)
    }
    pub fn to_bits(&self) -> u64 {
        1u64 << self.to_int()
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self { rank, suit }
    }
}

// u8 isomorphism: bijective index into the 52-card deck.
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.to_int()
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_roundtrip_covers_all_52() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(u8::from(card), n);
        }
    }

    #[test]
    fn display_format() {
        let card = Card::new(Rank::Ace, Suit::Spade);
        assert_eq!(card.to_string(), "As");
    }
}
