use super::rank::Rank;

/// A poker hand's category, ordered weakest to strongest so that the
/// derived `Ord` impl is the hand-strength order directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),
    OnePair(Rank),
    TwoPair(Rank, Rank),
    ThreeOAK(Rank),
    Straight(Rank),
    Flush(Rank),
    FullHouse(Rank, Rank),
    FourOAK(Rank),
    StraightFlush(Rank),
}

impl Ranking {
    /// How many additional kicker ranks (beyond the ranks already carried
    /// by this variant) are needed to fully break ties.
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::Flush(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "high card {r}"),
            Ranking::OnePair(r) => write!(f, "pair of {r}s"),
            Ranking::TwoPair(hi, lo) => write!(f, "two pair, {hi}s and {lo}s"),
            Ranking::ThreeOAK(r) => write!(f, "three of a kind, {r}s"),
            Ranking::Straight(r) => write!(f, "straight to {r}"),
            Ranking::Flush(r) => write!(f, "flush, {r} high"),
            Ranking::FullHouse(hi, lo) => write!(f, "full house, {hi}s over {lo}s"),
            Ranking::FourOAK(r) => write!(f, "four of a kind, {r}s"),
            Ranking::StraightFlush(r) => write!(f, "straight flush to {r}"),
        }
    }
}
