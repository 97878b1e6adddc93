use hl_core::Chips;

/// A player action, as submitted to the betting round.
///
/// `Bet`/`Raise` carry the target `currentBet` level the player is moving
/// to, not a delta — this matches how `ValidActions` reports `minBet`/
/// `minRaise`/`maxBet`/`maxRaise` as absolute levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet { to: Chips },
    Raise { to: Chips },
    AllIn,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call => "call",
            Action::Bet { .. } => "bet",
            Action::Raise { .. } => "raise",
            Action::AllIn => "all-in",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Bet { to } => write!(f, "bet to {to}"),
            Action::Raise { to } => write!(f, "raise to {to}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// What the betting round reports as legal for the player to act, and at
/// what sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ValidActions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub call_amount: Chips,
    pub can_bet: bool,
    pub min_bet: Chips,
    pub max_bet: Chips,
    pub can_raise: bool,
    pub min_raise: Chips,
    pub max_raise: Chips,
    pub can_all_in: bool,
    pub all_in_amount: Chips,
}
