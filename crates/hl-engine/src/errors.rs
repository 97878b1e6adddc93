use hl_core::{Chips, Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BettingError {
    #[error("no player occupies seat {0}")]
    NoSuchSeat(Position),
    #[error("it is not seat {actual}'s turn to act (expected {expected})")]
    NotYourTurn { expected: Position, actual: Position },
    #[error("player at seat {0} is not active")]
    PlayerNotActive(Position),
    #[error("check is not legal while a bet of {0} is outstanding")]
    CannotCheck(Chips),
    #[error("bet is not legal once a bet of {0} is already outstanding")]
    CannotBet(Chips),
    #[error("raise is not legal before any bet is outstanding")]
    CannotRaiseWithoutBet,
    #[error("amount {amount} is below the minimum of {minimum}")]
    BelowMinimum { amount: Chips, minimum: Chips },
    #[error("amount {amount} exceeds the maximum of {maximum}")]
    AboveMaximum { amount: Chips, maximum: Chips },
    #[error("there is no bet to call")]
    NothingToCall,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReducerError {
    #[error("command {command} is not valid while the hand is in phase {phase}")]
    WrongPhase { command: &'static str, phase: String },
    #[error(transparent)]
    Betting(#[from] BettingError),
    #[error("hand requires at least two players to start, found {0}")]
    NotEnoughPlayers(usize),
    #[error("deck is exhausted; cannot deal the next card")]
    DeckExhausted,
}
