//! The facade's single response-code taxonomy. Every other
//! component's error enum gets mapped into one of these at the facade
//! boundary; nothing below the facade ever returns a `ResponseCode`
//! directly.
use hl_engine::{BettingError, ReducerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    NotYourTurn,
    InvalidAction,
    InsufficientChips,
    InvalidAmount,
    HandNotInProgress,
    PlayerNotFound,
    PlayerNotActive,
    TableFull,
    SeatTaken,
    ActionTimeout,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FacadeError {
    #[error("{code:?}: {detail}")]
    Rejected { code: ResponseCode, detail: String },
}

impl FacadeError {
    pub fn new(code: ResponseCode, detail: impl Into<String>) -> Self {
        Self::Rejected { code, detail: detail.into() }
    }

    pub fn code(&self) -> ResponseCode {
        match self {
            FacadeError::Rejected { code, .. } => *code,
        }
    }
}

/// Translates a reducer-level error into the facade's response-code
/// vocabulary, the way a thin adapter layer composes inner error
/// taxonomies into one outward-facing surface.
impl From<ReducerError> for FacadeError {
    fn from(err: ReducerError) -> Self {
        match &err {
            ReducerError::Betting(BettingError::NotYourTurn { .. }) => {
                FacadeError::new(ResponseCode::NotYourTurn, err.to_string())
            }
            ReducerError::Betting(BettingError::PlayerNotActive(_)) => {
                FacadeError::new(ResponseCode::PlayerNotActive, err.to_string())
            }
            ReducerError::Betting(BettingError::BelowMinimum { .. } | BettingError::AboveMaximum { .. }) => {
                FacadeError::new(ResponseCode::InvalidAmount, err.to_string())
            }
            ReducerError::Betting(_) => FacadeError::new(ResponseCode::InvalidAction, err.to_string()),
            ReducerError::WrongPhase { .. } => FacadeError::new(ResponseCode::HandNotInProgress, err.to_string()),
            ReducerError::NotEnoughPlayers(_) => FacadeError::new(ResponseCode::HandNotInProgress, err.to_string()),
            ReducerError::DeckExhausted => FacadeError::new(ResponseCode::InternalError, err.to_string()),
        }
    }
}
