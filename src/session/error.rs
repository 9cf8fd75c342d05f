//! Session error taxonomy.
//!
//! Every business-rule failure maps to a distinct, stable machine-readable
//! code so callers never see a generic failure for a rule violation. All of
//! these are terminal for the triggering request; only store write conflicts
//! are retried, and that happens below this layer.

use crate::game::board::InvalidSquare;
use crate::store::StoreError;

/// Errors reported by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Malformed square token in a submitted move.
    #[error(transparent)]
    InvalidSquare(#[from] InvalidSquare),

    /// Join code empty or malformed after normalization.
    #[error("invalid game code")]
    InvalidCode,

    /// No session exists for the given id or code.
    #[error("game not found")]
    NotFound,

    /// Session already has two distinct players.
    #[error("this game already has two players")]
    GameFull,

    /// Caller is not a participant in the session.
    #[error("you are not a player in this game")]
    Forbidden,

    /// Session has already ended.
    #[error("game is over")]
    GameOver,

    /// Side to move does not match the caller's color.
    #[error("it is not your turn")]
    NotYourTurn,

    /// The legality engine rejected the move.
    #[error("move is not legal")]
    IllegalMove,

    /// Could not generate a collision-free join code.
    #[error("could not generate a unique game code")]
    CodeExhausted,

    /// Underlying store failure (infrastructure fault, not a rule).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidSquare(_) => "invalid_move",
            SessionError::InvalidCode => "invalid_code",
            SessionError::NotFound => "not_found",
            SessionError::GameFull => "game_full",
            SessionError::Forbidden => "forbidden",
            SessionError::GameOver => "game_over",
            SessionError::NotYourTurn => "not_your_turn",
            SessionError::IllegalMove => "illegal_move",
            SessionError::CodeExhausted => "server_error",
            SessionError::Store(_) => "server_error",
        }
    }
}
