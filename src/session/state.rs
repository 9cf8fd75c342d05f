//! Session State
//!
//! The shared session document: board, players, move history, status. All
//! mutation goes through the lifecycle manager (creation/join) or the move
//! coordinator (moves/resignation); the methods here are the single place
//! the state-machine invariants live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::board::{Board, Color, Square};
use crate::session::error::SessionError;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque session identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Allocate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque player identity token. Origin (header, body field, anonymous
/// generation) is the transport layer's concern.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an identity token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// View as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// PLAYERS AND MOVES
// =============================================================================

/// A participant in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Identity token.
    pub id: PlayerId,
    /// Assigned color; unique within a session.
    pub color: Color,
    /// When the player joined.
    pub joined_at: DateTime<Utc>,
}

/// One committed half-move. Immutable once appended; the ordered sequence
/// of these records is the session's authoritative history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// When the move was committed.
    pub at: DateTime<Utc>,
    /// Acting color.
    pub by: Color,
}

// =============================================================================
// STATUS AND RESULT
// =============================================================================

/// Session lifecycle status. Transitions are forward-only:
/// `Waiting -> Active -> Over`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Lobby: one player, waiting for an opponent.
    Waiting,
    /// Both players present, moves accepted.
    Active,
    /// Finished; no further moves.
    Over,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// A participant resigned. The only terminal condition in scope;
    /// checkmate/stalemate detection is deliberately not implemented.
    Resignation,
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Terminal condition.
    pub reason: EndReason,
    /// Winning color, if any.
    pub winner: Option<Color>,
}

// =============================================================================
// SESSION
// =============================================================================

/// The shared session document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Opaque identity.
    pub id: SessionId,
    /// Human join code, uppercase alphanumeric.
    pub code: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Current position.
    pub board: Board,
    /// Append-only move history.
    pub moves: Vec<MoveRecord>,
    /// Side to move; flips exactly once per accepted move.
    pub turn: Color,
    /// Participants, at most two, colors unique, slot 0 is white.
    pub players: Vec<Player>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Terminal result, set exactly once.
    pub result: Option<GameResult>,
}

impl GameSession {
    /// Create a fresh session in `Waiting` with the creator seated as white.
    pub fn new(code: String, creator: PlayerId, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            code,
            created_at: now,
            board: Board::initial(),
            moves: Vec::new(),
            turn: Color::White,
            players: vec![Player {
                id: creator,
                color: Color::White,
                joined_at: now,
            }],
            status: GameStatus::Waiting,
            result: None,
        }
    }

    /// Find a participant by identity.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Color of a participant, resolved by slot index (slot 0 is white).
    pub fn color_of(&self, id: &PlayerId) -> Option<Color> {
        self.players.iter().position(|p| &p.id == id).map(|idx| {
            if idx == 0 {
                Color::White
            } else {
                Color::Black
            }
        })
    }

    /// Whether the session has ended.
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over || self.result.is_some()
    }

    /// Seat a joining player.
    ///
    /// Idempotent for identities already seated: returns the existing color
    /// without mutating anything, which is what makes reconnection safe.
    /// Otherwise assigns black, and flips `Waiting -> Active` once both
    /// seats are filled.
    pub fn join(&mut self, joiner: PlayerId, now: DateTime<Utc>) -> Result<Color, SessionError> {
        if let Some(existing) = self.player(&joiner) {
            return Ok(existing.color);
        }
        if self.players.len() >= 2 {
            return Err(SessionError::GameFull);
        }
        let color = if self.players.is_empty() {
            Color::White
        } else {
            Color::Black
        };
        self.players.push(Player {
            id: joiner,
            color,
            joined_at: now,
        });
        if self.players.len() >= 2 && self.status == GameStatus::Waiting {
            self.status = GameStatus::Active;
        }
        Ok(color)
    }

    /// Append an accepted move: record it, advance the board (including
    /// auto-queen promotion), and flip the side to move.
    pub fn record_move(&mut self, from: Square, to: Square, by: Color, now: DateTime<Utc>) {
        self.moves.push(MoveRecord { from, to, at: now, by });
        self.board.apply_move(from, to);
        self.turn = self.turn.opposite();
    }

    /// End the session by resignation of `loser`.
    pub fn resign(&mut self, loser: Color) {
        self.status = GameStatus::Over;
        self.result = Some(GameResult {
            reason: EndReason::Resignation,
            winner: Some(loser.opposite()),
        });
    }
}
