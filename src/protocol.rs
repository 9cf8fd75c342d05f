//! Protocol Shapes
//!
//! Transport-independent request/response types for the session core. A
//! handler layer (HTTP, WebSocket, whatever) owns routing, identity
//! extraction, and content negotiation; these types fix the payloads and
//! the stable error codes it carries, nothing more.

use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Color};
use crate::session::error::SessionError;
use crate::session::state::{
    GameResult, GameSession, GameStatus, MoveRecord, Player, SessionId,
};

// =============================================================================
// REQUESTS
// =============================================================================

/// Request to create a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Caller identity token.
    pub user_id: String,
}

/// Request to join a session by code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGameRequest {
    /// Join code as typed by the user; normalized server-side.
    pub game_code: String,
    /// Caller identity token.
    pub user_id: String,
}

/// Request to submit a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Target session.
    pub game_id: SessionId,
    /// Caller identity token.
    pub user_id: String,
    /// Source square, file+rank form (`"e2"`).
    pub from: String,
    /// Destination square, file+rank form (`"e4"`).
    pub to: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Response to session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// New session id.
    pub game_id: SessionId,
    /// Shareable join code.
    pub code: String,
}

impl From<&GameSession> for CreateGameResponse {
    fn from(session: &GameSession) -> Self {
        Self {
            game_id: session.id.clone(),
            code: session.code.clone(),
        }
    }
}

/// Response to a join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinGameResponse {
    /// Session id.
    pub game_id: SessionId,
    /// Color assigned to the joiner (existing color on rejoin).
    pub color: Color,
    /// Current seat list.
    pub players: Vec<Player>,
    /// Session status after the join.
    pub status: GameStatus,
}

impl JoinGameResponse {
    /// Build from the post-join session and the assigned color.
    pub fn new(session: &GameSession, color: Color) -> Self {
        Self {
            game_id: session.id.clone(),
            color,
            players: session.players.clone(),
            status: session.status,
        }
    }
}

/// Full post-operation session view returned after a move or resignation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session id.
    pub game_id: SessionId,
    /// Join code.
    pub code: String,
    /// Current position.
    pub board: Board,
    /// Move history, oldest first.
    pub moves: Vec<MoveRecord>,
    /// Side to move.
    pub turn: Color,
    /// Seat list.
    pub players: Vec<Player>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Terminal result, if ended.
    pub result: Option<GameResult>,
}

impl From<&GameSession> for SessionSnapshot {
    fn from(session: &GameSession) -> Self {
        Self {
            game_id: session.id.clone(),
            code: session.code.clone(),
            board: session.board.clone(),
            moves: session.moves.clone(),
            turn: session.turn,
            players: session.players.clone(),
            status: session.status,
            result: session.result,
        }
    }
}

// =============================================================================
// ERRORS ON THE WIRE
// =============================================================================

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code (`"not_your_turn"`, `"game_full"`, ...).
    pub error: String,
    /// Human-readable explanation.
    pub details: String,
}

impl From<&SessionError> for ErrorBody {
    fn from(err: &SessionError) -> Self {
        Self {
            error: err.code().to_string(),
            details: err.to_string(),
        }
    }
}

/// Suggested transport status for an error kind.
pub fn http_status(err: &SessionError) -> u16 {
    match err {
        SessionError::InvalidSquare(_) | SessionError::InvalidCode => 400,
        SessionError::NotFound => 404,
        SessionError::Forbidden => 403,
        SessionError::GameFull | SessionError::NotYourTurn | SessionError::IllegalMove => 409,
        SessionError::GameOver => 410,
        SessionError::CodeExhausted | SessionError::Store(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::PlayerId;
    use chrono::Utc;

    fn sample_session() -> GameSession {
        let mut s = GameSession::new("ABC12".into(), PlayerId::from("alice"), Utc::now());
        s.join(PlayerId::from("bob"), Utc::now()).unwrap();
        s
    }

    #[test]
    fn create_response_carries_id_and_code() {
        let session = sample_session();
        let resp = CreateGameResponse::from(&session);
        assert_eq!(resp.game_id, session.id);
        assert_eq!(resp.code, "ABC12");
    }

    #[test]
    fn snapshot_serializes_with_stable_field_names() {
        let session = sample_session();
        let snapshot = SessionSnapshot::from(&session);
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["code"], "ABC12");
        assert_eq!(value["turn"], "white");
        assert_eq!(value["status"], "active");
        assert_eq!(value["players"][0]["color"], "white");
        assert_eq!(value["players"][1]["color"], "black");
        assert!(value["result"].is_null());
    }

    #[test]
    fn error_body_exposes_stable_codes() {
        let body = ErrorBody::from(&SessionError::NotYourTurn);
        assert_eq!(body.error, "not_your_turn");
        assert!(!body.details.is_empty());
    }

    #[test]
    fn status_mapping_distinguishes_error_kinds() {
        assert_eq!(http_status(&SessionError::InvalidCode), 400);
        assert_eq!(http_status(&SessionError::NotFound), 404);
        assert_eq!(http_status(&SessionError::Forbidden), 403);
        assert_eq!(http_status(&SessionError::GameFull), 409);
        assert_eq!(http_status(&SessionError::NotYourTurn), 409);
        assert_eq!(http_status(&SessionError::IllegalMove), 409);
        assert_eq!(http_status(&SessionError::GameOver), 410);
        assert_eq!(http_status(&SessionError::CodeExhausted), 500);
    }
}
