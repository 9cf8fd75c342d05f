//! Move Transaction Coordinator
//!
//! Applies one submitted move (or a resignation) to a session as a single
//! atomic read-modify-write. Turn ownership and legality are checked inside
//! the transaction, so a stale read can never produce a lost update: on a
//! commit conflict the whole check-and-apply cycle reruns against the fresh
//! document.

use chrono::Utc;
use tracing::{info, warn};

use crate::game::board::Square;
use crate::game::rules::is_legal;
use crate::session::error::SessionError;
use crate::session::lifecycle::SessionService;
use crate::session::state::{GameSession, PlayerId, SessionId};
use crate::session::with_session;
use crate::store::SessionStore;

impl<S: SessionStore> SessionService<S> {
    /// Submit one half-move.
    ///
    /// Inside the transaction, in order: the caller must be a participant,
    /// the session must not be over, it must be the caller's turn, and the
    /// legality engine must accept the move against the current board. Then
    /// the move record is appended, the board advanced (pawns reaching the
    /// last rank become queens), and the side to move flipped, all
    /// committed as one conditional write. Business failures leave the
    /// session untouched.
    pub async fn submit_move(
        &self,
        session_id: &SessionId,
        caller: &PlayerId,
        from: &str,
        to: &str,
    ) -> Result<GameSession, SessionError> {
        let from = Square::parse(from)?;
        let to = Square::parse(to)?;
        let now = Utc::now();

        let result = with_session(self.store().as_ref(), session_id, |doc| {
            let color = doc.color_of(caller).ok_or(SessionError::Forbidden)?;
            if doc.is_over() {
                return Err(SessionError::GameOver);
            }
            if doc.turn != color {
                return Err(SessionError::NotYourTurn);
            }
            if !is_legal(&doc.board, from, to, color) {
                return Err(SessionError::IllegalMove);
            }
            doc.record_move(from, to, color, now);
            Ok(color)
        })
        .await;

        match result {
            Ok((session, color)) => {
                info!(
                    session_id = %session.id,
                    player = %caller,
                    %color,
                    %from,
                    %to,
                    next = %session.turn,
                    "move accepted"
                );
                Ok(session)
            }
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    player = %caller,
                    %from,
                    %to,
                    error = %e,
                    "move rejected"
                );
                Err(e)
            }
        }
    }

    /// Resign the session on behalf of `caller`, awarding the opponent.
    ///
    /// The only path to `Over` in the enforced rule subset. Participants
    /// only; rejected once the session has already ended.
    pub async fn resign(
        &self,
        session_id: &SessionId,
        caller: &PlayerId,
    ) -> Result<GameSession, SessionError> {
        let (session, color) = with_session(self.store().as_ref(), session_id, |doc| {
            let color = doc.color_of(caller).ok_or(SessionError::Forbidden)?;
            if doc.is_over() {
                return Err(SessionError::GameOver);
            }
            doc.resign(color);
            Ok(color)
        })
        .await?;

        info!(
            session_id = %session.id,
            player = %caller,
            %color,
            winner = ?session.result.and_then(|r| r.winner),
            "player resigned"
        );
        Ok(session)
    }
}
