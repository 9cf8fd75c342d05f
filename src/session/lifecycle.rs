//! Session Lifecycle Manager
//!
//! Creation and join. The service holds an injected store handle with an
//! explicit lifecycle: constructed once at process start, shared by every
//! request handler. There is no ambient or lazily-initialized store state.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::game::board::Color;
use crate::session::code::{generate_code, normalize_code};
use crate::session::error::SessionError;
use crate::session::state::{GameSession, PlayerId};
use crate::session::with_session;
use crate::store::SessionStore;
use crate::CODE_MAX_ATTEMPTS;

/// Stateless session service over an injected store.
#[derive(Clone)]
pub struct SessionService<S> {
    store: Arc<S>,
}

impl<S: SessionStore> SessionService<S> {
    /// Create a service over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create a new session: allocate a join code, seat the creator as
    /// white, and write the `Waiting` session document durably.
    pub async fn create_session(&self, creator: PlayerId) -> Result<GameSession, SessionError> {
        let code = generate_code(self.store.as_ref(), CODE_MAX_ATTEMPTS).await?;
        let session = GameSession::new(code, creator, Utc::now());
        self.store.insert(session.clone()).await?;

        info!(
            session_id = %session.id,
            code = %session.code,
            "session created, waiting for opponent"
        );
        Ok(session)
    }

    /// Join a session by code.
    ///
    /// The code is normalized before lookup. Rejoining with a seated
    /// identity is idempotent and returns that player's color. Otherwise
    /// the joiner is seated as black and the session flips to `Active`;
    /// seat check, append, and status flip commit as one atomic update so
    /// two simultaneous joiners can never both be admitted as black.
    pub async fn join_session(
        &self,
        code: &str,
        joiner: PlayerId,
    ) -> Result<(GameSession, Color), SessionError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(SessionError::InvalidCode);
        }

        let found = self
            .store
            .find_by_code(&code)
            .await?
            .ok_or(SessionError::NotFound)?;
        let id = found.doc.id.clone();

        let now = Utc::now();
        let result = with_session(self.store.as_ref(), &id, |doc| {
            doc.join(joiner.clone(), now)
        })
        .await;

        match &result {
            Ok((session, color)) => info!(
                session_id = %session.id,
                code = %session.code,
                player = %joiner,
                %color,
                status = ?session.status,
                "player joined"
            ),
            Err(e) => warn!(code = %code, player = %joiner, error = %e, "join rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::GameStatus;
    use crate::store::MemoryStore;
    use crate::CODE_LENGTH;

    fn service() -> SessionService<MemoryStore> {
        SessionService::new(Arc::new(MemoryStore::new()))
    }

    // Scenario: create session -> code length 5, status waiting, one
    // player colored white.
    #[tokio::test]
    async fn create_session_opens_lobby() {
        let svc = service();
        let session = svc.create_session(PlayerId::from("alice")).await.unwrap();

        assert_eq!(session.code.len(), CODE_LENGTH);
        assert_eq!(session.status, GameStatus::Waiting);
        assert_eq!(session.players.len(), 1);
        assert_eq!(session.players[0].color, Color::White);

        // The write is durable.
        let stored = svc.store().get(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.doc, session);
    }

    // Scenario: join with the code using a second identity -> status
    // becomes active, second player colored black.
    #[tokio::test]
    async fn second_identity_joins_as_black() {
        let svc = service();
        let created = svc.create_session(PlayerId::from("alice")).await.unwrap();

        let (session, color) = svc
            .join_session(&created.code, PlayerId::from("bob"))
            .await
            .unwrap();

        assert_eq!(color, Color::Black);
        assert_eq!(session.status, GameStatus::Active);
        assert_eq!(session.players.len(), 2);
    }

    #[tokio::test]
    async fn join_normalizes_code_before_lookup() {
        let svc = service();
        let created = svc.create_session(PlayerId::from("alice")).await.unwrap();

        let sloppy = format!("  {} ", created.code.to_lowercase());
        let (session, _) = svc
            .join_session(&sloppy, PlayerId::from("bob"))
            .await
            .unwrap();
        assert_eq!(session.id, created.id);
    }

    #[tokio::test]
    async fn empty_code_after_normalization_is_invalid() {
        let svc = service();
        let err = svc
            .join_session("--- ---", PlayerId::from("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCode));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let svc = service();
        let err = svc
            .join_session("ZZZZZ", PlayerId::from("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound));
    }

    // Idempotence: joining twice with the same identity returns the same
    // color and does not duplicate the player entry.
    #[tokio::test]
    async fn rejoin_returns_same_color_without_duplication() {
        let svc = service();
        let created = svc.create_session(PlayerId::from("alice")).await.unwrap();
        svc.join_session(&created.code, PlayerId::from("bob"))
            .await
            .unwrap();

        let (session, color) = svc
            .join_session(&created.code, PlayerId::from("bob"))
            .await
            .unwrap();
        assert_eq!(color, Color::Black);
        assert_eq!(session.players.len(), 2);

        // The creator reconnecting gets white back.
        let (_, creator_color) = svc
            .join_session(&created.code, PlayerId::from("alice"))
            .await
            .unwrap();
        assert_eq!(creator_color, Color::White);
    }

    // Scenario: a third identity attempts to join a session already at two
    // distinct players -> game full.
    #[tokio::test]
    async fn third_identity_is_rejected_with_game_full() {
        let svc = service();
        let created = svc.create_session(PlayerId::from("alice")).await.unwrap();
        svc.join_session(&created.code, PlayerId::from("bob"))
            .await
            .unwrap();

        let err = svc
            .join_session(&created.code, PlayerId::from("carol"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::GameFull));

        let stored = svc.store().get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.doc.players.len(), 2);
    }

    // Two near-simultaneous joiners: exactly one is admitted as black, the
    // other observes a full game; never two black players.
    #[tokio::test]
    async fn concurrent_joins_admit_exactly_one_black() {
        let svc = service();
        let created = svc.create_session(PlayerId::from("alice")).await.unwrap();

        let a = svc.join_session(&created.code, PlayerId::from("bob"));
        let b = svc.join_session(&created.code, PlayerId::from("carol"));
        let (ra, rb) = tokio::join!(a, b);

        let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let failure = if ra.is_err() { ra } else { rb };
        assert!(matches!(failure, Err(SessionError::GameFull)));

        let stored = svc.store().get(&created.id).await.unwrap().unwrap();
        let blacks = stored
            .doc
            .players
            .iter()
            .filter(|p| p.color == Color::Black)
            .count();
        assert_eq!(blacks, 1);
        assert_eq!(stored.doc.status, GameStatus::Active);
    }
}
