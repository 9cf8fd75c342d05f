//! Session Layer
//!
//! Lifecycle management and atomic move application over the store
//! contract. All state lives in the store; the services here are stateless
//! and safe to invoke concurrently from any number of request handlers.
//!
//! ## Module Structure
//!
//! - `state`: the session document and its state-machine invariants
//! - `error`: business-rule error taxonomy
//! - `code`: join-code generation and normalization
//! - `lifecycle`: session creation and join
//! - `moves`: move transaction coordinator and resignation

pub mod code;
pub mod error;
pub mod lifecycle;
pub mod moves;
pub mod state;

pub use code::{generate_code, normalize_code};
pub use error::SessionError;
pub use lifecycle::SessionService;
pub use state::{GameSession, GameStatus, MoveRecord, Player, PlayerId, SessionId};

use crate::store::{SessionStore, StoreError};
use crate::TXN_MAX_RETRIES;

/// Run one atomic read-modify-write against a session document.
///
/// Reads the current document, applies `mutate`, and commits conditionally
/// on the version being unchanged since the read. A commit conflict means
/// another writer got in between; the whole cycle is retried from the read,
/// up to [`TXN_MAX_RETRIES`] times. Business-rule failures from `mutate`
/// abort immediately with no side effects.
pub(crate) async fn with_session<S, F, T>(
    store: &S,
    id: &SessionId,
    mut mutate: F,
) -> Result<(GameSession, T), SessionError>
where
    S: SessionStore + ?Sized,
    F: FnMut(&mut GameSession) -> Result<T, SessionError>,
{
    for attempt in 0..TXN_MAX_RETRIES {
        let read = store.get(id).await?.ok_or(SessionError::NotFound)?;
        let mut doc = read.doc;
        let out = mutate(&mut doc)?;
        match store.update(read.version, doc.clone()).await {
            Ok(()) => return Ok((doc, out)),
            Err(StoreError::Conflict) => {
                tracing::debug!(session_id = %id, attempt, "commit conflict, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(SessionError::Store(StoreError::Conflict))
}
