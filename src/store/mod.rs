//! Transactional Document Store Contract
//!
//! The session core treats persistence as an external key-document store
//! and depends on exactly four capabilities: point lookup by id, lookup by
//! join code (at most one match), atomic conditional update over a single
//! document, and an append-only array-union write for the player list.
//!
//! Conditional updates are optimistic: every stored document carries a
//! version, and a write commits only if the version is unchanged since the
//! read. Callers resolve [`StoreError::Conflict`] by retrying the whole
//! read-modify-write, never by waiting on a lock.

pub mod memory;

use async_trait::async_trait;

use crate::session::state::{GameSession, Player, SessionId};

pub use memory::MemoryStore;

/// Store-level failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Conditional write lost: the document changed since it was read.
    #[error("write conflict: document changed since read")]
    Conflict,

    /// Write addressed a document that does not exist.
    #[error("document not found")]
    Missing,

    /// A document with this id already exists.
    #[error("document already exists")]
    AlreadyExists,

    /// Infrastructure fault in the underlying store.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A stored document paired with its optimistic-concurrency version.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// Version at read time; increments on every committed write.
    pub version: u64,
    /// The document itself.
    pub doc: T,
}

/// The store contract required by the session core.
///
/// Implementations must make [`update`](SessionStore::update) atomic with
/// respect to concurrent writers of the same document. Nothing beyond these
/// four operations is assumed.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Point lookup by session id.
    async fn get(&self, id: &SessionId) -> Result<Option<Versioned<GameSession>>, StoreError>;

    /// Lookup by join code; at most one session matches.
    async fn find_by_code(&self, code: &str)
        -> Result<Option<Versioned<GameSession>>, StoreError>;

    /// Durable insert of a new session document at version 1.
    async fn insert(&self, session: GameSession) -> Result<(), StoreError>;

    /// Atomic conditional replace: commits only if the stored version still
    /// equals `expected_version`, otherwise fails with
    /// [`StoreError::Conflict`].
    async fn update(
        &self,
        expected_version: u64,
        session: GameSession,
    ) -> Result<(), StoreError>;

    /// Append-only array-union write for the player list: adds the player
    /// unless a player with the same id is already present. Usable outside
    /// a transaction for simple cases; the join path itself goes through
    /// [`update`](SessionStore::update).
    async fn append_player(&self, id: &SessionId, player: Player) -> Result<(), StoreError>;
}
