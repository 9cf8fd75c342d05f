//! In-Memory Store
//!
//! Reference implementation of [`SessionStore`] with optimistic
//! concurrency: one version counter per document, conditional writes, and
//! a linear scan for the by-code secondary lookup. BTreeMap keeps
//! iteration order deterministic for tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::session::state::{GameSession, Player, SessionId};
use crate::store::{SessionStore, StoreError, Versioned};

/// In-memory, process-local session store.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<SessionId, Versioned<GameSession>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: &SessionId) -> Result<Option<Versioned<GameSession>>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.get(id).cloned())
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Versioned<GameSession>>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.values().find(|v| v.doc.code == code).cloned())
    }

    async fn insert(&self, session: GameSession) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&session.id) {
            return Err(StoreError::AlreadyExists);
        }
        docs.insert(
            session.id.clone(),
            Versioned {
                version: 1,
                doc: session,
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        expected_version: u64,
        session: GameSession,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let entry = docs.get_mut(&session.id).ok_or(StoreError::Missing)?;
        if entry.version != expected_version {
            return Err(StoreError::Conflict);
        }
        entry.version += 1;
        entry.doc = session;
        Ok(())
    }

    async fn append_player(&self, id: &SessionId, player: Player) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let entry = docs.get_mut(id).ok_or(StoreError::Missing)?;
        // Array-union semantics: identity already present means no-op.
        if !entry.doc.players.iter().any(|p| p.id == player.id) {
            entry.doc.players.push(player);
            entry.version += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Color;
    use crate::session::state::PlayerId;
    use chrono::Utc;

    fn session(code: &str) -> GameSession {
        GameSession::new(code.into(), PlayerId::from("alice"), Utc::now())
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = MemoryStore::new();
        let s = session("AAAAA");
        let id = s.id.clone();

        store.insert(s).await.unwrap();
        let found = store.get(&id).await.unwrap().unwrap();
        assert_eq!(found.version, 1);
        assert_eq!(found.doc.code, "AAAAA");
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let s = session("AAAAA");
        store.insert(s.clone()).await.unwrap();
        assert!(matches!(
            store.insert(s).await,
            Err(StoreError::AlreadyExists)
        ));
    }

    #[tokio::test]
    async fn find_by_code_matches_at_most_one() {
        let store = MemoryStore::new();
        store.insert(session("AAAAA")).await.unwrap();
        store.insert(session("BBBBB")).await.unwrap();

        let found = store.find_by_code("BBBBB").await.unwrap().unwrap();
        assert_eq!(found.doc.code, "BBBBB");
        assert!(store.find_by_code("CCCCC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn conditional_update_detects_conflict() {
        let store = MemoryStore::new();
        let s = session("AAAAA");
        let id = s.id.clone();
        store.insert(s).await.unwrap();

        let read = store.get(&id).await.unwrap().unwrap();

        // First writer commits at the read version.
        let mut first = read.doc.clone();
        first.join(PlayerId::from("bob"), Utc::now()).unwrap();
        store.update(read.version, first).await.unwrap();

        // Second writer still holds the stale version and must lose.
        let mut second = read.doc.clone();
        second.join(PlayerId::from("carol"), Utc::now()).unwrap();
        let err = store.update(read.version, second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        // The committed document is the first writer's.
        let current = store.get(&id).await.unwrap().unwrap();
        assert_eq!(current.version, 2);
        assert_eq!(current.doc.players[1].id, PlayerId::from("bob"));
    }

    #[tokio::test]
    async fn update_of_absent_document_is_missing() {
        let store = MemoryStore::new();
        let s = session("AAAAA");
        assert!(matches!(
            store.update(1, s).await,
            Err(StoreError::Missing)
        ));
    }

    #[tokio::test]
    async fn append_player_is_array_union() {
        let store = MemoryStore::new();
        let s = session("AAAAA");
        let id = s.id.clone();
        store.insert(s).await.unwrap();

        let bob = Player {
            id: PlayerId::from("bob"),
            color: Color::Black,
            joined_at: Utc::now(),
        };
        store.append_player(&id, bob.clone()).await.unwrap();
        store.append_player(&id, bob).await.unwrap();

        let current = store.get(&id).await.unwrap().unwrap();
        assert_eq!(current.doc.players.len(), 2);
    }
}
