use std::collections::HashMap;

use async_trait::async_trait;
use shelfwise_core::domain::entities::ShelfEntities;
use shelfwise_core::domain::session::{ConversationTurn, Session, SessionId};
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store is unavailable: {0}")]
    Unavailable(String),
}

/// Keyed conversation state.
///
/// `get` never fails for an unknown id: it returns a fresh empty session,
/// which only becomes durable once `put` is called for it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &SessionId) -> Result<Session, StoreError>;
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;
    async fn put(
        &self,
        id: &SessionId,
        entities: ShelfEntities,
        turns: Vec<ConversationTurn>,
    ) -> Result<(), StoreError>;
    async fn delete(&self, id: &SessionId) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Process-local store bounded to `max_sessions` conversations.
///
/// Adding a session beyond capacity evicts the least recently updated one.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self { sessions: RwLock::default(), max_sessions: max_sessions.max(1) }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Session, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned().unwrap_or_else(|| Session::new(id.clone())))
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn put(
        &self,
        id: &SessionId,
        entities: ShelfEntities,
        turns: Vec<ConversationTurn>,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(id) && sessions.len() >= self.max_sessions {
            let stalest = sessions
                .values()
                .min_by_key(|session| session.updated_at)
                .map(|session| session.id.clone());
            if let Some(stalest) = stalest {
                sessions.remove(&stalest);
                tracing::info!(
                    event_name = "intake.session.evicted",
                    session_id = %stalest,
                    max_sessions = self.max_sessions,
                    "evicted least recently updated session"
                );
            }
        }

        sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()))
            .record(entities, turns);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.sessions.read().await.len())
    }
}
