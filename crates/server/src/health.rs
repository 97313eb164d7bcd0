use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use shelfwise_agent::IntakeRuntime;

#[derive(Clone)]
pub struct HealthState {
    runtime: Arc<IntakeRuntime>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub sessions: HealthCheck,
    pub active_sessions: Option<usize>,
    pub checked_at: String,
}

pub fn router(runtime: Arc<IntakeRuntime>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { runtime })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let (sessions, active_sessions) = match state.runtime.session_count().await {
        Ok(count) => (
            HealthCheck { status: "ready", detail: format!("{count} active sessions") },
            Some(count),
        ),
        Err(error) => (
            HealthCheck { status: "degraded", detail: format!("session store failed: {error}") },
            None,
        ),
    };
    let ready = sessions.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "shelfwise-server runtime initialized".to_string(),
        },
        sessions,
        active_sessions,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{extract::State, http::StatusCode, Json};
    use shelfwise_agent::{
        EchoLlmClient, InMemorySessionStore, IntakeRuntime, RuntimeSettings, SessionStore,
        StoreError,
    };
    use shelfwise_core::domain::entities::ShelfEntities;
    use shelfwise_core::domain::session::{ConversationTurn, Session, SessionId};

    use crate::health::{health, HealthState};

    struct UnavailableStore;

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn get(&self, _id: &SessionId) -> Result<Session, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        async fn find(&self, _id: &SessionId) -> Result<Option<Session>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        async fn put(
            &self,
            _id: &SessionId,
            _entities: ShelfEntities,
            _turns: Vec<ConversationTurn>,
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        async fn delete(&self, _id: &SessionId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        async fn count(&self) -> Result<usize, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    fn runtime(store: Arc<dyn SessionStore>) -> Arc<IntakeRuntime> {
        Arc::new(IntakeRuntime::new(Arc::new(EchoLlmClient), store, RuntimeSettings::default()))
    }

    #[tokio::test]
    async fn health_reports_active_session_count() {
        let runtime = runtime(Arc::new(InMemorySessionStore::default()));
        runtime.handle_message("h-1", "36 inches wide").await.expect("turn succeeds");

        let (status, Json(payload)) = health(State(HealthState { runtime })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.active_sessions, Some(1));
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_store_fails() {
        let runtime = runtime(Arc::new(UnavailableStore));

        let (status, Json(payload)) = health(State(HealthState { runtime })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.sessions.status, "degraded");
        assert_eq!(payload.active_sessions, None);
    }
}
