//! Chat routes for the shelving configurator front end.
//!
//! - `GET    /` and `GET /api/`: service banner
//! - `POST   /api/chat`: process one chat message
//! - `GET    /api/chat/history/{session_id}`: stored turns (empty for unknown)
//! - `DELETE /api/chat/{session_id}`: forget a session (idempotent)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shelfwise_agent::{IntakeError, IntakeRuntime};
use shelfwise_core::domain::entities::ShelfEntities;
use shelfwise_core::domain::session::ConversationTurn;
use shelfwise_core::errors::{ApplicationError, InterfaceError};
use tracing::{info, warn};
use uuid::Uuid;

const BANNER: &str = "Wire Shelves 3D Configurator API";

#[derive(Clone)]
pub struct ChatState {
    runtime: Arc<IntakeRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub extracted_entities: ShelfEntities,
    pub has_sufficient_entities: bool,
    pub next_questions: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatError {
    pub error: String,
}

type ChatResult<T> = Result<Json<T>, (StatusCode, Json<ChatError>)>;

pub fn router(runtime: Arc<IntakeRuntime>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/", get(banner))
        .route("/api/chat", post(chat))
        .route("/api/chat/history/{session_id}", get(history))
        .route("/api/chat/{session_id}", delete(clear))
        .with_state(ChatState { runtime })
}

async fn banner() -> Json<MessageResponse> {
    Json(MessageResponse { message: BANNER.to_string() })
}

async fn chat(
    State(state): State<ChatState>,
    Json(body): Json<ChatRequest>,
) -> ChatResult<ChatResponse> {
    let outcome = state
        .runtime
        .handle_message(&body.session_id, &body.message)
        .await
        .map_err(|error| error_response(error, &body.session_id))?;

    info!(
        event_name = "http.chat.responded",
        correlation_id = %outcome.correlation_id,
        session_id = %body.session_id,
        sufficient = outcome.sufficient,
        "chat response sent"
    );

    Ok(Json(ChatResponse {
        response: outcome.reply,
        extracted_entities: outcome.entities,
        has_sufficient_entities: outcome.sufficient,
        next_questions: outcome.next_questions,
        warnings: outcome.warnings,
    }))
}

async fn history(
    Path(session_id): Path<String>,
    State(state): State<ChatState>,
) -> ChatResult<Vec<ConversationTurn>> {
    let turns = state
        .runtime
        .history(&session_id)
        .await
        .map_err(|error| error_response(error, &session_id))?;
    Ok(Json(turns))
}

async fn clear(
    Path(session_id): Path<String>,
    State(state): State<ChatState>,
) -> ChatResult<MessageResponse> {
    state.runtime.clear(&session_id).await.map_err(|error| error_response(error, &session_id))?;
    Ok(Json(MessageResponse { message: "Session cleared".to_string() }))
}

fn error_response(error: IntakeError, session_id: &str) -> (StatusCode, Json<ChatError>) {
    let correlation_id = Uuid::new_v4().to_string();
    let interface = ApplicationError::from(error).into_interface(correlation_id);

    warn!(
        event_name = "http.chat.failed",
        correlation_id = %interface.correlation_id(),
        session_id = %session_id,
        error = %interface,
        "chat request failed"
    );

    match &interface {
        InterfaceError::BadRequest { message, .. } => {
            (StatusCode::BAD_REQUEST, Json(ChatError { error: message.clone() }))
        }
        InterfaceError::ChatFailure { .. } | InterfaceError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatError { error: format!("Chat error: {}", interface.user_message()) }),
        ),
    }
}
