use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use shelfwise_core::config::AppConfig;
use shelfwise_core::domain::entities::ShelfEntities;
use shelfwise_core::domain::session::{ConversationTurn, SessionId};
use shelfwise_core::errors::{ApplicationError, DomainError};
use shelfwise_core::intake::{
    is_sufficient, merge, missing_required, next_questions, range_warnings,
};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::llm::LlmClient;
use crate::prompt::{resolve_system_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::response::{self, ExtractionSource};
use crate::session::{SessionStore, StoreError};

#[derive(Clone, Debug)]
pub struct RuntimeSettings {
    pub system_prompt: String,
    pub max_message_chars: usize,
    /// Prior turns sent to the model; 0 sends all of them.
    pub max_history_turns: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_message_chars: 2000,
            max_history_turns: 40,
        }
    }
}

impl RuntimeSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        Ok(Self {
            system_prompt: resolve_system_prompt(config.oracle.system_prompt_path.as_deref())?,
            max_message_chars: config.intake.max_message_chars,
            max_history_turns: config.oracle.max_history_turns,
        })
    }
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("language model failure: {0}")]
    Oracle(String),
}

impl From<IntakeError> for ApplicationError {
    fn from(value: IntakeError) -> Self {
        match value {
            IntakeError::Domain(error) => Self::Domain(error),
            IntakeError::Store(error) => Self::Persistence(error.to_string()),
            IntakeError::Oracle(message) => Self::Oracle(message),
        }
    }
}

/// Result of one chat turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub correlation_id: String,
    pub reply: String,
    pub entities: ShelfEntities,
    pub sufficient: bool,
    pub next_questions: Vec<String>,
    pub warnings: Vec<String>,
    pub extraction: ExtractionSource,
}

/// Drives the intake conversation: model call, parse, merge, evaluate, ask.
///
/// Turns for the same session run one at a time; different sessions proceed
/// concurrently.
pub struct IntakeRuntime {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn SessionStore>,
    settings: RuntimeSettings,
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl IntakeRuntime {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn SessionStore>,
        settings: RuntimeSettings,
    ) -> Self {
        Self { llm, store, settings, locks: Mutex::default() }
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub async fn handle_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<TurnOutcome, IntakeError> {
        let correlation_id = Uuid::new_v4().to_string();
        let session_id = SessionId::parse(session_id)?;
        let message = validate_message(message, self.settings.max_message_chars)?;

        let lock = self.session_lock(&session_id).await;
        let outcome = {
            let _turn = lock.lock().await;
            self.run_turn(&session_id, message, correlation_id).await
        };
        drop(lock);
        self.release_lock(&session_id).await;

        outcome
    }

    pub async fn history(&self, session_id: &str) -> Result<Vec<ConversationTurn>, IntakeError> {
        let session_id = SessionId::parse(session_id)?;
        let session = self.store.find(&session_id).await?;
        Ok(session.map(|session| session.turns).unwrap_or_default())
    }

    pub async fn entities(&self, session_id: &str) -> Result<ShelfEntities, IntakeError> {
        let session_id = SessionId::parse(session_id)?;
        let session = self.store.find(&session_id).await?;
        Ok(session.map(|session| session.entities).unwrap_or_default())
    }

    /// Forgets a session. Clearing an unknown session succeeds and returns `false`.
    pub async fn clear(&self, session_id: &str) -> Result<bool, IntakeError> {
        let session_id = SessionId::parse(session_id)?;

        let lock = self.session_lock(&session_id).await;
        let removed = {
            let _turn = lock.lock().await;
            self.store.delete(&session_id).await?
        };
        drop(lock);
        self.release_lock(&session_id).await;

        tracing::info!(
            event_name = "intake.session.cleared",
            session_id = %session_id,
            removed,
            "session cleared"
        );
        Ok(removed)
    }

    pub async fn session_count(&self) -> Result<usize, IntakeError> {
        Ok(self.store.count().await?)
    }

    async fn run_turn(
        &self,
        session_id: &SessionId,
        message: &str,
        correlation_id: String,
    ) -> Result<TurnOutcome, IntakeError> {
        let session = self.store.get(session_id).await?;
        let user_turn = ConversationTurn::user(message);

        let mut history = recent_turns(&session.turns, self.settings.max_history_turns).to_vec();
        history.push(user_turn.clone());

        tracing::info!(
            event_name = "intake.turn.received",
            correlation_id = %correlation_id,
            session_id = %session_id,
            history_turns = history.len(),
            "processing chat turn"
        );

        let raw = self.llm.complete(&history, &self.settings.system_prompt).await.map_err(
            |error| {
                tracing::warn!(
                    event_name = "intake.oracle.failed",
                    correlation_id = %correlation_id,
                    session_id = %session_id,
                    error = %format!("{error:#}"),
                    "language model call failed"
                );
                IntakeError::Oracle(format!("{error:#}"))
            },
        )?;

        let parsed = response::parse(&raw);
        if let Some(reason) = &parsed.malformed_reason {
            tracing::warn!(
                event_name = "intake.payload.malformed",
                correlation_id = %correlation_id,
                session_id = %session_id,
                reason = %reason,
                "structured payload could not be decoded, using text extraction"
            );
        }
        if !parsed.ignored.is_empty() {
            tracing::debug!(
                event_name = "intake.payload.ignored",
                correlation_id = %correlation_id,
                ignored = ?parsed.ignored,
                "dropped unknown payload keys or values"
            );
        }

        let entities = merge(&session.entities, &parsed.entities);
        let sufficient = is_sufficient(&entities);
        let next_questions = next_questions(&entities, sufficient);
        let warnings = range_warnings(&entities);

        if parsed.source == ExtractionSource::Structured && parsed.claimed_sufficient != sufficient
        {
            tracing::debug!(
                event_name = "intake.payload.sufficiency_mismatch",
                correlation_id = %correlation_id,
                claimed = parsed.claimed_sufficient,
                computed = sufficient,
                "model sufficiency claim disagrees with entity state"
            );
        }

        self.store
            .put(session_id, entities.clone(), vec![user_turn, ConversationTurn::assistant(raw)])
            .await?;

        tracing::info!(
            event_name = "intake.turn.completed",
            correlation_id = %correlation_id,
            session_id = %session_id,
            extraction = ?parsed.source,
            sufficient,
            fields = entities.present_fields().len(),
            missing = ?missing_required(&entities),
            "chat turn completed"
        );

        Ok(TurnOutcome {
            correlation_id,
            reply: parsed.reply,
            entities,
            sufficient,
            next_questions,
            warnings,
            extraction: parsed.source,
        })
    }

    async fn session_lock(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(session_id.clone()).or_default().clone()
    }

    /// Drops the map entry once no turn or clear holds or awaits the lock.
    async fn release_lock(&self, session_id: &SessionId) {
        let mut locks = self.locks.lock().await;
        if locks.get(session_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(session_id);
        }
    }
}

fn validate_message(message: &str, max_chars: usize) -> Result<&str, DomainError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidMessage("message must not be empty".to_string()));
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::InvalidMessage(format!(
            "message must be at most {max_chars} characters"
        )));
    }
    Ok(trimmed)
}

fn recent_turns(turns: &[ConversationTurn], limit: usize) -> &[ConversationTurn] {
    if limit == 0 {
        return turns;
    }
    &turns[turns.len().saturating_sub(limit)..]
}
