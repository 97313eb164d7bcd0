use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ShelfEntities;
use crate::errors::DomainError;

const MAX_SESSION_ID_LEN: usize = 128;

/// Caller-supplied, opaque conversation identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidSessionId("session id must not be empty".to_string()));
        }
        if trimmed.len() > MAX_SESSION_ID_LEN {
            return Err(DomainError::InvalidSessionId(format!(
                "session id must be at most {MAX_SESSION_ID_LEN} bytes"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: TurnRole::User, text: text.into(), at: Utc::now() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: TurnRole::Assistant, text: text.into(), at: Utc::now() }
    }
}

/// One conversation: its accumulated entities and append-only turn log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub entities: ShelfEntities,
    pub turns: Vec<ConversationTurn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            entities: ShelfEntities::default(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the entity state and appends the turns of one exchange.
    pub fn record(
        &mut self,
        entities: ShelfEntities,
        turns: impl IntoIterator<Item = ConversationTurn>,
    ) {
        self.entities = entities;
        self.turns.extend(turns);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::ShelfEntities;

    use super::{ConversationTurn, Session, SessionId, TurnRole};

    #[test]
    fn session_id_is_trimmed_and_bounded() {
        assert_eq!(SessionId::parse("  abc-123 ").expect("valid id").as_str(), "abc-123");
        assert!(SessionId::parse("   ").is_err());
        assert!(SessionId::parse(&"x".repeat(129)).is_err());
    }

    #[test]
    fn record_appends_turns_in_order() {
        let mut session = Session::new(SessionId("s-1".to_string()));
        let entities = ShelfEntities { width: Some(36), ..ShelfEntities::default() };

        session.record(
            entities.clone(),
            [ConversationTurn::user("36 wide"), ConversationTurn::assistant("Got it")],
        );
        session.record(entities.clone(), [ConversationTurn::user("thanks")]);

        let roles = session.turns.iter().map(|turn| turn.role).collect::<Vec<_>>();
        assert_eq!(roles, vec![TurnRole::User, TurnRole::Assistant, TurnRole::User]);
        assert_eq!(session.entities, entities);
        assert!(session.updated_at >= session.created_at);
    }
}
