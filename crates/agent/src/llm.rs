use std::collections::VecDeque;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use shelfwise_core::domain::session::{ConversationTurn, TurnRole};
use tokio::sync::Mutex;

/// Language model behind the intake conversation.
///
/// `history` ends with the user turn being answered. Implementations return
/// the raw assistant text, payload included.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, history: &[ConversationTurn], system_prompt: &str) -> Result<String>;
}

/// Offline stand-in that acknowledges the latest user message verbatim.
///
/// It never emits a structured payload, so every turn goes through free-text
/// extraction over the echoed message.
#[derive(Clone, Debug, Default)]
pub struct EchoLlmClient;

#[async_trait]
impl LlmClient for EchoLlmClient {
    async fn complete(&self, history: &[ConversationTurn], _system_prompt: &str) -> Result<String> {
        let latest = history
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::User)
            .ok_or_else(|| anyhow!("conversation has no user turn to answer"))?;

        Ok(format!(
            "Thank you for your message: \"{}\"\n\n\
             I'm here to help you design the perfect wire shelving unit! \
             To create your 3D model, I need to know the width, the depth, \
             the overall height and how many shelf levels you want.\n\n\
             Could you tell me about your storage needs and the space you're working with?",
            latest.text
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedReply {
    Text(String),
    Failure(String),
}

/// Replays canned replies in order and records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self { replies: Mutex::new(replies.into_iter().collect()), requests: Mutex::default() }
    }

    pub fn replying(texts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(texts.into_iter().map(|text| ScriptedReply::Text(text.into())))
    }

    /// Histories received so far, one entry per `complete` call.
    pub async fn requests(&self) -> Vec<Vec<ConversationTurn>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, history: &[ConversationTurn], _system_prompt: &str) -> Result<String> {
        self.requests.lock().await.push(history.to_vec());

        match self.replies.lock().await.pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Failure(message)) => bail!(message),
            None => bail!("scripted language model has no replies left"),
        }
    }
}
