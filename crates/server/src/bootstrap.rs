use std::sync::Arc;

use axum::Router;
use shelfwise_agent::{EchoLlmClient, InMemorySessionStore, IntakeRuntime, RuntimeSettings};
use shelfwise_core::config::{AppConfig, ConfigError};
use shelfwise_core::errors::ApplicationError;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{chat, health};

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<IntakeRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("intake runtime could not be initialized: {0}")]
    Runtime(#[source] ApplicationError),
}

impl Application {
    pub fn router(&self) -> Router {
        chat::router(Arc::clone(&self.runtime))
            .merge(health::router(Arc::clone(&self.runtime)))
            .layer(CorsLayer::permissive())
    }
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let settings = RuntimeSettings::from_config(&config).map_err(BootstrapError::Runtime)?;
    let store = Arc::new(InMemorySessionStore::new(config.sessions.max_sessions));
    let runtime = Arc::new(IntakeRuntime::new(Arc::new(EchoLlmClient), store, settings));

    info!(
        event_name = "system.bootstrap.runtime_ready",
        correlation_id = "bootstrap",
        max_sessions = config.sessions.max_sessions,
        custom_prompt = config.oracle.system_prompt_path.is_some(),
        "intake runtime initialized"
    );

    Ok(Application { config, runtime })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use shelfwise_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use tempfile::TempDir;

    use crate::bootstrap::{bootstrap_with_config, BootstrapError};

    #[test]
    fn bootstrap_uses_configured_system_prompt() {
        let dir = TempDir::new().expect("temp dir");
        let prompt_path = dir.path().join("prompt.txt");
        fs::write(&prompt_path, "You design shelves.").expect("write prompt");

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                system_prompt_path: Some(prompt_path),
                max_sessions: Some(5),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config should load");
        let app = bootstrap_with_config(config).expect("bootstrap should succeed");

        assert_eq!(app.runtime.settings().system_prompt, "You design shelves.");
        assert_eq!(app.config.sessions.max_sessions, 5);
    }

    #[test]
    fn bootstrap_fails_fast_on_empty_system_prompt() {
        let dir = TempDir::new().expect("temp dir");
        let prompt_path = dir.path().join("empty.txt");
        fs::write(&prompt_path, "   \n").expect("write prompt");

        let mut config = AppConfig::default();
        config.oracle.system_prompt_path = Some(prompt_path);

        let message = match bootstrap_with_config(config) {
            Err(error @ BootstrapError::Runtime(_)) => error.to_string(),
            Err(other) => panic!("unexpected bootstrap error: {other}"),
            Ok(_) => panic!("expected runtime initialization failure"),
        };
        assert!(message.contains("is empty"));
    }
}
