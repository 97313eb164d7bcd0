use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shelfwise_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct Field<'a> {
    key_path: &'static str,
    value: String,
    env_keys: &'a [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    CommandResult { exit_code: 0, output: render(&config) }
}

pub fn render(config: &AppConfig) -> String {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["SHELFWISE_SERVER_BIND_ADDRESS"],
        },
        Field {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["SHELFWISE_SERVER_PORT"],
        },
        Field {
            key_path: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["SHELFWISE_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key_path: "oracle.system_prompt_path",
            value: config
                .oracle
                .system_prompt_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<built-in>".to_string()),
            env_keys: &["SHELFWISE_ORACLE_SYSTEM_PROMPT_PATH"],
        },
        Field {
            key_path: "oracle.max_history_turns",
            value: config.oracle.max_history_turns.to_string(),
            env_keys: &["SHELFWISE_ORACLE_MAX_HISTORY_TURNS"],
        },
        Field {
            key_path: "intake.max_message_chars",
            value: config.intake.max_message_chars.to_string(),
            env_keys: &["SHELFWISE_INTAKE_MAX_MESSAGE_CHARS"],
        },
        Field {
            key_path: "sessions.max_sessions",
            value: config.sessions.max_sessions.to_string(),
            env_keys: &["SHELFWISE_SESSIONS_MAX_SESSIONS"],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["SHELFWISE_LOGGING_LEVEL", "SHELFWISE_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            env_keys: &["SHELFWISE_LOGGING_FORMAT", "SHELFWISE_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("shelfwise.toml"), PathBuf::from("config/shelfwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_file_document() {
        let doc: Value = "[server]\nport = 9000\n".parse().expect("toml parses");

        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_names_the_file_and_unset_keys_are_default() {
        let doc: Value = "[sessions]\nmax_sessions = 5\n".parse().expect("toml parses");
        let path = std::path::Path::new("config/shelfwise.toml");

        assert_eq!(
            field_source("sessions.max_sessions", &[], Some(&doc), Some(path)),
            "file (config/shelfwise.toml)"
        );
        assert_eq!(field_source("server.port", &[], Some(&doc), Some(path)), "default");
    }
}
