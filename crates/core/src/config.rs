use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub oracle: OracleConfig,
    pub intake: IntakeConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Replaces the built-in designer prompt when set.
    pub system_prompt_path: Option<PathBuf>,
    /// Most recent turns sent to the model; 0 sends the whole conversation.
    pub max_history_turns: usize,
}

#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub max_message_chars: usize,
}

#[derive(Clone, Debug)]
pub struct SessionsConfig {
    pub max_sessions: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub system_prompt_path: Option<PathBuf>,
    pub max_sessions: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                graceful_shutdown_secs: 15,
            },
            oracle: OracleConfig { system_prompt_path: None, max_history_turns: 40 },
            intake: IntakeConfig { max_message_chars: 2000 },
            sessions: SessionsConfig { max_sessions: 10_000 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shelfwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(oracle) = patch.oracle {
            if let Some(system_prompt_path) = oracle.system_prompt_path {
                self.oracle.system_prompt_path = Some(system_prompt_path);
            }
            if let Some(max_history_turns) = oracle.max_history_turns {
                self.oracle.max_history_turns = max_history_turns;
            }
        }

        if let Some(intake) = patch.intake {
            if let Some(max_message_chars) = intake.max_message_chars {
                self.intake.max_message_chars = max_message_chars;
            }
        }

        if let Some(sessions) = patch.sessions {
            if let Some(max_sessions) = sessions.max_sessions {
                self.sessions.max_sessions = max_sessions;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHELFWISE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SHELFWISE_SERVER_PORT") {
            self.server.port = parse_u16("SHELFWISE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("SHELFWISE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SHELFWISE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("SHELFWISE_ORACLE_SYSTEM_PROMPT_PATH") {
            self.oracle.system_prompt_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("SHELFWISE_ORACLE_MAX_HISTORY_TURNS") {
            self.oracle.max_history_turns =
                parse_usize("SHELFWISE_ORACLE_MAX_HISTORY_TURNS", &value)?;
        }

        if let Some(value) = read_env("SHELFWISE_INTAKE_MAX_MESSAGE_CHARS") {
            self.intake.max_message_chars =
                parse_usize("SHELFWISE_INTAKE_MAX_MESSAGE_CHARS", &value)?;
        }

        if let Some(value) = read_env("SHELFWISE_SESSIONS_MAX_SESSIONS") {
            self.sessions.max_sessions = parse_usize("SHELFWISE_SESSIONS_MAX_SESSIONS", &value)?;
        }

        let log_level =
            read_env("SHELFWISE_LOGGING_LEVEL").or_else(|| read_env("SHELFWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHELFWISE_LOGGING_FORMAT").or_else(|| read_env("SHELFWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(system_prompt_path) = overrides.system_prompt_path {
            self.oracle.system_prompt_path = Some(system_prompt_path);
        }
        if let Some(max_sessions) = overrides.max_sessions {
            self.sessions.max_sessions = max_sessions;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_oracle(&self.oracle)?;
        validate_intake(&self.intake)?;
        validate_sessions(&self.sessions)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shelfwise.toml"), PathBuf::from("config/shelfwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_oracle(oracle: &OracleConfig) -> Result<(), ConfigError> {
    if let Some(path) = &oracle.system_prompt_path {
        if !path.is_file() {
            return Err(ConfigError::Validation(format!(
                "oracle.system_prompt_path `{}` does not point to a readable file",
                path.display()
            )));
        }
    }

    Ok(())
}

fn validate_intake(intake: &IntakeConfig) -> Result<(), ConfigError> {
    if intake.max_message_chars == 0 || intake.max_message_chars > 100_000 {
        return Err(ConfigError::Validation(
            "intake.max_message_chars must be in range 1..=100000".to_string(),
        ));
    }

    Ok(())
}

fn validate_sessions(sessions: &SessionsConfig) -> Result<(), ConfigError> {
    if sessions.max_sessions == 0 {
        return Err(ConfigError::Validation(
            "sessions.max_sessions must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    oracle: Option<OraclePatch>,
    intake: Option<IntakePatch>,
    sessions: Option<SessionsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct OraclePatch {
    system_prompt_path: Option<PathBuf>,
    max_history_turns: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct IntakePatch {
    max_message_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionsPatch {
    max_sessions: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_any_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.server.port == 8000, "default port should be 8000")?;
        ensure(config.sessions.max_sessions == 10_000, "default session cap should be 10000")?;
        ensure(config.oracle.system_prompt_path.is_none(), "built-in prompt is the default")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_SHELFWISE_BIND", "0.0.0.0");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("shelfwise.toml");
            fs::write(
                &path,
                r#"
[server]
bind_address = "${TEST_SHELFWISE_BIND}"
port = 9100

[oracle]
max_history_turns = 12
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.server.bind_address == "0.0.0.0",
                "bind address should be interpolated from environment",
            )?;
            ensure(config.server.port == 9100, "port should come from the file")?;
            ensure(config.oracle.max_history_turns == 12, "history cap should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_SHELFWISE_BIND"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHELFWISE_LOG_LEVEL", "warn");
        env::set_var("SHELFWISE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["SHELFWISE_LOG_LEVEL", "SHELFWISE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHELFWISE_SERVER_PORT", "9200");
        env::set_var("SHELFWISE_SESSIONS_MAX_SESSIONS", "50");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("shelfwise.toml");
            fs::write(
                &path,
                r#"
[server]
port = 9100

[sessions]
max_sessions = 25

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    max_sessions: Some(75),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.sessions.max_sessions == 75, "override session cap should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.server.port == 9200, "env port should win over file and defaults")?;
            Ok(())
        })();

        clear_vars(&["SHELFWISE_SERVER_PORT", "SHELFWISE_SESSIONS_MAX_SESSIONS"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHELFWISE_SESSIONS_MAX_SESSIONS", "0");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("sessions.max_sessions")
            );
            ensure(has_message, "validation failure should mention sessions.max_sessions")
        })();

        clear_vars(&["SHELFWISE_SESSIONS_MAX_SESSIONS"]);
        result
    }

    #[test]
    fn malformed_env_override_is_reported_with_its_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHELFWISE_SERVER_PORT", "eighty");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, value }) => {
                ensure(key == "SHELFWISE_SERVER_PORT", "error should name the variable")?;
                ensure(value == "eighty", "error should echo the rejected value")
            }
            Ok(_) => Err("expected invalid override error".to_string()),
            Err(other) => Err(format!("unexpected error: {other}")),
        };

        clear_vars(&["SHELFWISE_SERVER_PORT"]);
        result
    }

    #[test]
    fn missing_system_prompt_file_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                system_prompt_path: Some(dir.path().join("missing-prompt.txt")),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let mentions_prompt = matches!(
            result,
            Err(ConfigError::Validation(ref message))
                if message.contains("oracle.system_prompt_path")
        );
        ensure(mentions_prompt, "validation failure should mention oracle.system_prompt_path")
    }
}
