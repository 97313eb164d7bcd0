pub mod config;
pub mod doctor;
pub mod parse;
pub mod schema;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload)
        .unwrap_or_else(|error| serialization_fallback("unknown", &error))
}

pub(crate) fn serialization_fallback(command: &str, error: &serde_json::Error) -> String {
    format!(
        "{{\"command\":\"{command}\",\"status\":\"error\",\"error_class\":\"serialization\",\
         \"message\":\"{}\"}}",
        error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
    )
}
