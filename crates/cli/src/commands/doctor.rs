use std::sync::Arc;

use serde::Serialize;
use shelfwise_agent::response::{decode_payload, PayloadDecode};
use shelfwise_agent::{EchoLlmClient, InMemorySessionStore, IntakeRuntime, RuntimeSettings};
use shelfwise_core::config::{AppConfig, LoadOptions};

use crate::commands::{serialization_fallback, CommandResult};

const SAMPLE_MESSAGE: &str = "36 inches wide, 18 inches deep, 48 inches tall with 4 shelves";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 3 };

    let output = if json_output {
        serde_json::to_string_pretty(&report)
            .unwrap_or_else(|error| serialization_fallback("doctor", &error))
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match RuntimeSettings::from_config(&config) {
                Ok(settings) => {
                    checks.push(check_prompt_example(&settings.system_prompt));
                    checks.push(check_intake_round_trip(&config, settings));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "system_prompt",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("intake_round_trip", "system prompt did not resolve"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("system_prompt", "configuration did not load"));
            checks.push(skipped("intake_round_trip", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// A prompt that shows the model a payload example must show a decodable one.
fn check_prompt_example(prompt: &str) -> DoctorCheck {
    match decode_payload(prompt) {
        PayloadDecode::Decoded(_) => DoctorCheck {
            name: "system_prompt",
            status: CheckStatus::Pass,
            details: "prompt resolved and its example payload decodes".to_string(),
        },
        PayloadDecode::Absent => DoctorCheck {
            name: "system_prompt",
            status: CheckStatus::Pass,
            details: "prompt resolved (no example payload to check)".to_string(),
        },
        PayloadDecode::Malformed { reason } => DoctorCheck {
            name: "system_prompt",
            status: CheckStatus::Fail,
            details: format!("prompt example payload does not decode: {reason}"),
        },
    }
}

fn check_intake_round_trip(config: &AppConfig, settings: RuntimeSettings) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "intake_round_trip",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let intake = IntakeRuntime::new(
        Arc::new(EchoLlmClient),
        Arc::new(InMemorySessionStore::new(config.sessions.max_sessions)),
        settings,
    );
    let result = runtime.block_on(async {
        let outcome = intake.handle_message("doctor-check", SAMPLE_MESSAGE).await?;
        intake.clear("doctor-check").await?;
        Ok::<_, shelfwise_agent::IntakeError>(outcome)
    });

    match result {
        Ok(outcome) => DoctorCheck {
            name: "intake_round_trip",
            status: CheckStatus::Pass,
            details: format!(
                "offline turn completed (sufficient: {}, next question: {})",
                outcome.sufficient,
                outcome.next_questions.first().map(String::as_str).unwrap_or("<none>")
            ),
        },
        Err(error) => DoctorCheck {
            name: "intake_round_trip",
            status: CheckStatus::Fail,
            details: format!("offline turn failed: {error}"),
        },
    }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: format!("skipped because {reason}"),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
