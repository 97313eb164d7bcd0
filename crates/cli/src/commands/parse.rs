use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use shelfwise_agent::{parse, ExtractionSource};
use shelfwise_core::domain::entities::ShelfEntities;
use shelfwise_core::intake::{is_sufficient, next_questions, range_warnings};

use crate::commands::{serialization_fallback, CommandResult};

#[derive(Debug, Clone)]
pub enum ParseInput {
    Text(String),
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Serialize)]
struct ParseReport {
    command: &'static str,
    status: &'static str,
    source: ExtractionSource,
    reply: String,
    entities: ShelfEntities,
    claimed_sufficient: bool,
    sufficient: bool,
    next_questions: Vec<String>,
    warnings: Vec<String>,
    ignored: Vec<String>,
    malformed_reason: Option<String>,
}

/// Treats the input as a fresh session: entities come from this reply alone.
pub fn run(input: ParseInput) -> CommandResult {
    let raw = match read_input(input) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure("parse", "input", format!("{error:#}"), 2);
        }
    };

    let parsed = parse(&raw);
    let sufficient = is_sufficient(&parsed.entities);
    let report = ParseReport {
        command: "parse",
        status: "ok",
        source: parsed.source,
        next_questions: next_questions(&parsed.entities, sufficient),
        warnings: range_warnings(&parsed.entities),
        reply: parsed.reply,
        entities: parsed.entities,
        claimed_sufficient: parsed.claimed_sufficient,
        sufficient,
        ignored: parsed.ignored,
        malformed_reason: parsed.malformed_reason,
    };

    let output = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| serialization_fallback("parse", &error));
    CommandResult { exit_code: 0, output }
}

fn read_input(input: ParseInput) -> Result<String> {
    match input {
        ParseInput::Text(text) => Ok(text),
        ParseInput::File(path) => fs::read_to_string(&path)
            .with_context(|| format!("could not read reply file `{}`", path.display())),
        ParseInput::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("could not read reply from stdin")?;
            Ok(buffer)
        }
    }
}
