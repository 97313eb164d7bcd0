//! Assistant reply parsing.
//!
//! A reply may embed a structured payload in one of three carriers, tried in
//! order:
//!
//! 1. a fenced code block whose body mentions `extracted_entities`,
//! 2. an inline JSON object enclosing an `"extracted_entities"` key,
//! 3. an `ENTITIES_EXTRACTED: {...}` trailer, optionally followed by
//!    `SUFFICIENT: true|false`.
//!
//! A payload that decodes cleanly is authoritative for the turn. A payload
//! that is present but truncated or invalid is reported as
//! [`PayloadDecode::Malformed`] and the reply falls back to free-text
//! extraction, exactly as if no payload had been sent. Parsing never fails.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shelfwise_core::domain::entities::ShelfEntities;
use shelfwise_core::errors::DomainError;
use shelfwise_core::schema::FieldName;

use crate::fallback;

const PAYLOAD_MARKER: &str = "\"extracted_entities\"";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[a-z]*\s*(.*?)```").expect("fenced block pattern compiles")
});
static TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bENTITIES_EXTRACTED:\s*").expect("trailer pattern compiles")
});
static SUFFICIENT_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSUFFICIENT:\s*(true|false)\b").expect("sufficient flag pattern compiles")
});
static TRAILER_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:ENTITIES_EXTRACTED:|SUFFICIENT:\s*(?:true|false)\b)")
        .expect("trailer start pattern compiles")
});
static DANGLING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```[a-z]*$").expect("dangling fence pattern compiles")
});
static NUMBER_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*(\d{1,6})(?:\.0+)?\s*(inches|inch|in|''|"|″|feet|foot|ft|'|′)?\s*$"#)
        .expect("numeric value pattern compiles")
});

/// Which path produced a turn's extracted entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Structured,
    Fallback,
    FallbackAfterMalformed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredPayload {
    pub entities: ShelfEntities,
    pub claimed_sufficient: bool,
    pub suggested_questions: Vec<String>,
    /// Payload keys or values that were dropped during decoding.
    pub ignored: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadDecode {
    Decoded(StructuredPayload),
    Malformed { reason: String },
    Absent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedResponse {
    pub entities: ShelfEntities,
    /// Sufficiency as claimed by the reply; always `false` on fallback.
    pub claimed_sufficient: bool,
    /// Questions suggested by the reply; always empty on fallback.
    pub suggested_questions: Vec<String>,
    /// Natural-language reply with every payload carrier removed.
    pub reply: String,
    pub source: ExtractionSource,
    pub ignored: Vec<String>,
    pub malformed_reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Carrier {
    Fenced,
    Inline,
    Trailer,
}

#[derive(Debug)]
struct Located<'a> {
    carrier: Carrier,
    /// Bytes removed from the reply when cleaning.
    span: Range<usize>,
    object: Result<&'a str, String>,
    sufficient_hint: Option<bool>,
}

pub fn parse(raw: &str) -> ParsedResponse {
    let located = locate(raw);
    let reply = clean(raw, located.as_ref().map(|found| found.span.clone()));
    let decoded = located.as_ref().map(decode).unwrap_or(PayloadDecode::Absent);

    match decoded {
        PayloadDecode::Decoded(payload) => ParsedResponse {
            entities: payload.entities,
            claimed_sufficient: payload.claimed_sufficient,
            suggested_questions: payload.suggested_questions,
            reply,
            source: ExtractionSource::Structured,
            ignored: payload.ignored,
            malformed_reason: None,
        },
        PayloadDecode::Malformed { reason } => {
            fallback_response(raw, reply, ExtractionSource::FallbackAfterMalformed, Some(reason))
        }
        PayloadDecode::Absent => fallback_response(raw, reply, ExtractionSource::Fallback, None),
    }
}

pub fn decode_payload(raw: &str) -> PayloadDecode {
    locate(raw).as_ref().map(decode).unwrap_or(PayloadDecode::Absent)
}

fn fallback_response(
    raw: &str,
    reply: String,
    source: ExtractionSource,
    malformed_reason: Option<String>,
) -> ParsedResponse {
    ParsedResponse {
        entities: fallback::extract(raw),
        claimed_sufficient: false,
        suggested_questions: Vec::new(),
        reply,
        source,
        ignored: Vec::new(),
        malformed_reason,
    }
}

fn locate(raw: &str) -> Option<Located<'_>> {
    locate_fenced(raw).or_else(|| locate_inline(raw)).or_else(|| locate_trailer(raw))
}

fn locate_fenced(raw: &str) -> Option<Located<'_>> {
    FENCED_BLOCK.captures_iter(raw).find_map(|captures| {
        let block = captures.get(0)?;
        let body = captures.get(1)?;
        if !body.as_str().contains(PAYLOAD_MARKER) {
            return None;
        }

        let object = match body.as_str().find('{') {
            Some(offset) => {
                let open = body.start() + offset;
                balanced_object(raw, open).map(|close| &raw[open..=close]).ok_or_else(|| {
                    "fenced payload object is not terminated".to_string()
                })
            }
            None => Err("fenced payload has no object".to_string()),
        };

        Some(Located {
            carrier: Carrier::Fenced,
            span: block.range(),
            object,
            sufficient_hint: None,
        })
    })
}

fn locate_inline(raw: &str) -> Option<Located<'_>> {
    let marker = raw.find(PAYLOAD_MARKER)?;
    let mut cursor = 0;
    let mut unterminated = None;

    while let Some(offset) = raw[cursor..marker].find('{') {
        let open = cursor + offset;
        match balanced_object(raw, open) {
            Some(close) if close > marker => {
                return Some(Located {
                    carrier: Carrier::Inline,
                    span: open..close + 1,
                    object: Ok(&raw[open..=close]),
                    sufficient_hint: None,
                });
            }
            Some(close) => cursor = close + 1,
            None => {
                unterminated = Some(open);
                cursor = open + 1;
            }
        }
    }

    if let Some(open) = unterminated {
        return Some(Located {
            carrier: Carrier::Inline,
            span: open..raw.len(),
            object: Err("payload object is not terminated".to_string()),
            sufficient_hint: None,
        });
    }

    Some(Located {
        carrier: Carrier::Inline,
        span: marker..marker,
        object: Err("marker key is not inside an object".to_string()),
        sufficient_hint: None,
    })
}

fn locate_trailer(raw: &str) -> Option<Located<'_>> {
    let marker = TRAILER.find(raw)?;
    let sufficient_hint = SUFFICIENT_FLAG
        .captures(&raw[marker.end()..])
        .and_then(|captures| captures.get(1))
        .map(|flag| flag.as_str().eq_ignore_ascii_case("true"));

    let object = if raw[marker.end()..].starts_with('{') {
        balanced_object(raw, marker.end())
            .map(|close| &raw[marker.end()..=close])
            .ok_or_else(|| "trailer object is not terminated".to_string())
    } else {
        Err("trailer marker is not followed by an object".to_string())
    };

    Some(Located {
        carrier: Carrier::Trailer,
        span: marker.start()..raw.len(),
        object,
        sufficient_hint,
    })
}

/// Byte index of the `}` closing the object opened at `open`.
///
/// Braces inside JSON strings (including escaped quotes) are ignored.
fn balanced_object(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, character) in text[open..].char_indices() {
        if in_string {
            match character {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match character {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }

    None
}

fn decode(located: &Located<'_>) -> PayloadDecode {
    let object = match &located.object {
        Ok(object) => *object,
        Err(reason) => return PayloadDecode::Malformed { reason: reason.clone() },
    };

    let value = match serde_json::from_str::<Value>(object) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return PayloadDecode::Malformed { reason: "payload is not a JSON object".to_string() }
        }
        Err(error) => {
            let reason = format!("payload is not valid JSON: {error}");
            return PayloadDecode::Malformed { reason };
        }
    };

    match located.carrier {
        Carrier::Trailer => {
            let (entities, ignored) = decode_entities(&value);
            PayloadDecode::Decoded(StructuredPayload {
                entities,
                claimed_sufficient: located.sufficient_hint.unwrap_or(false),
                suggested_questions: Vec::new(),
                ignored,
            })
        }
        Carrier::Fenced | Carrier::Inline => decode_envelope(&value),
    }
}

fn decode_envelope(envelope: &Map<String, Value>) -> PayloadDecode {
    let Some(Value::Object(fields)) = envelope.get("extracted_entities") else {
        return PayloadDecode::Malformed {
            reason: "extracted_entities is missing or not an object".to_string(),
        };
    };

    let (entities, ignored) = decode_entities(fields);
    let claimed_sufficient =
        envelope.get("has_sufficient_entities").and_then(coerce_bool).unwrap_or(false);
    let suggested_questions = envelope
        .get("next_questions")
        .and_then(Value::as_array)
        .map(|questions| {
            questions
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|question| !question.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PayloadDecode::Decoded(StructuredPayload {
        entities,
        claimed_sufficient,
        suggested_questions,
        ignored,
    })
}

fn decode_entities(fields: &Map<String, Value>) -> (ShelfEntities, Vec<String>) {
    let mut entities = ShelfEntities::default();
    let mut ignored = Vec::new();

    for (key, value) in fields {
        let Some(field) = FieldName::from_payload_key(key) else {
            ignored.push(key.clone());
            continue;
        };
        if value.is_null() {
            continue;
        }
        if apply_value(&mut entities, field, value).is_err() {
            ignored.push(format!("{key}={value}"));
        }
    }

    (entities, ignored)
}

fn apply_value(
    entities: &mut ShelfEntities,
    field: FieldName,
    value: &Value,
) -> Result<(), DomainError> {
    match field {
        FieldName::ShelfStyle => entities.shelf_style = Some(label(field, value)?.parse()?),
        FieldName::Color => entities.color = Some(label(field, value)?.parse()?),
        FieldName::PostType => entities.post_type = Some(label(field, value)?.parse()?),
        FieldName::EnclosureType => entities.enclosure_type = Some(label(field, value)?.parse()?),
        FieldName::SolidBottomShelf => {
            let flag = coerce_bool(value)
                .ok_or(DomainError::TypeMismatch { field, expected: "boolean" })?;
            entities.solid_bottom_shelf = Some(flag);
        }
        FieldName::ShelfDividersShelves => {
            let shelves = coerce_indices(value)
                .ok_or(DomainError::TypeMismatch { field, expected: "integer array" })?;
            entities.shelf_dividers_shelves = Some(shelves);
        }
        numeric => {
            let number = coerce_number(value)
                .ok_or(DomainError::TypeMismatch { field: numeric, expected: "number" })?;
            entities.set_number(numeric, number)?;
        }
    }
    Ok(())
}

fn label(field: FieldName, value: &Value) -> Result<&str, DomainError> {
    value.as_str().ok_or(DomainError::TypeMismatch { field, expected: "string" })
}

fn coerce_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => match number.as_u64() {
            Some(whole) => u32::try_from(whole).ok(),
            None => number
                .as_f64()
                .filter(|float| {
                    float.fract() == 0.0 && *float >= 0.0 && *float <= f64::from(u32::MAX)
                })
                .map(|float| float as u32),
        },
        Value::String(text) => {
            let captures = NUMBER_WITH_UNIT.captures(text)?;
            let number = captures.get(1)?.as_str().parse::<u32>().ok()?;
            fallback::to_inches(number, captures.get(2).map(|unit| unit.as_str()))
        }
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => Some(true),
            "false" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_indices(value: &Value) -> Option<Vec<u32>> {
    match value {
        Value::Array(items) => items.iter().map(coerce_number).collect(),
        single => coerce_number(single).map(|index| vec![index]),
    }
}

fn clean(raw: &str, span: Option<Range<usize>>) -> String {
    let mut text = match span {
        Some(range) => format!("{}{}", &raw[..range.start], &raw[range.end..]),
        None => raw.to_string(),
    };

    if let Some(found) = TRAILER_START.find(&text) {
        text.truncate(found.start());
    }

    let trimmed = text.trim_end();
    let without_fence = match DANGLING_FENCE.find(trimmed) {
        Some(found) => &trimmed[..found.start()],
        None => trimmed,
    };
    without_fence.trim().to_string()
}
