//! Best-effort entity recovery from free text.
//!
//! Runs whenever an assistant reply carries no usable structured payload.
//! Only the four dimensions, color, shelf style, mobility and the bottom shelf
//! preference are recognized; everything else needs the structured path.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use shelfwise_core::domain::entities::{Color, PostType, ShelfEntities, ShelfStyle};

const VALUE: &str = r"(\d{1,3}(?:\.\d{1,2})?)";
const UNIT: &str = r#"(?:\s*-?\s*(inches|inch|in|''|"|″|feet|foot|ft|'|′))?"#;
const EXTRA_INCHES: &str = r#"(?:\s*-?\s*(\d{1,2})\s*(?:inches|inch|in|''|"|″))?"#;

struct DimensionPatterns {
    trailing: Regex,
    leading: Regex,
}

impl DimensionPatterns {
    fn new(keywords: &str) -> Self {
        let trailing = format!(r"(?i)\b{VALUE}{UNIT}{EXTRA_INCHES}[\s-]*(?:{keywords})\b");
        let leading =
            format!(r"(?i)\b(?:{keywords})\s*(?:of|is|:|=)\s*{VALUE}{UNIT}{EXTRA_INCHES}");
        Self {
            trailing: Regex::new(&trailing).expect("trailing dimension pattern compiles"),
            leading: Regex::new(&leading).expect("leading dimension pattern compiles"),
        }
    }

    fn find(&self, text: &str) -> Option<u32> {
        [&self.trailing, &self.leading].into_iter().find_map(|pattern| {
            pattern.captures_iter(text).find_map(|captures| {
                let value = captures.get(1)?;
                if !stands_alone(text, value.range()) {
                    return None;
                }
                dimension_inches(
                    value.as_str(),
                    captures.get(2).map(|unit| unit.as_str()),
                    captures.get(3).map(|inches| inches.as_str()),
                )
            })
        })
    }
}

static WIDTH: LazyLock<DimensionPatterns> = LazyLock::new(|| DimensionPatterns::new("wide|width"));
static LENGTH: LazyLock<DimensionPatterns> =
    LazyLock::new(|| DimensionPatterns::new("long|length|deep|depth"));
static HEIGHT: LazyLock<DimensionPatterns> =
    LazyLock::new(|| DimensionPatterns::new("tall|high|height"));

static SHELVES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})[\s-]*(?:shelf|shelves|levels?|tiers?)\b")
        .expect("shelf count pattern compiles")
});
static SHELVES_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:number of shelves|shelves|levels|tiers)\s*(?:of|is|:|=)\s*(\d{1,3})\b")
        .expect("leading shelf count pattern compiles")
});

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(chrome|black|white|stainless(?:\s+steel)?|bronze|zinc)\b")
        .expect("color pattern compiles")
});
static STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(industrial(?:\s+grid)?|metro(?:\s+classic)?",
        r"|commercial(?:\s+pro)?|heavy[\s-]+duty)\b"
    ))
    .expect("style pattern compiles")
});

static NOT_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:no|without|not)\s+(?:mobile|casters?|wheels?)\b")
        .expect("negated mobility pattern compiles")
});
static MOBILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(mobile|casters?|wheels?|stationary|fixed)\b")
        .expect("mobility pattern compiles")
});

static WIRE_BOTTOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:no\s+solid|without\s+(?:a\s+)?solid|wire\s+bottom)\b")
        .expect("wire bottom pattern compiles")
});
static SOLID_BOTTOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsolid\s+(?:bottom|shelf)\b").expect("solid bottom pattern compiles")
});

/// Scans `text` for recognizable configuration values.
///
/// The first match wins per field. Unknown or out-of-vocabulary mentions are
/// ignored rather than guessed at.
pub fn extract(text: &str) -> ShelfEntities {
    ShelfEntities {
        width: WIDTH.find(text),
        length: LENGTH.find(text),
        post_height: HEIGHT.find(text),
        number_of_shelves: shelf_count(text),
        shelf_style: first_label(&STYLE, text).and_then(|label| label.parse::<ShelfStyle>().ok()),
        color: first_label(&COLOR, text).and_then(|label| label.parse::<Color>().ok()),
        solid_bottom_shelf: solid_bottom(text),
        post_type: post_type(text),
        ..ShelfEntities::default()
    }
}

fn shelf_count(text: &str) -> Option<u32> {
    [&*SHELVES, &*SHELVES_LEADING].into_iter().find_map(|pattern| {
        pattern.captures_iter(text).find_map(|captures| {
            let count = captures.get(1)?;
            if !stands_alone(text, count.range()) {
                return None;
            }
            count.as_str().parse::<u32>().ok()
        })
    })
}

/// A number glued to a digit, a decimal point or a feet mark belongs to a larger quantity.
fn stands_alone(text: &str, span: Range<usize>) -> bool {
    let before = text[..span.start].chars().next_back();
    let mut after = text[span.end..].chars();
    let glued_before =
        matches!(before, Some(c) if c.is_alphanumeric() || matches!(c, '.' | '\'' | '′'));
    let glued_after = match after.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    !glued_before && !glued_after
}

/// Whole inches for `value` (up to two decimals) in `unit`, plus any trailing inches after feet.
fn dimension_inches(value: &str, unit: Option<&str>, extra_inches: Option<&str>) -> Option<u32> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let fraction = format!("{fraction:0<2}").parse::<u32>().ok()?;
    let hundredths = whole.parse::<u32>().ok()?.checked_mul(100)?.checked_add(fraction)?;

    let total = match (is_feet(unit), extra_inches) {
        (true, extra) => {
            let extra = extra.map(str::parse::<u32>).transpose().ok()?.unwrap_or(0);
            hundredths.checked_mul(12)?.checked_add(extra.checked_mul(100)?)?
        }
        (false, None) => hundredths,
        (false, Some(_)) => return None,
    };

    (total % 100 == 0).then_some(total / 100)
}

fn is_feet(unit: Option<&str>) -> bool {
    matches!(
        unit.map(str::to_ascii_lowercase).as_deref(),
        Some("feet" | "foot" | "ft" | "'" | "′")
    )
}

fn first_label<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern.captures(text).and_then(|captures| captures.get(1)).map(|found| found.as_str())
}

fn post_type(text: &str) -> Option<PostType> {
    if NOT_MOBILE.is_match(text) {
        return Some(PostType::Stationary);
    }

    first_label(&MOBILITY, text).map(|keyword| match keyword.to_ascii_lowercase().as_str() {
        "stationary" | "fixed" => PostType::Stationary,
        _ => PostType::Mobile,
    })
}

fn solid_bottom(text: &str) -> Option<bool> {
    if WIRE_BOTTOM.is_match(text) {
        Some(false)
    } else if SOLID_BOTTOM.is_match(text) {
        Some(true)
    } else {
        None
    }
}

pub(crate) fn to_inches(value: u32, unit: Option<&str>) -> Option<u32> {
    if is_feet(unit) {
        value.checked_mul(12)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use shelfwise_core::domain::entities::{Color, PostType, ShelfEntities, ShelfStyle};

    use super::extract;

    #[test]
    fn extracts_dimensions_and_shelf_count_from_sentence() {
        let entities = extract("I'd like it 36 inches wide and 18 deep with 4 shelves");

        assert_eq!(
            entities,
            ShelfEntities {
                width: Some(36),
                length: Some(18),
                number_of_shelves: Some(4),
                ..ShelfEntities::default()
            }
        );
        assert_eq!(entities.post_height, None);
    }

    #[test]
    fn handles_unit_variants_and_feet_conversion() {
        let entities = extract(r#"Make it 48" wide, 24-inch deep and 6 ft tall"#);

        assert_eq!(entities.width, Some(48));
        assert_eq!(entities.length, Some(24));
        assert_eq!(entities.post_height, Some(72));
    }

    #[test]
    fn keyword_first_phrasing_is_recognized() {
        let entities = extract("A height of 60 inches and width: 30 would be ideal.");

        assert_eq!(entities.post_height, Some(60));
        assert_eq!(entities.width, Some(30));
    }

    #[test]
    fn first_match_wins_per_field() {
        let entities = extract("Either 30 wide or 42 wide, with 5 tiers or 3 shelves");

        assert_eq!(entities.width, Some(30));
        assert_eq!(entities.number_of_shelves, Some(5));
    }

    #[test]
    fn decimal_feet_and_feet_with_inches_convert_whole() {
        let entities = extract("make it 5'6\" tall and 2.5 feet wide");

        assert_eq!(entities.post_height, Some(66));
        assert_eq!(entities.width, Some(30));
        assert_eq!(extract("about 4 ft 2 in high").post_height, Some(50));
    }

    #[test]
    fn fractional_inches_and_fractional_counts_are_refused() {
        let entities = extract("30.5 inches wide with 2.5 shelves");

        assert_eq!(entities.width, None);
        assert_eq!(entities.number_of_shelves, None);
        assert_eq!(extract("shelves: 4.5 please").number_of_shelves, None);
    }

    #[test]
    fn long_digit_runs_are_not_dimensions() {
        let entities = extract("Order 12345 wide release");
        assert_eq!(entities.width, None);
    }

    #[test]
    fn earliest_color_and_style_mention_wins() {
        let entities =
            extract("Black would be nice, or maybe chrome. Heavy-duty or metro classic.");

        assert_eq!(entities.color, Some(Color::Black));
        assert_eq!(entities.shelf_style, Some(ShelfStyle::HeavyDuty));
    }

    #[test]
    fn stainless_steel_is_one_color() {
        assert_eq!(extract("in stainless steel please").color, Some(Color::StainlessSteel));
    }

    #[test]
    fn mobility_keywords_and_negations() {
        assert_eq!(extract("put it on casters").post_type, Some(PostType::Mobile));
        assert_eq!(extract("it should stay fixed").post_type, Some(PostType::Stationary));
        assert_eq!(extract("no wheels needed").post_type, Some(PostType::Stationary));
        assert_eq!(extract("nothing special").post_type, None);
    }

    #[test]
    fn negative_bottom_phrases_take_priority() {
        assert_eq!(extract("I want a solid bottom shelf").solid_bottom_shelf, Some(true));
        assert_eq!(extract("no solid bottom, wire is fine").solid_bottom_shelf, Some(false));
        assert_eq!(extract("keep the wire bottom").solid_bottom_shelf, Some(false));
        assert_eq!(extract("just shelves").solid_bottom_shelf, None);
    }

    #[test]
    fn empty_text_yields_no_entities() {
        assert!(extract("").is_empty());
    }
}
