//! Static configuration schema for a wire shelving unit.
//!
//! The schema is an ordered, immutable table of field descriptors. Declaration
//! order matters: the question generator walks required and optional fields in
//! exactly this order.

use serde::{Deserialize, Serialize};

/// Canonical field names of the shelving configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Width,
    Length,
    PostHeight,
    NumberOfShelves,
    ShelfStyle,
    Color,
    SolidBottomShelf,
    PostType,
    ShelfDividersCount,
    ShelfDividersShelves,
    EnclosureType,
}

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        FieldName::Width,
        FieldName::Length,
        FieldName::PostHeight,
        FieldName::NumberOfShelves,
        FieldName::ShelfStyle,
        FieldName::Color,
        FieldName::SolidBottomShelf,
        FieldName::PostType,
        FieldName::ShelfDividersCount,
        FieldName::ShelfDividersShelves,
        FieldName::EnclosureType,
    ];

    pub fn canonical(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Length => "length",
            Self::PostHeight => "postHeight",
            Self::NumberOfShelves => "numberOfShelves",
            Self::ShelfStyle => "shelfStyle",
            Self::Color => "color",
            Self::SolidBottomShelf => "solidBottomShelf",
            Self::PostType => "postType",
            Self::ShelfDividersCount => "shelfDividersCount",
            Self::ShelfDividersShelves => "shelfDividersShelves",
            Self::EnclosureType => "enclosureType",
        }
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &SCHEMA[self as usize]
    }

    /// Translates a provider-specific payload key into a canonical field.
    ///
    /// Matching ignores case and the separators `_`, `-` and space, so
    /// `post_height`, `Post Height` and `postHeight` all resolve to
    /// [`FieldName::PostHeight`]. Unknown keys yield `None` and are dropped by
    /// callers.
    pub fn from_payload_key(key: &str) -> Option<Self> {
        let normalized = key
            .chars()
            .filter(|character| !matches!(character, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        let field = match normalized.as_str() {
            "width" | "shelfwidth" => Self::Width,
            "length" | "depth" | "shelflength" | "shelfdepth" => Self::Length,
            "postheight" | "height" | "overallheight" | "unitheight" => Self::PostHeight,
            "numberofshelves" | "shelves" | "shelfcount" | "numshelves" | "levels" | "tiers" => {
                Self::NumberOfShelves
            }
            "shelfstyle" | "style" => Self::ShelfStyle,
            "color" | "colour" | "finish" | "colorfinish" => Self::Color,
            "solidbottomshelf" | "solidbottom" => Self::SolidBottomShelf,
            "posttype" | "mobility" => Self::PostType,
            "shelfdividerscount" | "dividers" | "dividerscount" | "dividercount" => {
                Self::ShelfDividersCount
            }
            "shelfdividersshelves" | "dividershelves" | "dividersshelves" => {
                Self::ShelfDividersShelves
            }
            "enclosuretype" | "enclosure" => Self::EnclosureType,
            _ => return None,
        };
        Some(field)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Number,
    String,
    Boolean,
    IntegerArray,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: FieldName,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub value_type: ValueType,
    pub allowed_values: Option<&'static [&'static str]>,
    pub required: bool,
    /// Advisory bounds. Values outside them are kept but reported.
    pub typical_range: Option<(u32, u32)>,
    pub question: &'static str,
}

pub const SHELF_STYLE_VALUES: &[&str] =
    &["Industrial Grid", "Metro Classic", "Commercial Pro", "Heavy Duty"];
pub const COLOR_VALUES: &[&str] =
    &["Chrome", "Black", "White", "Stainless Steel", "Bronze", "Zinc"];
pub const POST_TYPE_VALUES: &[&str] = &["Stationary", "Mobile"];
pub const ENCLOSURE_VALUES: &[&str] = &["none", "back", "sides", "full"];

/// Follow-up used once every askable field is filled in.
pub const GENERIC_FOLLOW_UP: &str =
    "Is there anything you'd like to adjust about your shelving unit?";

pub static SCHEMA: [FieldDescriptor; 11] = [
    FieldDescriptor {
        name: FieldName::Width,
        label: "Width",
        unit: Some("inches"),
        value_type: ValueType::Number,
        allowed_values: None,
        required: true,
        typical_range: Some((12, 96)),
        question: "How wide should it be?",
    },
    FieldDescriptor {
        name: FieldName::Length,
        label: "Length",
        unit: Some("inches"),
        value_type: ValueType::Number,
        allowed_values: None,
        required: true,
        typical_range: Some((12, 48)),
        question: "How deep/long should it be?",
    },
    FieldDescriptor {
        name: FieldName::PostHeight,
        label: "Post Height",
        unit: Some("inches"),
        value_type: ValueType::Number,
        allowed_values: None,
        required: true,
        typical_range: Some((36, 96)),
        question: "How tall should it be?",
    },
    FieldDescriptor {
        name: FieldName::NumberOfShelves,
        label: "Number of Shelves",
        unit: None,
        value_type: ValueType::Number,
        allowed_values: None,
        required: true,
        typical_range: Some((2, 8)),
        question: "How many shelves do you need?",
    },
    FieldDescriptor {
        name: FieldName::ShelfStyle,
        label: "Shelf Style",
        unit: None,
        value_type: ValueType::String,
        allowed_values: Some(SHELF_STYLE_VALUES),
        required: false,
        typical_range: None,
        question: "Do you have a preference for shelf style?",
    },
    FieldDescriptor {
        name: FieldName::Color,
        label: "Color Finish",
        unit: None,
        value_type: ValueType::String,
        allowed_values: Some(COLOR_VALUES),
        required: false,
        typical_range: None,
        question: "What color/finish would you prefer?",
    },
    FieldDescriptor {
        name: FieldName::SolidBottomShelf,
        label: "Solid Bottom Shelf",
        unit: None,
        value_type: ValueType::Boolean,
        allowed_values: None,
        required: false,
        typical_range: None,
        question: "Would you like a solid bottom shelf?",
    },
    FieldDescriptor {
        name: FieldName::PostType,
        label: "Post Type",
        unit: None,
        value_type: ValueType::String,
        allowed_values: Some(POST_TYPE_VALUES),
        required: false,
        typical_range: None,
        question: "Do you need this to be mobile with casters?",
    },
    FieldDescriptor {
        name: FieldName::ShelfDividersCount,
        label: "Dividers per Shelf",
        unit: None,
        value_type: ValueType::Number,
        allowed_values: None,
        required: false,
        typical_range: Some((0, 6)),
        question: "Would you like dividers on any shelves?",
    },
    FieldDescriptor {
        name: FieldName::ShelfDividersShelves,
        label: "Shelves with Dividers",
        unit: None,
        value_type: ValueType::IntegerArray,
        allowed_values: None,
        required: false,
        typical_range: None,
        question: "Which shelves should get dividers?",
    },
    FieldDescriptor {
        name: FieldName::EnclosureType,
        label: "Enclosure Type",
        unit: None,
        value_type: ValueType::String,
        allowed_values: Some(ENCLOSURE_VALUES),
        required: false,
        typical_range: None,
        question: "Would you like back or side panels for enclosure?",
    },
];

pub fn schema() -> &'static [FieldDescriptor] {
    &SCHEMA
}

pub fn required_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    SCHEMA.iter().filter(|descriptor| descriptor.required)
}

pub fn optional_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    SCHEMA.iter().filter(|descriptor| !descriptor.required)
}

#[cfg(test)]
mod tests {
    use super::{optional_fields, required_fields, FieldName, SCHEMA};

    #[test]
    fn descriptor_table_follows_field_declaration_order() {
        for field in FieldName::ALL {
            assert_eq!(field.descriptor().name, field, "descriptor slot for {field}");
        }
        assert_eq!(SCHEMA.len(), FieldName::ALL.len());
    }

    #[test]
    fn exactly_four_required_fields_in_question_order() {
        let required = required_fields().map(|descriptor| descriptor.name).collect::<Vec<_>>();
        assert_eq!(
            required,
            vec![
                FieldName::Width,
                FieldName::Length,
                FieldName::PostHeight,
                FieldName::NumberOfShelves
            ]
        );
        assert_eq!(optional_fields().count(), SCHEMA.len() - 4);
    }

    #[test]
    fn payload_keys_translate_to_canonical_fields() {
        assert_eq!(FieldName::from_payload_key("post_height"), Some(FieldName::PostHeight));
        assert_eq!(FieldName::from_payload_key("PostHeight"), Some(FieldName::PostHeight));
        assert_eq!(
            FieldName::from_payload_key("number_of_shelves"),
            Some(FieldName::NumberOfShelves)
        );
        assert_eq!(FieldName::from_payload_key("depth"), Some(FieldName::Length));
        assert_eq!(FieldName::from_payload_key("Finish"), Some(FieldName::Color));
        assert_eq!(FieldName::from_payload_key("solid-bottom"), Some(FieldName::SolidBottomShelf));
        assert_eq!(FieldName::from_payload_key("message_received"), None);
    }

    #[test]
    fn canonical_names_round_trip_through_payload_keys() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_payload_key(field.canonical()), Some(field));
        }
    }
}
