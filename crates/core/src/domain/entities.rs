use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::schema::FieldName;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShelfStyle {
    #[serde(rename = "Industrial Grid")]
    IndustrialGrid,
    #[serde(rename = "Metro Classic")]
    MetroClassic,
    #[serde(rename = "Commercial Pro")]
    CommercialPro,
    #[serde(rename = "Heavy Duty")]
    HeavyDuty,
}

impl ShelfStyle {
    pub const ALL: [Self; 4] =
        [Self::IndustrialGrid, Self::MetroClassic, Self::CommercialPro, Self::HeavyDuty];

    pub fn label(self) -> &'static str {
        match self {
            Self::IndustrialGrid => "Industrial Grid",
            Self::MetroClassic => "Metro Classic",
            Self::CommercialPro => "Commercial Pro",
            Self::HeavyDuty => "Heavy Duty",
        }
    }
}

impl FromStr for ShelfStyle {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "industrial grid" | "industrial" => Ok(Self::IndustrialGrid),
            "metro classic" | "metro" => Ok(Self::MetroClassic),
            "commercial pro" | "commercial" => Ok(Self::CommercialPro),
            "heavy duty" => Ok(Self::HeavyDuty),
            _ => Err(unknown(FieldName::ShelfStyle, value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Chrome,
    Black,
    White,
    #[serde(rename = "Stainless Steel")]
    StainlessSteel,
    Bronze,
    Zinc,
}

impl Color {
    pub const ALL: [Self; 6] =
        [Self::Chrome, Self::Black, Self::White, Self::StainlessSteel, Self::Bronze, Self::Zinc];

    pub fn label(self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Black => "Black",
            Self::White => "White",
            Self::StainlessSteel => "Stainless Steel",
            Self::Bronze => "Bronze",
            Self::Zinc => "Zinc",
        }
    }
}

impl FromStr for Color {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "chrome" => Ok(Self::Chrome),
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            "stainless steel" | "stainless" => Ok(Self::StainlessSteel),
            "bronze" => Ok(Self::Bronze),
            "zinc" => Ok(Self::Zinc),
            _ => Err(unknown(FieldName::Color, value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    Stationary,
    Mobile,
}

impl PostType {
    pub const ALL: [Self; 2] = [Self::Stationary, Self::Mobile];

    pub fn label(self) -> &'static str {
        match self {
            Self::Stationary => "Stationary",
            Self::Mobile => "Mobile",
        }
    }
}

impl FromStr for PostType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "stationary" | "fixed" | "static" => Ok(Self::Stationary),
            "mobile" | "mobile with casters" | "casters" | "caster" | "wheels" => Ok(Self::Mobile),
            _ => Err(unknown(FieldName::PostType, value)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnclosureType {
    None,
    Back,
    Sides,
    Full,
}

impl EnclosureType {
    pub const ALL: [Self; 4] = [Self::None, Self::Back, Self::Sides, Self::Full];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Back => "back",
            Self::Sides => "sides",
            Self::Full => "full",
        }
    }
}

impl FromStr for EnclosureType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_label(value).as_str() {
            "none" | "no enclosure" | "no" => Ok(Self::None),
            "back" | "back panel" | "back panel only" => Ok(Self::Back),
            "sides" | "side" | "side panels" | "side panels only" => Ok(Self::Sides),
            "full" | "full enclosure" => Ok(Self::Full),
            _ => Err(unknown(FieldName::EnclosureType, value)),
        }
    }
}

macro_rules! display_via_label {
    ($($kind:ty),+) => {
        $(impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })+
    };
}

display_via_label!(ShelfStyle, Color, PostType, EnclosureType);

/// Typed shelving configuration accumulated over a conversation.
///
/// The same record doubles as the per-turn extraction: a field that is `None`
/// in an extraction means "not mentioned", never "clear it".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShelfEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_shelves: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_style: Option<ShelfStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solid_bottom_shelf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_dividers_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_dividers_shelves: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosure_type: Option<EnclosureType>,
}

impl ShelfEntities {
    pub fn is_present(&self, field: FieldName) -> bool {
        match field {
            FieldName::Width => self.width.is_some(),
            FieldName::Length => self.length.is_some(),
            FieldName::PostHeight => self.post_height.is_some(),
            FieldName::NumberOfShelves => self.number_of_shelves.is_some(),
            FieldName::ShelfStyle => self.shelf_style.is_some(),
            FieldName::Color => self.color.is_some(),
            FieldName::SolidBottomShelf => self.solid_bottom_shelf.is_some(),
            FieldName::PostType => self.post_type.is_some(),
            FieldName::ShelfDividersCount => self.shelf_dividers_count.is_some(),
            FieldName::ShelfDividersShelves => self.shelf_dividers_shelves.is_some(),
            FieldName::EnclosureType => self.enclosure_type.is_some(),
        }
    }

    pub fn present_fields(&self) -> Vec<FieldName> {
        FieldName::ALL.into_iter().filter(|field| self.is_present(*field)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Scalar value of an integer field, `None` for absent or non-integer fields.
    pub fn number(&self, field: FieldName) -> Option<u32> {
        match field {
            FieldName::Width => self.width,
            FieldName::Length => self.length,
            FieldName::PostHeight => self.post_height,
            FieldName::NumberOfShelves => self.number_of_shelves,
            FieldName::ShelfDividersCount => self.shelf_dividers_count,
            _ => None,
        }
    }

    pub fn set_number(&mut self, field: FieldName, value: u32) -> Result<(), DomainError> {
        let slot = match field {
            FieldName::Width => &mut self.width,
            FieldName::Length => &mut self.length,
            FieldName::PostHeight => &mut self.post_height,
            FieldName::NumberOfShelves => &mut self.number_of_shelves,
            FieldName::ShelfDividersCount => &mut self.shelf_dividers_count,
            other => {
                return Err(DomainError::TypeMismatch { field: other, expected: "number" });
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

fn normalize_label(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn unknown(field: FieldName, value: &str) -> DomainError {
    DomainError::UnknownValue { field, value: value.to_string() }
}
