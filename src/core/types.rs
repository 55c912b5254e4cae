//! Strongly-typed wrappers for deck concepts
//!
//! Card identifiers and card names get their own types so a passcode can
//! never be confused with a count or an index, and so the permissive
//! plain-text parse has an explicit value for "this line was not a number".

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One card slot in a deck zone
///
/// `Known` holds a numeric card identifier (passcode). `NaN` is what the
/// plain-text reader produces for a line that is not a decimal number; it is
/// carried through conversions instead of aborting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardId {
    Known(u32),
    NaN,
}

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId::Known(id)
    }

    /// The numeric identifier, if this slot has one
    pub fn value(self) -> Option<u32> {
        match self {
            CardId::Known(id) => Some(id),
            CardId::NaN => None,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, CardId::NaN)
    }

    /// Value written into packed `u32` wire formats (`NaN` packs as 0)
    pub fn to_wire(self) -> u32 {
        self.value().unwrap_or(0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Known(id) => write!(f, "{id}"),
            CardId::NaN => write!(f, "NaN"),
        }
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        CardId::Known(id)
    }
}

impl FromStr for CardId {
    type Err = std::convert::Infallible;

    /// Never fails: anything that is not a decimal `u32` becomes `NaN`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<u32>()
            .map(CardId::Known)
            .unwrap_or(CardId::NaN))
    }
}

// JSON has no NaN; it travels as null so the JSON codec stays lossless.
impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Option::<u32>::deserialize(deserializer)?
            .map(CardId::Known)
            .unwrap_or(CardId::NaN))
    }
}

/// Card name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ASCII-folded, lower-cased key used for forgiving name matches
    pub fn normalized(&self) -> String {
        normalize_name(&self.0)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

/// Fold a card name to a lookup key: transliterate to ASCII, lower-case,
/// collapse whitespace runs.
pub fn normalize_name(name: &str) -> String {
    deunicode::deunicode(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
