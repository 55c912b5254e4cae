//! Canonical deck representation
//!
//! Every codec decodes into and encodes from [`Deck`]. Zones keep their
//! card order; duplicates are separate entries.

use crate::core::CardId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three zones of a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Main,
    Extra,
    Side,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Main, Zone::Extra, Zone::Side];
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Main => write!(f, "main"),
            Zone::Extra => write!(f, "extra"),
            Zone::Side => write!(f, "side"),
        }
    }
}

/// A deck list: three ordered zones of card identifiers plus an optional name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub main: Vec<CardId>,
    pub extra: Vec<CardId>,
    pub side: Vec<CardId>,
}

impl Deck {
    /// Create an unnamed deck from its three zones
    pub fn new(main: Vec<CardId>, extra: Vec<CardId>, side: Vec<CardId>) -> Self {
        Deck {
            name: None,
            main,
            extra,
            side,
        }
    }

    /// Build a deck from plain numeric ids
    pub fn from_ids(main: &[u32], extra: &[u32], side: &[u32]) -> Self {
        let ids = |zone: &[u32]| zone.iter().copied().map(CardId::Known).collect();
        Deck::new(ids(main), ids(extra), ids(side))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn zone(&self, zone: Zone) -> &[CardId] {
        match zone {
            Zone::Main => &self.main,
            Zone::Extra => &self.extra,
            Zone::Side => &self.side,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> &mut Vec<CardId> {
        match zone {
            Zone::Main => &mut self.main,
            Zone::Extra => &mut self.extra,
            Zone::Side => &mut self.side,
        }
    }

    /// Iterate over `(zone, cards)` in main, extra, side order
    pub fn zones(&self) -> impl Iterator<Item = (Zone, &[CardId])> {
        Zone::ALL.into_iter().map(move |zone| (zone, self.zone(zone)))
    }

    /// Total number of card entries across all zones
    pub fn len(&self) -> usize {
        self.main.len() + self.extra.len() + self.side.len()
    }

    /// True when all three zones are empty
    ///
    /// Decoders return such a deck as a normal value; callers decide whether
    /// it counts as a failure.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File name for a file-based output format
    ///
    /// Uses `name_override`, then the deck's own name, then `"result"`, with
    /// characters that are unsafe in file names stripped.
    pub fn file_name(&self, name_override: Option<&str>, extension: &str) -> String {
        let stem = name_override
            .or(self.name.as_deref())
            .map(sanitize_file_stem)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "result".to_string());
        format!("{stem}.{extension}")
    }
}

fn sanitize_file_stem(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>'))
        .collect();
    // Leading/trailing dots and spaces are rejected by some filesystems
    cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string()
}
