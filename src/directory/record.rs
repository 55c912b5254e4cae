//! Card records and the datasets they come from

use crate::core::CardName;
use crate::directory::flags::TypeFlags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `ot` values at or above this are not OCG/TCG cards
const OT_RUSH_OR_SKILL: u32 = 4;
/// Rush Duel cards alias this placeholder id
const RUSH_ALIAS: u32 = 120_000_000;
/// Archetype code shared by Speed Duel skill cards
const SKILL_SETCODE: u64 = 10_377;

/// One of the two card databases the directory mirrors
///
/// The same printed card may have different ids in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    /// Project Ignis BabelCDB, the canonical numbering
    Ignis,
    /// OmegaDB, the numbering used inside Omega codes
    Omega,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Ignis, Dataset::Omega];

    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::Ignis => "ignis",
            Dataset::Omega => "omega",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignis" | "a" => Ok(Dataset::Ignis),
            "omega" | "b" => Ok(Dataset::Omega),
            _ => Err(format!("invalid dataset '{s}' (expected: ignis or omega)")),
        }
    }
}

/// Which datasets a lookup may consult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Ignis first, then Omega
    #[default]
    Both,
    Only(Dataset),
}

impl Scope {
    /// Datasets to try, in order
    pub fn datasets(self) -> &'static [Dataset] {
        match self {
            Scope::Both => &Dataset::ALL,
            Scope::Only(Dataset::Ignis) => &[Dataset::Ignis],
            Scope::Only(Dataset::Omega) => &[Dataset::Omega],
        }
    }
}

impl From<Dataset> for Scope {
    fn from(dataset: Dataset) -> Self {
        Scope::Only(dataset)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Both => f.write_str("ignis+omega"),
            Scope::Only(dataset) => write!(f, "{dataset}"),
        }
    }
}

/// A card row joined from a database's `texts` and `datas` tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: u32,
    pub ot: u32,
    /// The card this one derives from (alternate art, rush placeholder), else 0
    pub alias: u32,
    /// Archetype codes
    pub setcode: u64,
    /// Raw type bit-field; see [`CardRecord::type_flags`]
    pub type_bits: u32,
    pub atk: i32,
    pub def: i32,
    pub level: u32,
    pub race: u32,
    pub attribute: u32,
    pub category: u64,
    pub name: CardName,
    pub desc: String,
}

impl CardRecord {
    /// Minimal record with only the fields conversions care about
    pub fn new(id: u32, name: impl Into<CardName>, type_bits: u32) -> Self {
        CardRecord {
            id,
            ot: 3,
            alias: 0,
            setcode: 0,
            type_bits,
            atk: 0,
            def: 0,
            level: 0,
            race: 0,
            attribute: 0,
            category: 0,
            name: name.into(),
            desc: String::new(),
        }
    }

    pub fn type_flags(&self) -> TypeFlags {
        TypeFlags::from_bits(self.type_bits)
    }

    pub fn is_ocg_or_tcg(&self) -> bool {
        self.ot < OT_RUSH_OR_SKILL
    }

    pub fn is_rush(&self) -> bool {
        self.ot == OT_RUSH_OR_SKILL && self.alias == RUSH_ALIAS
    }

    pub fn is_skill(&self) -> bool {
        self.ot == OT_RUSH_OR_SKILL && self.setcode == SKILL_SETCODE
    }
}
