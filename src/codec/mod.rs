//! Deck codecs
//!
//! Each interchange format gets one codec implementing [`DeckCodec`]. All of
//! them decode into and encode from the canonical [`Deck`](crate::core::Deck).
//! Codecs that translate between ids and names, or that need card types,
//! borrow a [`CardDirectory`](crate::directory::CardDirectory) and take one
//! snapshot per call.

pub mod json;
pub mod konami;
pub mod namelist;
pub mod omega;
pub mod remote;
pub mod ydk;
pub mod ydke;

pub use json::JsonCodec;
pub use konami::KonamiCodec;
pub use namelist::NameListCodec;
pub use omega::OmegaCodec;
pub use ydk::YdkCodec;
pub use ydke::YdkeCodec;

use crate::core::Deck;
use crate::Result;
use std::fmt;
use std::str::FromStr;

/// Decode/encode contract shared by every format
pub trait DeckCodec {
    /// Parse `input` into a deck. Structurally invalid input is a
    /// [`DeckError::Format`](crate::DeckError::Format).
    fn decode(&self, input: &str) -> Result<Deck>;

    /// Render `deck` in this format
    fn encode(&self, deck: &Deck) -> Result<String>;
}

/// Every deck format the converter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckFormat {
    /// `.ydk` plain text
    Ydk,
    /// `ydke://` URI
    Ydke,
    /// Omega compressed code
    Omega,
    /// `"<amount> <name>"` lines
    NameList,
    /// Konami database deck page (URL)
    Konami,
    /// `.json` file
    Json,
    /// YGOPRODeck deck page (URL) pointing at a `.ydk` download
    YgoProDeck,
}

impl DeckFormat {
    pub const ALL: [DeckFormat; 7] = [
        DeckFormat::Ydk,
        DeckFormat::Ydke,
        DeckFormat::Omega,
        DeckFormat::NameList,
        DeckFormat::Konami,
        DeckFormat::Json,
        DeckFormat::YgoProDeck,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeckFormat::Ydk => "ydk",
            DeckFormat::Ydke => "ydke",
            DeckFormat::Omega => "omega",
            DeckFormat::NameList => "namelist",
            DeckFormat::Konami => "konami",
            DeckFormat::Json => "json",
            DeckFormat::YgoProDeck => "ygoprodeck",
        }
    }

    /// Formats that can only be read, never written
    pub fn can_encode(self) -> bool {
        !matches!(self, DeckFormat::Konami | DeckFormat::YgoProDeck)
    }

    /// Input is a URL to fetch rather than the deck text itself
    pub fn is_remote(self) -> bool {
        matches!(self, DeckFormat::Konami | DeckFormat::YgoProDeck)
    }

    /// Extension for formats delivered as files
    pub fn file_extension(self) -> Option<&'static str> {
        match self {
            DeckFormat::Ydk => Some("ydk"),
            DeckFormat::Json => Some("json"),
            _ => None,
        }
    }
}

impl fmt::Display for DeckFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeckFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        DeckFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == lower)
            .or(match lower.as_str() {
                "names" | "name-list" => Some(DeckFormat::NameList),
                "ypd" => Some(DeckFormat::YgoProDeck),
                _ => None,
            })
            .ok_or_else(|| {
                let known: Vec<_> = DeckFormat::ALL.iter().map(|f| f.as_str()).collect();
                format!("invalid format '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("YDKe".parse::<DeckFormat>().unwrap(), DeckFormat::Ydke);
        assert_eq!("name-list".parse::<DeckFormat>().unwrap(), DeckFormat::NameList);
        assert_eq!("ypd".parse::<DeckFormat>().unwrap(), DeckFormat::YgoProDeck);
        assert!("dck".parse::<DeckFormat>().unwrap_err().contains("expected one of"));
        for format in DeckFormat::ALL {
            assert_eq!(format.to_string().parse::<DeckFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_format_capabilities() {
        assert!(!DeckFormat::Konami.can_encode());
        assert!(!DeckFormat::YgoProDeck.can_encode());
        assert!(DeckFormat::Omega.can_encode());
        assert!(DeckFormat::Konami.is_remote());
        assert_eq!(DeckFormat::Ydk.file_extension(), Some("ydk"));
        assert_eq!(DeckFormat::Ydke.file_extension(), None);
    }
}
