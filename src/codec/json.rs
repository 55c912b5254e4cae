//! JSON deck files
//!
//! ```json
//! {
//!     "name": "Greed",
//!     "main": [55144522, 55144522],
//!     "extra": [],
//!     "side": [null]
//! }
//! ```
//!
//! The one lossless format: zone order, duplicates, the deck name and
//! unresolvable ids (`null`) all survive.

use crate::codec::DeckCodec;
use crate::core::Deck;
use crate::{DeckError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

const FORMAT: &str = "json";
const INDENT: &[u8] = b"    ";

/// Codec for `.json` deck files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DeckCodec for JsonCodec {
    fn decode(&self, input: &str) -> Result<Deck> {
        serde_json::from_str(input).map_err(|e| DeckError::format(FORMAT, e.to_string()))
    }

    fn encode(&self, deck: &Deck) -> Result<String> {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
        deck.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|e| DeckError::format(FORMAT, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;

    #[test]
    fn test_encode_indents_four_spaces() {
        let deck = Deck::from_ids(&[1], &[], &[]);
        let text = JsonCodec.encode(&deck).unwrap();
        assert_eq!(
            text,
            "{\n    \"main\": [\n        1\n    ],\n    \"extra\": [],\n    \"side\": []\n}"
        );
    }

    #[test]
    fn test_lossless_round_trip() {
        let deck = Deck::new(
            vec![CardId::new(3), CardId::new(1), CardId::new(3)],
            vec![CardId::NaN],
            vec![CardId::new(7)],
        )
        .with_name("Greed");
        let text = JsonCodec.encode(&deck).unwrap();
        assert!(text.contains("\"name\": \"Greed\""));
        assert!(text.contains("null"));
        assert_eq!(JsonCodec.decode(&text).unwrap(), deck);
    }

    #[test]
    fn test_decode_errors() {
        let err = JsonCodec.decode("{\"main\": [1]").unwrap_err();
        assert!(matches!(err, DeckError::Format { format: "json", .. }), "{err}");
        assert!(JsonCodec.decode("{\"main\": [\"one\"], \"extra\": [], \"side\": []}").is_err());
        assert!(JsonCodec.decode("[1, 2, 3]").is_err());
    }
}
