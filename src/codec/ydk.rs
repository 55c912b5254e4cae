//! Plain-text deck files (.ydk)
//!
//! ```text
//! #created by ...
//! #main
//! 55144522
//! #extra
//! 1861629
//! !side
//! 14558127
//! ```
//!
//! One card id per line under each marker. Lines before `#main` are
//! comments, markers included. Once `#main` is open the markers must follow
//! in order; repeating the current marker is allowed, any other misplaced
//! marker fails the decode. Other lines starting with `#` or `!` are
//! skipped. A line that is not a number becomes [`CardId::NaN`] instead of
//! failing the decode.

use crate::codec::DeckCodec;
use crate::core::{CardId, Deck, Zone};
use crate::{DeckError, Result};

/// First line of every file this codec writes
pub const HEADER: &str = "#created by deckforge";

const MAIN_MARKER: &str = "#main";
const EXTRA_MARKER: &str = "#extra";
const SIDE_MARKER: &str = "!side";

const FORMAT: &str = "ydk";

/// Codec for `.ydk` text
#[derive(Debug, Clone, Copy, Default)]
pub struct YdkCodec;

fn marker_zone(line: &str) -> Option<Zone> {
    match line {
        MAIN_MARKER => Some(Zone::Main),
        EXTRA_MARKER => Some(Zone::Extra),
        SIDE_MARKER => Some(Zone::Side),
        _ => None,
    }
}

fn marker_for(zone: Zone) -> &'static str {
    match zone {
        Zone::Main => MAIN_MARKER,
        Zone::Extra => EXTRA_MARKER,
        Zone::Side => SIDE_MARKER,
    }
}

impl DeckCodec for YdkCodec {
    fn decode(&self, input: &str) -> Result<Deck> {
        let mut deck = Deck::default();
        // Index into Zone::ALL of the section being read; None before #main
        let mut section: Option<usize> = None;

        for line in input.split('\n') {
            let line = line.trim_end_matches('\r').trim();
            if line.is_empty() {
                continue;
            }

            if let Some(zone) = marker_zone(line) {
                let expected = section.map_or(0, |i| i + 1);
                let index = Zone::ALL.iter().position(|z| *z == zone);
                match (section, index) {
                    (_, Some(i)) if i == expected => section = Some(i),
                    // Repeat of the section being read
                    (Some(open), Some(i)) if i == open => {}
                    // Before #main every line is a comment
                    (None, _) => {}
                    _ => {
                        return Err(DeckError::format(
                            FORMAT,
                            format!(
                                "section markers must appear in the order {MAIN_MARKER}, \
                                 {EXTRA_MARKER}, {SIDE_MARKER}; found {line} out of place"
                            ),
                        ))
                    }
                }
                continue;
            }

            let Some(index) = section else {
                continue;
            };
            if line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let card: CardId = line.parse().unwrap_or(CardId::NaN);
            deck.zone_mut(Zone::ALL[index]).push(card);
        }

        match section {
            Some(2) => Ok(deck),
            opened => {
                let missing = Zone::ALL[opened.map_or(0, |i| i + 1)];
                Err(DeckError::format(
                    FORMAT,
                    format!("missing {} marker", marker_for(missing)),
                ))
            }
        }
    }

    fn encode(&self, deck: &Deck) -> Result<String> {
        let mut lines = Vec::with_capacity(deck.len() + 4);
        lines.push(HEADER.to_string());
        for (zone, cards) in deck.zones() {
            lines.push(marker_for(zone).to_string());
            lines.extend(cards.iter().map(CardId::to_string));
        }
        Ok(lines.join("\n"))
    }
}
