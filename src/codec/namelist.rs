//! Card name lists
//!
//! ```text
//! 3 Pot of Greed
//! 1 Ash Blossom & Joyous Spring
//!
//! 1 Decode Talker
//!
//! 2 Called by the Grave
//! ```
//!
//! Main, extra and side blocks separated by a blank line. Counts are
//! expanded on decode and regrouped on encode, so the order of duplicates
//! within a zone is not preserved; the per-zone multiset is.

use crate::codec::DeckCodec;
use crate::core::{CardId, Deck, Zone};
use crate::directory::{CardDirectory, DirectorySnapshot, Scope};
use crate::{DeckError, Result};
use nom::bytes::complete::{take_till1, take_while1};
use nom::combinator::rest;
use nom::sequence::separated_pair;
use nom::IResult;
use rustc_hash::FxHashMap;
use tracing::warn;

const FORMAT: &str = "namelist";
const BLOCK_SEPARATOR: &str = "\n\n";

/// Most cards one zone can hold (a full main deck); caps both a single
/// entry's amount and a zone's running total
pub const MAX_ZONE_CARDS: u32 = 60;

/// One `"<amount> <name>"` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameListEntry<'a> {
    pub amount: u32,
    pub name: &'a str,
}

fn entry_parts(line: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_till1(char::is_whitespace),
        take_while1(char::is_whitespace),
        rest,
    )(line)
}

/// Parse one entry line; the name is everything after the first whitespace
/// run, trimmed
pub fn parse_entry(line: &str) -> Result<NameListEntry<'_>> {
    let (_, (amount, name)) = entry_parts(line.trim()).map_err(|_| {
        DeckError::format(FORMAT, format!("expected '<amount> <name>', got '{}'", line.trim()))
    })?;
    let amount = amount.parse::<u32>().map_err(|_| {
        DeckError::format(FORMAT, format!("'{amount}' is not a card amount"))
    })?;
    if amount > MAX_ZONE_CARDS {
        return Err(DeckError::format(
            FORMAT,
            format!("amount {amount} is more than a zone can hold ({MAX_ZONE_CARDS})"),
        ));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(DeckError::format(FORMAT, "entry has no card name"));
    }
    Ok(NameListEntry { amount, name })
}

/// Codec for name lists
pub struct NameListCodec<'a> {
    directory: &'a CardDirectory,
}

impl<'a> NameListCodec<'a> {
    pub fn new(directory: &'a CardDirectory) -> Self {
        NameListCodec { directory }
    }
}

/// Expand `"<amount> <name>"` entries into ids, `amount` copies each
///
/// Shared with the Konami page scraper, which yields the same pairs. A zone
/// totalling more than [`MAX_ZONE_CARDS`] is a format error for `format`.
pub(crate) fn expand_entries<'n>(
    snapshot: &DirectorySnapshot,
    format: &'static str,
    entries: impl IntoIterator<Item = (u32, &'n str)>,
) -> Result<Vec<CardId>> {
    let mut cards = Vec::new();
    let mut total: u32 = 0;
    for (amount, name) in entries {
        total = total
            .checked_add(amount)
            .filter(|total| *total <= MAX_ZONE_CARDS)
            .ok_or_else(|| {
                DeckError::format(
                    format,
                    format!("zone holds more than {MAX_ZONE_CARDS} cards"),
                )
            })?;
        let id = snapshot.id_for_name(name, Scope::Both)?;
        cards.extend(std::iter::repeat(CardId::Known(id)).take(amount as usize));
    }
    Ok(cards)
}

/// Group a zone into `(card, count)` in order of first appearance
fn count_cards(cards: &[CardId]) -> Vec<(CardId, usize)> {
    let mut counts: Vec<(CardId, usize)> = Vec::new();
    let mut positions: FxHashMap<CardId, usize> = FxHashMap::default();
    for card in cards {
        match positions.get(card) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(*card, counts.len());
                counts.push((*card, 1));
            }
        }
    }
    counts
}

impl DeckCodec for NameListCodec<'_> {
    fn decode(&self, input: &str) -> Result<Deck> {
        let normalized = input.replace("\r\n", "\n");
        let blocks: Vec<&str> = normalized.trim().split(BLOCK_SEPARATOR).collect();
        if blocks.len() > Zone::ALL.len() {
            warn!(
                blocks = blocks.len(),
                "name list has more than three blocks, ignoring the rest"
            );
        }

        let snapshot = self.directory.snapshot();
        let mut deck = Deck::default();
        for (zone, block) in Zone::ALL.into_iter().zip(blocks) {
            let entries = block
                .trim()
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(parse_entry)
                .collect::<Result<Vec<_>>>()?;
            *deck.zone_mut(zone) =
                expand_entries(&snapshot, FORMAT, entries.iter().map(|e| (e.amount, e.name)))?;
        }
        Ok(deck)
    }

    fn encode(&self, deck: &Deck) -> Result<String> {
        let snapshot = self.directory.snapshot();
        let mut blocks = Vec::with_capacity(3);
        for (_, cards) in deck.zones() {
            let lines = count_cards(cards)
                .into_iter()
                .map(|(card, amount)| {
                    let name = snapshot.name_for_card(card, Scope::Both)?;
                    Ok(format!("{amount} {name}"))
                })
                .collect::<Result<Vec<_>>>()?;
            blocks.push(lines.join("\n"));
        }
        Ok(blocks.join(BLOCK_SEPARATOR).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::CardRecord;
    use std::sync::Arc;

    const POT: u32 = 55144522;
    const ASH: u32 = 14558127;
    const DECODE_TALKER: u32 = 1861629;
    const CALLED: u32 = 24224830;

    fn directory() -> Arc<CardDirectory> {
        CardDirectory::from_records(
            vec![
                CardRecord::new(POT, "Pot of Greed", 0x2),
                CardRecord::new(ASH, "Ash Blossom & Joyous Spring", 0x1021),
                CardRecord::new(DECODE_TALKER, "Decode Talker", 0x4000021),
                CardRecord::new(CALLED, "Called by the Grave", 0x10002),
            ],
            vec![],
        )
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            parse_entry("3 Pot of Greed").unwrap(),
            NameListEntry {
                amount: 3,
                name: "Pot of Greed"
            }
        );
        assert_eq!(parse_entry("  1\tDecode Talker  ").unwrap().name, "Decode Talker");
        assert!(parse_entry("Pot of Greed").is_err());
        assert!(parse_entry("three Pot of Greed").is_err());
        assert!(parse_entry("3").is_err());
    }

    #[test]
    fn test_parse_entry_unicode_separator() {
        let entry = parse_entry("3\u{a0}Pot of Greed").unwrap();
        assert_eq!(entry.amount, 3);
        assert_eq!(entry.name, "Pot of Greed");
        assert_eq!(parse_entry("2 \u{3000} Pot of Greed").unwrap().name, "Pot of Greed");
    }

    #[test]
    fn test_amount_above_zone_limit_is_format_error() {
        for line in ["61 Pot of Greed", "4294967295 Pot of Greed"] {
            let err = parse_entry(line).unwrap_err();
            assert!(matches!(err, DeckError::Format { format: FORMAT, .. }), "{line}: {err}");
        }
        assert_eq!(parse_entry("60 Pot of Greed").unwrap().amount, MAX_ZONE_CARDS);
    }

    #[test]
    fn test_zone_total_is_capped() {
        let directory = directory();
        let codec = NameListCodec::new(&directory);

        let deck = codec.decode("40 Pot of Greed\n20 Called by the Grave").unwrap();
        assert_eq!(deck.main.len(), 60);

        let err = codec
            .decode("40 Pot of Greed\n21 Called by the Grave")
            .unwrap_err();
        assert!(matches!(err, DeckError::Format { .. }), "{err}");

        let err = codec
            .decode("4294967295 Pot of Greed\n\n1 Decode Talker")
            .unwrap_err();
        assert!(matches!(err, DeckError::Format { .. }), "{err}");
    }

    #[test]
    fn test_decode_single_block() {
        let directory = directory();
        let deck = NameListCodec::new(&directory).decode("3 Pot of Greed").unwrap();
        assert_eq!(deck, Deck::from_ids(&[POT, POT, POT], &[], &[]));
    }

    #[test]
    fn test_decode_three_blocks() {
        let directory = directory();
        let input = "2 Pot of Greed\r\n1 Ash Blossom & Joyous Spring\r\n\r\n1 Decode Talker\r\n\r\n2 Called by the Grave\r\n";
        let deck = NameListCodec::new(&directory).decode(input).unwrap();
        assert_eq!(
            deck,
            Deck::from_ids(&[POT, POT, ASH], &[DECODE_TALKER], &[CALLED, CALLED])
        );
    }

    #[test]
    fn test_decode_unknown_name() {
        let directory = directory();
        let err = NameListCodec::new(&directory)
            .decode("1 Monster Reborn")
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn test_decode_zero_amount() {
        let directory = directory();
        let deck = NameListCodec::new(&directory)
            .decode("0 Pot of Greed\n1 Decode Talker")
            .unwrap();
        assert_eq!(deck.main, vec![CardId::new(DECODE_TALKER)]);
    }

    #[test]
    fn test_encode_groups_duplicates() {
        let directory = directory();
        let deck = Deck::from_ids(&[POT, ASH, POT], &[DECODE_TALKER], &[CALLED, CALLED]);
        let text = NameListCodec::new(&directory).encode(&deck).unwrap();
        assert_eq!(
            text,
            "2 Pot of Greed\n1 Ash Blossom & Joyous Spring\n\n1 Decode Talker\n\n2 Called by the Grave"
        );
    }

    #[test]
    fn test_encode_empty_extra_keeps_side_block() {
        let directory = directory();
        let codec = NameListCodec::new(&directory);
        let deck = Deck::from_ids(&[POT], &[], &[ASH]);
        let text = codec.encode(&deck).unwrap();
        assert_eq!(text, "1 Pot of Greed\n\n\n\n1 Ash Blossom & Joyous Spring");
        assert_eq!(codec.decode(&text).unwrap(), deck);
    }

    #[test]
    fn test_round_trip_keeps_multisets() {
        let directory = directory();
        let codec = NameListCodec::new(&directory);
        let deck = Deck::from_ids(&[ASH, POT, ASH, POT, POT], &[DECODE_TALKER], &[CALLED]);
        let back = codec.decode(&codec.encode(&deck).unwrap()).unwrap();

        for zone in Zone::ALL {
            let mut original = deck.zone(zone).to_vec();
            let mut decoded = back.zone(zone).to_vec();
            original.sort();
            decoded.sort();
            assert_eq!(original, decoded, "zone {zone}");
        }
        assert_eq!(back.main, Deck::from_ids(&[ASH, ASH, POT, POT, POT], &[], &[]).main);
    }

    #[test]
    fn test_encode_nan_is_not_found() {
        let directory = directory();
        let deck = Deck::new(vec![CardId::NaN], vec![], vec![]);
        let err = NameListCodec::new(&directory).encode(&deck).unwrap_err();
        assert!(err.is_not_found());
    }
}
