//! Omega deck codes
//!
//! Byte layout before compression:
//!
//! | offset | size  | content                                   |
//! |--------|-------|-------------------------------------------|
//! | 0      | 1     | M = main + extra card count               |
//! | 1      | 1     | S = side card count                       |
//! | 2      | 4 * M | main then extra ids, little-endian `u32`  |
//! | 2+4M   | 4 * S | side ids, little-endian `u32`             |
//!
//! The bytes are compressed with raw DEFLATE (no zlib header) and the result
//! is standard base64.
//!
//! Main/extra ids are OmegaDB numbering. Decoding translates each to the
//! canonical id through its card name and splits main from extra by card
//! type. Side ids are stored and returned as-is.

use crate::codec::DeckCodec;
use crate::core::{CardId, Deck};
use crate::directory::{CardDirectory, Dataset, DirectorySnapshot, Scope};
use crate::{DeckError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use nom::multi::count;
use nom::number::complete::{le_u32, le_u8};
use nom::sequence::pair;
use nom::IResult;
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Most main + extra cards an Omega code may declare
pub const MAX_MAIN_EXTRA: u8 = 75;
/// Most side cards an Omega code may declare
pub const MAX_SIDE: u8 = 15;

const FORMAT: &str = "omega";

fn header(input: &[u8]) -> IResult<&[u8], (u8, u8)> {
    pair(le_u8, le_u8)(input)
}

fn ids(input: &[u8], n: usize) -> IResult<&[u8], Vec<u32>> {
    count(le_u32, n)(input)
}

fn truncated(_: nom::Err<nom::error::Error<&[u8]>>) -> DeckError {
    DeckError::format(FORMAT, "payload ends before the declared card count")
}

/// Codec for Omega deck codes
pub struct OmegaCodec<'a> {
    directory: &'a CardDirectory,
}

impl<'a> OmegaCodec<'a> {
    pub fn new(directory: &'a CardDirectory) -> Self {
        OmegaCodec { directory }
    }

    /// Canonical id for an OmegaDB id, and whether it belongs in the extra deck
    fn resolve(snapshot: &DirectorySnapshot, omega_id: u32) -> Result<(CardId, bool)> {
        let native = snapshot.record_for_id(omega_id, Scope::Only(Dataset::Omega))?;
        let id = snapshot.id_for_name(native.name.as_str(), Scope::Both)?;
        // The OmegaDB row describes the same printed card, so its type bits
        // decide the zone even when the canonical id differs.
        Ok((CardId::Known(id), native.type_flags().is_extra_deck()))
    }
}

/// Base64-decode and inflate an Omega code into its packed bytes
pub fn unpack(code: &str) -> Result<Vec<u8>> {
    let compressed = BASE64
        .decode(code.trim())
        .map_err(|e| DeckError::format(FORMAT, format!("bad base64: {e}")))?;
    let mut inflated = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut inflated)
        .map_err(|e| DeckError::format(FORMAT, format!("bad deflate stream: {e}")))?;
    Ok(inflated)
}

/// Deflate and base64-encode packed bytes
pub fn pack(bytes: &[u8]) -> Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(BASE64.encode(encoder.finish()?))
}

impl DeckCodec for OmegaCodec<'_> {
    fn decode(&self, input: &str) -> Result<Deck> {
        let bytes = unpack(input)?;
        let (rest, (main_extra_count, side_count)) = header(&bytes).map_err(truncated)?;

        if main_extra_count > MAX_MAIN_EXTRA || side_count > MAX_SIDE {
            warn!(
                main_extra = main_extra_count,
                side = side_count,
                "omega code declares more cards than a deck can hold, returning empty deck"
            );
            return Ok(Deck::default());
        }

        let (rest, main_extra) = ids(rest, main_extra_count as usize).map_err(truncated)?;
        let (rest, side) = ids(rest, side_count as usize).map_err(truncated)?;
        if !rest.is_empty() {
            debug!(trailing = rest.len(), "ignoring trailing bytes in omega code");
        }

        let snapshot = self.directory.snapshot();
        let mut deck = Deck::default();
        for omega_id in main_extra {
            let (id, is_extra) = Self::resolve(&snapshot, omega_id)?;
            if is_extra {
                deck.extra.push(id);
            } else {
                deck.main.push(id);
            }
        }
        deck.side = side.into_iter().map(CardId::Known).collect();
        Ok(deck)
    }

    fn encode(&self, deck: &Deck) -> Result<String> {
        let main_extra_count = u8::try_from(deck.main.len() + deck.extra.len()).map_err(|_| {
            DeckError::format(FORMAT, "more than 255 main + extra cards cannot be encoded")
        })?;
        let side_count = u8::try_from(deck.side.len())
            .map_err(|_| DeckError::format(FORMAT, "more than 255 side cards cannot be encoded"))?;

        let mut bytes = Vec::with_capacity(2 + 4 * deck.len());
        bytes.push(main_extra_count);
        bytes.push(side_count);
        for card in deck.main.iter().chain(&deck.extra).chain(&deck.side) {
            bytes.extend_from_slice(&card.to_wire().to_le_bytes());
        }
        pack(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::CardRecord;
    use std::sync::Arc;

    const POT: u32 = 55144522;
    const DECODE_TALKER: u32 = 1861629;
    const ASH: u32 = 14558127;
    /// OmegaDB's own id for a card whose canonical id is ASH
    const ASH_OMEGA: u32 = 900014558;

    fn directory() -> Arc<CardDirectory> {
        CardDirectory::from_records(
            vec![
                CardRecord::new(POT, "Pot of Greed", 0x2),
                CardRecord::new(DECODE_TALKER, "Decode Talker", 0x4000021),
                CardRecord::new(ASH, "Ash Blossom & Joyous Spring", 0x1021),
            ],
            vec![
                CardRecord::new(POT, "Pot of Greed", 0x2),
                CardRecord::new(DECODE_TALKER, "Decode Talker", 0x4000021),
                CardRecord::new(ASH_OMEGA, "Ash Blossom & Joyous Spring", 0x1021),
            ],
        )
    }

    fn packed(main_extra: &[u32], side: &[u32]) -> String {
        let mut bytes = vec![main_extra.len() as u8, side.len() as u8];
        for id in main_extra.iter().chain(side) {
            bytes.extend_from_slice(&id.to_le_bytes());
        }
        pack(&bytes).unwrap()
    }

    #[test]
    fn test_decode_splits_extra_by_type() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let code = packed(&[POT, DECODE_TALKER, POT], &[ASH]);

        let deck = codec.decode(&code).unwrap();
        assert_eq!(deck, Deck::from_ids(&[POT, POT], &[DECODE_TALKER], &[ASH]));
    }

    #[test]
    fn test_decode_translates_omega_ids() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let code = packed(&[ASH_OMEGA], &[]);

        let deck = codec.decode(&code).unwrap();
        assert_eq!(deck.main, vec![CardId::new(ASH)]);
    }

    #[test]
    fn test_side_ids_are_not_translated() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        // Side entries are not looked up at all, so unknown ids pass through
        let code = packed(&[POT], &[ASH_OMEGA, 12345]);

        let deck = codec.decode(&code).unwrap();
        assert_eq!(deck.side, vec![CardId::new(ASH_OMEGA), CardId::new(12345)]);
    }

    #[test]
    fn test_decode_unknown_omega_id_is_not_found() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let err = codec.decode(&packed(&[ASH], &[])).unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn test_capacity_limits() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);

        let mut too_many_main = vec![76u8, 0];
        too_many_main.extend(std::iter::repeat(0).take(76 * 4));
        assert!(codec.decode(&pack(&too_many_main).unwrap()).unwrap().is_empty());

        let mut too_many_side = vec![0u8, 16];
        too_many_side.extend(std::iter::repeat(0).take(16 * 4));
        assert!(codec.decode(&pack(&too_many_side).unwrap()).unwrap().is_empty());

        let at_limit = packed(&[POT; 75], &[ASH; 15]);
        let deck = codec.decode(&at_limit).unwrap();
        assert_eq!(deck.main.len(), 75);
        assert_eq!(deck.side.len(), 15);
    }

    #[test]
    fn test_truncated_payload_is_format_error() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let mut bytes = vec![2u8, 0];
        bytes.extend_from_slice(&POT.to_le_bytes());
        let err = codec.decode(&pack(&bytes).unwrap()).unwrap_err();
        assert!(matches!(err, DeckError::Format { .. }), "{err}");

        assert!(codec.decode(&pack(&[]).unwrap()).is_err());
        assert!(codec.decode("not base64!").is_err());
        assert!(codec.decode("AAAA").is_err());
    }

    #[test]
    fn test_encode_layout() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let deck = Deck::from_ids(&[POT, POT], &[DECODE_TALKER], &[ASH]);

        let bytes = unpack(&codec.encode(&deck).unwrap()).unwrap();
        assert_eq!(bytes.len(), 2 + 4 * 4);
        assert_eq!(&bytes[..2], &[3, 1]);
        assert_eq!(&bytes[2..6], &POT.to_le_bytes());
        assert_eq!(&bytes[10..14], &DECODE_TALKER.to_le_bytes());
        assert_eq!(&bytes[14..18], &ASH.to_le_bytes());

        assert_eq!(codec.decode(&codec.encode(&deck).unwrap()).unwrap(), deck);
    }

    #[test]
    fn test_decode_code_from_other_encoder() {
        // Produced by an independent raw-deflate implementation (zlib level 6)
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let deck = codec.decode("Y2T0KvBkXq98jwEA").unwrap();
        assert_eq!(deck, Deck::from_ids(&[POT], &[], &[ASH]));
    }

    #[test]
    fn test_encode_rejects_unrepresentable_counts() {
        let directory = directory();
        let codec = OmegaCodec::new(&directory);
        let deck = Deck::from_ids(&[POT; 256], &[], &[]);
        assert!(codec.encode(&deck).is_err());

        // Over the 75-card limit but still representable: not re-validated
        let deck = Deck::from_ids(&[POT; 100], &[], &[]);
        assert!(codec.encode(&deck).is_ok());
    }
}
