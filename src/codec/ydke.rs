//! `ydke://` deck URIs
//!
//! `ydke://<main>!<extra>!<side>!` where each block is standard base64 over
//! the zone's card ids packed as little-endian `u32`s.

use crate::codec::DeckCodec;
use crate::core::{CardId, Deck};
use crate::{DeckError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub const SCHEME: &str = "ydke://";
pub const DELIMITER: char = '!';

const FORMAT: &str = "ydke";

/// Codec for `ydke://` URIs
#[derive(Debug, Clone, Copy, Default)]
pub struct YdkeCodec;

fn unpack_block(block: &str) -> Result<Vec<CardId>> {
    let bytes = BASE64
        .decode(block)
        .map_err(|e| DeckError::format(FORMAT, format!("bad base64 block: {e}")))?;
    if bytes.len() % 4 != 0 {
        return Err(DeckError::format(
            FORMAT,
            format!("block length {} is not a multiple of 4", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| CardId::Known(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])))
        .collect())
}

fn pack_block(cards: &[CardId]) -> String {
    let bytes: Vec<u8> = cards
        .iter()
        .flat_map(|card| card.to_wire().to_le_bytes())
        .collect();
    BASE64.encode(bytes)
}

impl DeckCodec for YdkeCodec {
    fn decode(&self, input: &str) -> Result<Deck> {
        let body = input
            .trim()
            .strip_prefix(SCHEME)
            .ok_or_else(|| DeckError::format(FORMAT, "unrecognized URL protocol"))?;

        let blocks: Vec<&str> = body.split(DELIMITER).collect();
        if blocks.len() < 3 {
            return Err(DeckError::format(FORMAT, "missing ydke URL component"));
        }

        Ok(Deck::new(
            unpack_block(blocks[0])?,
            unpack_block(blocks[1])?,
            unpack_block(blocks[2])?,
        ))
    }

    fn encode(&self, deck: &Deck) -> Result<String> {
        Ok(format!(
            "{SCHEME}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}",
            pack_block(&deck.main),
            pack_block(&deck.extra),
            pack_block(&deck.side),
        ))
    }
}
