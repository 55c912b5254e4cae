//! Format-to-format conversion
//!
//! Every conversion goes through the canonical [`Deck`]: decode with the
//! source codec, reject an empty result, encode with the target codec.

use crate::codec::{
    remote, DeckCodec, DeckFormat, JsonCodec, KonamiCodec, NameListCodec, OmegaCodec, YdkCodec,
    YdkeCodec,
};
use crate::core::Deck;
use crate::directory::CardDirectory;
use crate::{DeckError, Result};
use tracing::{debug, info};

/// Result of one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The decoded deck, with any name override applied
    pub deck: Deck,
    /// Encoded output in the target format
    pub output: String,
    /// Suggested file name when the target format is file-based
    pub file_name: Option<String>,
}

/// Dispatches decode/encode to the codec for each format
pub struct Converter<'a> {
    directory: &'a CardDirectory,
}

impl<'a> Converter<'a> {
    pub fn new(directory: &'a CardDirectory) -> Self {
        Converter { directory }
    }

    /// Codec for a format whose input is the deck text itself
    fn codec(&self, format: DeckFormat) -> Option<Box<dyn DeckCodec + 'a>> {
        let directory = self.directory;
        match format {
            DeckFormat::Ydk => Some(Box::new(YdkCodec)),
            DeckFormat::Ydke => Some(Box::new(YdkeCodec)),
            DeckFormat::Json => Some(Box::new(JsonCodec)),
            DeckFormat::Omega => Some(Box::new(OmegaCodec::new(directory))),
            DeckFormat::NameList => Some(Box::new(NameListCodec::new(directory))),
            DeckFormat::Konami => Some(Box::new(KonamiCodec::new(directory))),
            DeckFormat::YgoProDeck => None,
        }
    }

    /// Decode `input` as `format`. For remote formats `input` is the URL.
    pub async fn decode(&self, format: DeckFormat, input: &str) -> Result<Deck> {
        debug!(%format, bytes = input.len(), "decoding");
        let deck = match format {
            DeckFormat::Konami => {
                KonamiCodec::new(self.directory)
                    .fetch_and_decode(input.trim())
                    .await?
            }
            DeckFormat::YgoProDeck => remote::fetch_ygoprodeck_deck(input.trim()).await?,
            _ => self.codec_or_unsupported(format)?.decode(input)?,
        };
        if deck.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        Ok(deck)
    }

    /// Encode `deck` as `format`
    pub fn encode(&self, format: DeckFormat, deck: &Deck) -> Result<String> {
        self.codec_or_unsupported(format)?.encode(deck)
    }

    fn codec_or_unsupported(&self, format: DeckFormat) -> Result<Box<dyn DeckCodec + 'a>> {
        self.codec(format).ok_or_else(|| DeckError::Unsupported {
            format: format.as_str(),
            message: format!("{format} decks are only reachable by URL and cannot be written"),
        })
    }

    /// Decode from one format and encode into another
    ///
    /// `name_override` replaces the deck name used in the output and in the
    /// suggested file name.
    pub async fn convert(
        &self,
        from: DeckFormat,
        to: DeckFormat,
        input: &str,
        name_override: Option<&str>,
    ) -> Result<Conversion> {
        let mut deck = self.decode(from, input).await?;
        if let Some(name) = name_override {
            deck.name = Some(name.to_string());
        }
        let output = self.encode(to, &deck)?;
        let file_name = to
            .file_extension()
            .map(|ext| deck.file_name(name_override, ext));

        info!(
            %from,
            %to,
            main = deck.main.len(),
            extra = deck.extra.len(),
            side = deck.side.len(),
            "converted deck"
        );
        Ok(Conversion {
            deck,
            output,
            file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::directory::CardRecord;
    use std::sync::Arc;

    const POT: u32 = 55144522;
    const DECODE_TALKER: u32 = 1861629;

    fn directory() -> Arc<CardDirectory> {
        CardDirectory::from_records(
            vec![
                CardRecord::new(POT, "Pot of Greed", 0x2),
                CardRecord::new(DECODE_TALKER, "Decode Talker", 0x4000021),
            ],
            vec![
                CardRecord::new(POT, "Pot of Greed", 0x2),
                CardRecord::new(DECODE_TALKER, "Decode Talker", 0x4000021),
            ],
        )
    }

    #[tokio::test]
    async fn test_ydk_to_ydke() {
        let directory = directory();
        let converter = Converter::new(&directory);
        let conversion = converter
            .convert(
                DeckFormat::Ydk,
                DeckFormat::Ydke,
                "#main\n55144522\n55144522\n#extra\n1861629\n!side\n",
                None,
            )
            .await
            .unwrap();
        assert_eq!(conversion.output, "ydke://SnBJA0pwSQM=!/WccAA==!!");
        assert_eq!(conversion.file_name, None);
    }

    #[tokio::test]
    async fn test_name_override_sets_file_name() {
        let directory = directory();
        let converter = Converter::new(&directory);
        let input = "{\"name\": \"Old\", \"main\": [55144522], \"extra\": [], \"side\": []}";

        let conversion = converter
            .convert(DeckFormat::Json, DeckFormat::Ydk, input, Some("Greed"))
            .await
            .unwrap();
        assert_eq!(conversion.file_name.as_deref(), Some("Greed.ydk"));
        assert_eq!(conversion.deck.name.as_deref(), Some("Greed"));

        let conversion = converter
            .convert(DeckFormat::Json, DeckFormat::Json, input, None)
            .await
            .unwrap();
        assert_eq!(conversion.file_name.as_deref(), Some("Old.json"));
    }

    #[tokio::test]
    async fn test_empty_deck_is_rejected() {
        let directory = directory();
        let converter = Converter::new(&directory);
        let err = converter
            .convert(DeckFormat::Ydke, DeckFormat::Ydk, "ydke://!!!", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeckError::EmptyDeck), "{err}");
    }

    #[tokio::test]
    async fn test_decode_only_targets() {
        let directory = directory();
        let converter = Converter::new(&directory);
        let deck = Deck::new(vec![CardId::new(POT)], vec![], vec![]);
        for format in [DeckFormat::Konami, DeckFormat::YgoProDeck] {
            let err = converter.encode(format, &deck).unwrap_err();
            assert!(matches!(err, DeckError::Unsupported { .. }), "{format}: {err}");
        }
    }

    #[tokio::test]
    async fn test_omega_to_namelist() {
        let directory = directory();
        let converter = Converter::new(&directory);
        let deck = Deck::from_ids(&[POT, POT], &[DECODE_TALKER], &[]);
        let code = converter.encode(DeckFormat::Omega, &deck).unwrap();

        let conversion = converter
            .convert(DeckFormat::Omega, DeckFormat::NameList, &code, None)
            .await
            .unwrap();
        assert_eq!(conversion.output, "2 Pot of Greed\n\n1 Decode Talker");
    }
}
