//! Konami card database deck pages
//!
//! Read-only: the page is scraped for `(amount, name)` rows per zone and the
//! names are resolved through the directory. There is no way to publish a
//! deck back to the database.

use crate::codec::namelist::{expand_entries, MAX_ZONE_CARDS};
use crate::codec::{remote, DeckCodec};
use crate::core::{Deck, Zone};
use crate::directory::CardDirectory;
use crate::{DeckError, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const FORMAT: &str = "konami";

const TITLE: &str = "#broad_title";
const CARD_NAME: &str = ".card_name";
const AMOUNT: &str = ".num";

/// Message carried by the encode error
pub const UPLOAD_UNSUPPORTED: &str = "deckforge cannot upload decks to the Konami database.";

fn rows_selector(zone: Zone) -> &'static str {
    match zone {
        Zone::Main => "#text_main.deck_set .row",
        Zone::Extra => "#extra_list .row",
        Zone::Side => "#side_list .row",
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DeckError::format(FORMAT, format!("bad selector '{css}': {e}")))
}

/// Scraped contents of one deck page, before name resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KonamiPage {
    pub title: Option<String>,
    pub main: Vec<(u32, String)>,
    pub extra: Vec<(u32, String)>,
    pub side: Vec<(u32, String)>,
}

impl KonamiPage {
    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<(u32, String)> {
        match zone {
            Zone::Main => &mut self.main,
            Zone::Extra => &mut self.extra,
            Zone::Side => &mut self.side,
        }
    }

    pub fn zone(&self, zone: Zone) -> &[(u32, String)] {
        match zone {
            Zone::Main => &self.main,
            Zone::Extra => &self.extra,
            Zone::Side => &self.side,
        }
    }
}

/// Text of the first element child of the first `css` match under `row`
fn cell_text(row: ElementRef<'_>, css: &Selector) -> Option<String> {
    let cell = row.select(css).next()?;
    let inner = cell.children().find_map(ElementRef::wrap)?;
    Some(inner.text().collect::<String>().trim().to_string())
}

/// Pull the deck title and per-zone rows out of a deck page
pub fn parse_page(html: &str) -> Result<KonamiPage> {
    let document = Html::parse_document(html);
    let card_name = selector(CARD_NAME)?;
    let amount = selector(AMOUNT)?;

    let mut page = KonamiPage {
        title: document
            .select(&selector(TITLE)?)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty()),
        ..KonamiPage::default()
    };

    for zone in Zone::ALL {
        for row in document.select(&selector(rows_selector(zone))?) {
            let (Some(name), Some(quantity)) = (cell_text(row, &card_name), cell_text(row, &amount))
            else {
                debug!(%zone, "skipping deck row without a name or amount cell");
                continue;
            };
            let quantity = quantity
                .parse::<u32>()
                .ok()
                .filter(|amount| *amount <= MAX_ZONE_CARDS)
                .ok_or_else(|| {
                    DeckError::format(
                        FORMAT,
                        format!("'{quantity}' is not a card amount for {name}"),
                    )
                })?;
            page.zone_mut(zone).push((quantity, name));
        }
    }
    Ok(page)
}

/// Codec for Konami deck pages; `decode` takes the page HTML
pub struct KonamiCodec<'a> {
    directory: &'a CardDirectory,
}

impl<'a> KonamiCodec<'a> {
    pub fn new(directory: &'a CardDirectory) -> Self {
        KonamiCodec { directory }
    }

    /// Fetch a deck page and decode it
    pub async fn fetch_and_decode(&self, url: &str) -> Result<Deck> {
        let html = remote::fetch_text(url, remote::FETCH_TIMEOUT).await?;
        self.decode(&html)
    }
}

impl DeckCodec for KonamiCodec<'_> {
    fn decode(&self, input: &str) -> Result<Deck> {
        let page = parse_page(input)?;
        let snapshot = self.directory.snapshot();

        let mut deck = Deck::default();
        for zone in Zone::ALL {
            let entries = page
                .zone(zone)
                .iter()
                .map(|(amount, name)| (*amount, name.as_str()));
            *deck.zone_mut(zone) = expand_entries(&snapshot, FORMAT, entries)?;
        }
        deck.name = page.title;
        Ok(deck)
    }

    fn encode(&self, _deck: &Deck) -> Result<String> {
        Err(DeckError::Unsupported {
            format: FORMAT,
            message: UPLOAD_UNSUPPORTED.to_string(),
        })
    }
}
