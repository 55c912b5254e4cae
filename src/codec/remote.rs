//! Fetching decks that live behind a URL
//!
//! Only page text crosses an `.await`; HTML is parsed after the fetch
//! returns since `scraper::Html` is not `Send`.

use crate::codec::{DeckCodec, YdkCodec};
use crate::core::Deck;
use crate::{DeckError, Result};
use reqwest::Url;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on a single page or file fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const DOWNLOAD_LINK: &str = "a[download]";

/// GET `url` and return the body as text
///
/// Transport failures and non-success statuses are [`DeckError::Upstream`].
pub async fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DeckError::Upstream(format!("cannot build HTTP client: {e}")))?;

    debug!(url, "fetching");
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| DeckError::Upstream(format!("GET {url} failed: {e}")))?;
    response
        .text()
        .await
        .map_err(|e| DeckError::Upstream(format!("reading {url} failed: {e}")))
}

/// Absolute URL of the first `a[download]` link on a page
///
/// Relative hrefs are resolved against `page_url`. `None` when the page has
/// no such link, i.e. it is not a deck page.
pub fn find_download_link(html: &str, page_url: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(DOWNLOAD_LINK)
        .map_err(|e| DeckError::format("ygoprodeck", format!("bad selector: {e}")))?;

    let Some(href) = document
        .select(&selector)
        .find_map(|link| link.value().attr("href"))
        .map(str::trim)
    else {
        return Ok(None);
    };

    let resolved = match Url::parse(page_url) {
        Ok(base) => base
            .join(href)
            .map_err(|e| DeckError::format("ygoprodeck", format!("bad download link '{href}': {e}")))?
            .to_string(),
        Err(_) => href.to_string(),
    };
    Ok(Some(resolved))
}

/// Fetch a YGOPRODeck deck page, follow its `.ydk` download and decode it
pub async fn fetch_ygoprodeck_deck(url: &str) -> Result<Deck> {
    let page = fetch_text(url, FETCH_TIMEOUT).await?;
    let ydk_url = find_download_link(&page, url)?.ok_or_else(|| {
        DeckError::format(
            "ygoprodeck",
            "the URL provided isn't a deck list, make sure it points at a deck page",
        )
    })?;

    info!(page = url, ydk = %ydk_url, "following deck download");
    let ydk = fetch_text(&ydk_url, FETCH_TIMEOUT).await?;
    YdkCodec.decode(&ydk)
}
