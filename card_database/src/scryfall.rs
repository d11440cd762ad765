//! Scryfall API access
//!
//! Uses blocking reqwest: the build is a sequential batch job. Any transport
//! failure is fatal to the run, there is no retry.

use crate::error::{BuildError, Result};
use mtg_common::{ApiError, BulkDataCatalog, ScryfallCard, SearchPage, SetMetadata};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::io::Write;
use std::time::Duration;

pub const SCRYFALL_API: &str = "https://api.scryfall.com";
const USER_AGENT: &str = "card_database/0.1";

/// Remote card data needed by the build
pub trait CardSource {
    /// Download URI of the bulk file of the given type
    fn bulk_data_uri(&self, kind: &str) -> Result<String>;

    /// Stream the body of `url` into `out`, returning the byte count
    fn download(&self, url: &str, out: &mut dyn Write) -> Result<u64>;

    /// All cards matching a search query, across every result page
    fn search(&self, query: &str) -> Result<Vec<ScryfallCard>>;

    /// Set metadata, or `None` if Scryfall does not know the code
    fn set_metadata(&self, code: &str) -> Result<Option<SetMetadata>>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct ScryfallClient {
    http: Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SCRYFALL_API)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        // Bulk files are large; the default 30s total timeout is not enough
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, url: &str) -> Result<Response> {
        log::debug!("GET {}", url);
        let response = self.http.get(url).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match response.json::<ApiError>() {
            Ok(error) => Err(BuildError::Api(error)),
            Err(_) => Err(BuildError::HttpStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}

fn is_not_found(error: &BuildError) -> bool {
    match error {
        BuildError::Api(api) => api.status == StatusCode::NOT_FOUND.as_u16(),
        BuildError::HttpStatus { status, .. } => *status == StatusCode::NOT_FOUND,
        _ => false,
    }
}

impl CardSource for ScryfallClient {
    fn bulk_data_uri(&self, kind: &str) -> Result<String> {
        let catalog: BulkDataCatalog = self
            .get(&format!("{}/bulk-data", self.base_url))?
            .json()?;
        catalog
            .download_uri(kind)
            .map(str::to_string)
            .ok_or_else(|| BuildError::BulkDataUnavailable(kind.to_string()))
    }

    fn download(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        log::info!("Downloading {}...", url);
        let mut response = self.get(url)?;
        let bytes = response.copy_to(out)?;
        log::info!("Downloaded {} bytes", bytes);
        Ok(bytes)
    }

    fn search(&self, query: &str) -> Result<Vec<ScryfallCard>> {
        let mut url = format!(
            "{}/cards/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let mut cards = Vec::new();
        loop {
            let page: SearchPage = match self.get(&url) {
                Ok(response) => response.json()?,
                // An empty result set is reported as not_found
                Err(e) if cards.is_empty() && is_not_found(&e) => return Ok(cards),
                Err(e) => return Err(e),
            };
            cards.extend(page.data);

            match (page.has_more, page.next_page) {
                (true, Some(next)) => url = next,
                (true, None) => {
                    log::warn!("Search '{}' reports more pages without a link", query);
                    break;
                }
                (false, _) => break,
            }
        }
        log::debug!("Search '{}' returned {} cards", query, cards.len());
        Ok(cards)
    }

    fn set_metadata(&self, code: &str) -> Result<Option<SetMetadata>> {
        match self.get(&format!("{}/sets/{}", self.base_url, code)) {
            Ok(response) => Ok(Some(response.json()?)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.get(url)?.bytes()?.to_vec())
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
