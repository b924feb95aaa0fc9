//! Remote photo-search client
//!
//! [`PhotoSource`] is the seam between the search pipeline and the network.
//! [`UnsplashClient`] is the real implementation; tests substitute their own.

use crate::config::AppConfig;
use crate::error::{Result, SnapgridError};
use crate::photo::SearchPage;
use reqwest::blocking::Client;
use std::time::Duration;

/// Anything that can answer "page N of results for this query"
///
/// Calls block; the GUI runs them on worker threads.
pub trait PhotoSource: Send + Sync {
    fn search(&self, query: &str, page: u32) -> Result<SearchPage>;
}

/// Blocking HTTP client for the Unsplash `search/photos` endpoint
pub struct UnsplashClient {
    client: Client,
    base_url: String,
    access_key: Option<String>,
    per_page: u32,
}

impl UnsplashClient {
    /// Create a client from configuration.
    ///
    /// A missing access key is not an error here; every search reports
    /// [`SnapgridError::MissingAccessKey`] instead, so the GUI can still start.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("snapgrid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            access_key: config.access_key().map(str::to_string),
            per_page: config.per_page,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/search/photos", self.base_url)
    }

    /// Fetch raw bytes of an image (used by "Save image as...")
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SnapgridError::from_status(status.as_u16(), &body));
        }
        Ok(response.bytes()?.to_vec())
    }
}

impl PhotoSource for UnsplashClient {
    fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let key = self.access_key.as_deref().ok_or(SnapgridError::MissingAccessKey)?;

        log::info!("GET search page={} query={:?}", page, query);
        let response = self
            .client
            .get(self.search_url())
            .header("Accept-Version", "v1")
            .query(&[
                ("page", page.to_string()),
                ("query", query.to_string()),
                ("per_page", self.per_page.to_string()),
                ("client_id", key.to_string()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("search page={} failed with HTTP {}", page, status.as_u16());
            return Err(SnapgridError::from_status(status.as_u16(), &body));
        }

        let body = response.text()?;
        let parsed = SearchPage::from_json(&body)?;
        log::debug!(
            "search page={} returned {} results of {} pages",
            page,
            parsed.results.len(),
            parsed.total_pages
        );
        Ok(parsed)
    }
}
