//! Search pipeline state
//!
//! [`SearchSession`] owns everything the search view shows: query text, page
//! cursor, accumulated results, loading flag and error line. It never touches
//! the network itself. The caller drives it:
//!
//! 1. UI events go in through [`SearchSession::set_query`],
//!    [`SearchSession::resubmit`] and [`SearchSession::on_scroll`].
//! 2. Every frame [`SearchSession::poll`] is asked whether the debounce has
//!    elapsed; if so it returns a [`FetchRequest`] to run in the background.
//! 3. When the request finishes, [`SearchSession::complete`] applies it, unless
//!    a newer request or a reset has superseded it in the meantime.

use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::photo::{ResultList, SearchPage};
use crate::scroll::ScrollMetrics;
use std::time::{Duration, Instant};

/// A search the session wants executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Token identifying this request; only the latest one may be applied
    pub generation: u64,
    pub query: String,
    /// 1-based page number
    pub page: u32,
}

/// What [`SearchSession::complete`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Results merged; `added` is the number of new unique photos
    Applied { added: usize },
    /// Requested page lies past `total_pages`; nothing changed
    OutOfRange,
    /// The request failed; the error line was updated
    Failed,
    /// A newer request or a query change superseded this one; ignored
    Stale,
}

/// Query, page and result state of the search view
#[derive(Debug)]
pub struct SearchSession {
    query: String,
    page: u32,
    results: ResultList,
    loading: bool,
    error: String,
    total_pages: Option<u32>,
    debounce: Debouncer<(String, u32)>,
    /// Last generation handed out by `poll`
    generation: u64,
    /// Generation whose response is still allowed to land
    in_flight: Option<u64>,
    bottom_slack: f32,
    /// Tile URLs of results dropped since the last `take_discarded_tiles`
    discarded: Vec<String>,
}

impl SearchSession {
    pub fn new(debounce: Duration, bottom_slack: f32) -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: ResultList::new(),
            loading: false,
            error: String::new(),
            total_pages: None,
            debounce: Debouncer::new(debounce),
            generation: 0,
            in_flight: None,
            bottom_slack,
            discarded: Vec::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.debounce(), config.bottom_slack)
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Text input changed. Resets page and results; returns false if the text is unchanged.
    pub fn set_query(&mut self, text: &str, now: Instant) -> bool {
        if text == self.query {
            return false;
        }
        log::debug!("query {:?} -> {:?}", self.query, text);
        self.query = text.to_string();
        self.restart(now);
        true
    }

    /// Search icon: run the current query again from page 1
    pub fn resubmit(&mut self, now: Instant) {
        log::debug!("resubmit {:?}", self.query);
        self.restart(now);
    }

    /// Advance to the next page and schedule its fetch
    pub fn next_page(&mut self, now: Instant) {
        self.page += 1;
        log::debug!("page -> {}", self.page);
        self.schedule(now);
    }

    /// Scroll event from the grid. Advances the page when the viewport reached
    /// the bottom and another page can be loaded; returns true if it did.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, now: Instant) -> bool {
        if !metrics.near_bottom(self.bottom_slack) || !self.can_advance() {
            return false;
        }
        self.next_page(now);
        true
    }

    /// Whether a bottom-of-grid scroll may load another page right now
    pub fn can_advance(&self) -> bool {
        !self.query.is_empty()
            && !self.debounce.is_pending()
            && !self.loading
            && self.total_pages.map_or(true, |total| self.page < total)
    }

    fn restart(&mut self, now: Instant) {
        self.page = 1;
        self.drop_results();
        self.total_pages = None;
        // responses for the old query must not land
        self.in_flight = None;
        self.loading = false;
        self.schedule(now);
    }

    fn drop_results(&mut self) {
        self.discarded
            .extend(self.results.iter().map(|photo| photo.tile_url().to_string()));
        self.results.clear();
    }

    fn schedule(&mut self, now: Instant) {
        self.debounce.schedule((self.query.clone(), self.page), now);
    }

    // ========================================================================
    // Fetch lifecycle
    // ========================================================================

    /// Fire the debounced fetch if its quiet period has elapsed.
    ///
    /// An empty query clears the results and issues nothing.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let (query, page) = self.debounce.poll(now)?;
        debug_assert_eq!((query.as_str(), page), (self.query.as_str(), self.page));

        if query.is_empty() {
            self.drop_results();
            self.loading = false;
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.loading = true;
        self.error.clear();

        log::info!("issuing fetch #{} query={:?} page={}", self.generation, query, page);
        Some(FetchRequest {
            generation: self.generation,
            query,
            page,
        })
    }

    /// Apply the result of a request previously returned by `poll`
    pub fn complete(&mut self, request: &FetchRequest, result: Result<SearchPage>) -> FetchOutcome {
        if self.in_flight != Some(request.generation) {
            log::warn!(
                "discarding stale response #{} (query={:?} page={})",
                request.generation,
                request.query,
                request.page
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(page) => {
                self.total_pages = Some(page.total_pages);
                if request.page > page.total_pages {
                    log::debug!(
                        "page {} is past the last page ({}), ignoring",
                        request.page,
                        page.total_pages
                    );
                    return FetchOutcome::OutOfRange;
                }
                let added = self.results.merge(page.results);
                log::info!(
                    "page {}/{} applied: {} new, {} total",
                    request.page,
                    page.total_pages,
                    added,
                    self.results.len()
                );
                FetchOutcome::Applied { added }
            }
            Err(e) => {
                log::warn!("fetch #{} failed: {}", request.generation, e);
                self.error = e.to_string();
                FetchOutcome::Failed
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn results(&self) -> &ResultList {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last failure message, empty when none
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Image URLs no longer shown, so their cached textures can be released
    pub fn take_discarded_tiles(&mut self) -> Vec<String> {
        std::mem::take(&mut self.discarded)
    }

    /// A fetch is waiting for its quiet period
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// When the pending fetch will fire, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }
}
