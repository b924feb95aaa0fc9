//! SnapGrid - desktop photo search
//!
//! Type a query, get an infinite-scrolling grid of photos from the Unsplash
//! search API.
//!
//! # Features
//!
//! - **Debounced search**: a request goes out only after typing pauses
//! - **Infinite scroll**: the next page loads when the grid reaches the bottom
//! - **Stale-response guard**: late answers for an old query or page are dropped
//! - **Identity dedup**: a photo id appears at most once across all pages
//! - **Back to top**: a floating button smooth-scrolls to the top of the grid
//!
//! # Example
//!
//! ```no_run
//! use snapgrid::{AppConfig, ConfigOverrides, PhotoSource, ResultList, UnsplashClient};
//!
//! fn main() -> snapgrid::Result<()> {
//!     let config = AppConfig::load(None, ConfigOverrides::default())?;
//!     let client = UnsplashClient::new(&config)?;
//!
//!     let mut photos = ResultList::new();
//!     for page in 1..=2 {
//!         let response = client.search("lighthouse", page)?;
//!         photos.merge(response.results);
//!     }
//!
//!     for photo in &photos {
//!         println!("{}: {}", photo.id, photo.urls.raw);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod gui;
pub mod logging;
pub mod photo;
pub mod scroll;
pub mod search;

// Re-export main types
pub use api::{PhotoSource, UnsplashClient};
pub use config::{AppConfig, ConfigOverrides};
pub use error::{Result, SnapgridError};
pub use fetcher::{FetchResponse, FetchWorker};
pub use photo::{Photo, PhotoUrls, ResultList, SearchPage};
pub use scroll::{ScrollFeed, ScrollMetrics, ScrollTopControl};
pub use search::{FetchOutcome, FetchRequest, SearchSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format a byte count as a human-readable string
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_binary_units() {
        let formatted = format_size(1536);
        assert!(formatted.starts_with("1.5"));
        assert!(formatted.ends_with("KiB"));
    }
}
