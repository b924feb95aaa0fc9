//! Error types for SnapGrid
//!
//! Every failure the fetch pipeline, configuration loader and GUI actions can
//! produce funnels into [`SnapgridError`].

use thiserror::Error;

/// Main error type for SnapGrid operations
#[derive(Error, Debug)]
pub enum SnapgridError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No API access key configured (set UNSPLASH_ACCESS_KEY or pass --access-key)")]
    MissingAccessKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("GUI error: {0}")]
    Gui(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result type alias for SnapGrid operations
pub type Result<T> = std::result::Result<T, SnapgridError>;

/// Longest response body excerpt kept in an [`SnapgridError::Http`] message
const MAX_BODY_EXCERPT: usize = 200;

impl SnapgridError {
    /// Build an HTTP status error, trimming the body to a short single-line excerpt
    pub fn from_status(status: u16, body: &str) -> Self {
        let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
        let body = if flat.chars().count() > MAX_BODY_EXCERPT {
            let cut: String = flat.chars().take(MAX_BODY_EXCERPT).collect();
            format!("{}...", cut)
        } else {
            flat
        };
        SnapgridError::Http { status, body }
    }

    /// Errors raised by the remote search call (as opposed to local setup errors)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SnapgridError::Http { .. } | SnapgridError::Network(_) | SnapgridError::Parse(_)
        )
    }
}
