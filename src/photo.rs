//! Photo records and the accumulated result list
//!
//! The remote API returns pages shaped like
//! `{ "results": [{ "id", "urls": { "raw", ... } }], "total_pages": n }`.
//! Only `id` and `urls.raw` are required; everything else is optional so that
//! sparse or trimmed payloads still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Wire types
// ============================================================================

/// Image URLs for one photo, from largest to smallest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrls {
    /// Original upload
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// Photographer credit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Web links for a photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Stable identity of the photo
    pub id: String,
    pub urls: PhotoUrls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PhotoLinks>,
}

impl Photo {
    /// Minimal record with only the required fields
    pub fn new(id: impl Into<String>, raw_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            urls: PhotoUrls {
                raw: raw_url.into(),
                regular: None,
                small: None,
                thumb: None,
            },
            description: None,
            alt_description: None,
            width: None,
            height: None,
            created_at: None,
            user: None,
            links: None,
        }
    }

    /// URL used for grid tiles: the smallest rendition that still looks sharp,
    /// falling back to the raw upload
    pub fn tile_url(&self) -> &str {
        self.urls
            .small
            .as_deref()
            .or(self.urls.regular.as_deref())
            .unwrap_or(&self.urls.raw)
    }

    /// Human-readable caption (description, alt text, or the raw URL)
    pub fn caption(&self) -> &str {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.urls.raw)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }

    /// Suggested file name when saving the image to disk
    pub fn file_name(&self) -> String {
        let safe: String = self
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}.jpg", safe)
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<Photo>,
    pub total_pages: u32,
    /// Total hit count, when the API reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl SearchPage {
    /// Parse a raw response body
    pub fn from_json(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

// ============================================================================
// Accumulated results
// ============================================================================

/// Insertion-ordered list of photos, unique by `id`
///
/// Identity is the photo id, never whole-value equality: a second record with
/// a known id is dropped even if its nested fields differ.
#[derive(Debug, Default, Clone)]
pub struct ResultList {
    items: Vec<Photo>,
    seen: HashSet<String>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every photo whose id is not yet present; returns how many were added
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = Photo>,
    {
        let before = self.items.len();
        for photo in incoming {
            if self.seen.insert(photo.id.clone()) {
                self.items.push(photo);
            }
        }
        self.items.len() - before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Photo> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Photo] {
        &self.items
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|p| p.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ResultList {
    type Item = &'a Photo;
    type IntoIter = std::slice::Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
