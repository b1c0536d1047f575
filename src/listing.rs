//! Trip listings and their summary card.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Descriptions longer than this many characters are cut on the card.
pub const DESCRIPTION_PREVIEW_LEN: usize = 87;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub description: String,
    pub min_budget: f64,
    pub url: String,
    pub month: String,
    pub created_by: String,
    #[serde(default)]
    pub created_by_username: String,
}

/// The "posted by" badge shown under a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedBy {
    /// Avatar fallback: first character of the author name.
    pub initial: String,
    pub label: String,
    pub username: String,
}

/// Read-only card view of a [`Listing`].
pub struct ListingCard<'a> {
    listing: &'a Listing,
    show_user: bool,
}

impl<'a> ListingCard<'a> {
    pub fn new(listing: &'a Listing, show_user: bool) -> Self {
        Self { listing, show_user }
    }

    pub fn truncated_description(&self) -> String {
        truncate_description(&self.listing.description)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.listing.images.first().map(String::as_str)
    }

    pub fn posted_by(&self) -> Option<PostedBy> {
        if !self.show_user {
            return None;
        }
        let name = &self.listing.created_by;
        Some(PostedBy {
            initial: name.graphemes(true).next().unwrap_or_default().to_string(),
            label: format!("by {}", name),
            username: self.listing.created_by_username.clone(),
        })
    }

    /// Plain-text rendering of the card.
    pub fn render(&self) -> String {
        let listing = self.listing;
        let mut lines = vec![
            format!(
                "{}, {}  [{}]",
                listing.location.city, listing.location.country, listing.month
            ),
            listing.title.clone(),
            self.truncated_description(),
            format!("From {} · View: {}", listing.min_budget, listing.url),
        ];
        if let Some(image) = self.cover_image() {
            lines.insert(0, format!("[cover: {}]", image));
        }
        if let Some(posted_by) = self.posted_by() {
            let mut badge = format!("({}) {}", posted_by.initial, posted_by.label);
            if !posted_by.username.is_empty() {
                badge.push_str(&format!(" @{}", posted_by.username));
            }
            lines.push(badge);
        }
        lines.join("\n")
    }
}

/// Keeps the first [`DESCRIPTION_PREVIEW_LEN`] characters and appends `...`
/// when the text is longer.
pub fn truncate_description(description: &str) -> String {
    let mut graphemes = description.grapheme_indices(true);
    match graphemes.nth(DESCRIPTION_PREVIEW_LEN) {
        Some((cut, _)) => format!("{}{}", &description[..cut], ELLIPSIS),
        None => description.to_string(),
    }
}
