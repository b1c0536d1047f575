//! User profile data models

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::links::SocialLinks;

/// A closed set of values the backend stores as display labels.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Italian,
    Japanese,
    Chinese,
    Russian,
    Korean,
}

impl Choice for Language {
    const ALL: &'static [Self] = &[
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Japanese,
        Language::Chinese,
        Language::Russian,
        Language::Korean,
    ];

    fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
            Language::Russian => "Russian",
            Language::Korean => "Korean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TravelStatus {
    #[serde(rename = "Ready to travel")]
    ReadyToTravel,
    #[serde(rename = "Not ready to travel")]
    NotReadyToTravel,
    #[serde(rename = "Will be ready soon")]
    WillBeReadySoon,
}

impl Choice for TravelStatus {
    const ALL: &'static [Self] = &[
        TravelStatus::ReadyToTravel,
        TravelStatus::NotReadyToTravel,
        TravelStatus::WillBeReadySoon,
    ];

    fn label(&self) -> &'static str {
        match self {
            TravelStatus::ReadyToTravel => "Ready to travel",
            TravelStatus::NotReadyToTravel => "Not ready to travel",
            TravelStatus::WillBeReadySoon => "Will be ready soon",
        }
    }
}

/// Platform labels offered for contact links.
pub const PLATFORM_CHOICES: &[&str] = &[
    "Github",
    "LinkedIn",
    "Facebook",
    "Twitter",
    "Instagram",
    "Google",
    "Other",
];

/// Icon shown next to a contact link, picked from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialIcon {
    X,
    LinkedIn,
    GitHub,
    Instagram,
    Mail,
    Generic,
}

impl SocialIcon {
    pub fn for_url(url: &str) -> Self {
        if url.contains("x.com") || url.contains("twitter.com") {
            SocialIcon::X
        } else if url.contains("linkedin.com") {
            SocialIcon::LinkedIn
        } else if url.contains("github.com") {
            SocialIcon::GitHub
        } else if url.contains("instagram.com") {
            SocialIcon::Instagram
        } else if url.contains("@gmail.com") {
            SocialIcon::Mail
        } else {
            SocialIcon::Generic
        }
    }
}

/// A user profile as served by `GET /api/user/data/get/{id}/`.
///
/// Nullable backend columns come back as empty strings / `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub about: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coliver_preferences: String,
    #[serde(default, deserialize_with = "choice_or_none")]
    pub language: Option<Language>,
    #[serde(default)]
    pub social_media_links: SocialLinks,
    #[serde(default, deserialize_with = "choice_or_none")]
    pub travel_status: Option<TravelStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unknown or blank labels read as `None`.
fn choice_or_none<'de, D, C>(deserializer: D) -> Result<Option<C>, D::Error>
where
    D: Deserializer<'de>,
    C: Choice,
{
    let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if label.is_empty() {
        return Ok(None);
    }
    let choice = C::from_label(&label);
    if choice.is_none() {
        debug!("Ignoring unknown choice label {:?}", label);
    }
    Ok(choice)
}
