use chrono::Utc;
use thiserror::Error;

use super::links::{LinkError, SocialLinks};
use super::models::{Choice, Language, TravelStatus, UserProfile};

/// Profile fields editable through the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileField {
    Name,
    About,
    ColiverPreferences,
    Username,
    Language,
    TravelStatus,
}

impl ProfileField {
    /// Form field name.
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::About => "about",
            ProfileField::ColiverPreferences => "coliver_preferences",
            ProfileField::Username => "username",
            ProfileField::Language => "language",
            ProfileField::TravelStatus => "travel_status",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("'{value}' is not a valid {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Editable copy of a [`UserProfile`].
///
/// Edits never touch the committed profile; the draft is either dropped or
/// replaced by what the backend returns after a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    profile: UserProfile,
}

impl ProfileDraft {
    pub fn new(profile: &UserProfile) -> Self {
        Self {
            profile: profile.clone(),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn set_name(&mut self, name: &str) {
        self.profile.name = name.to_string();
    }

    pub fn set_about(&mut self, about: &str) {
        self.profile.about = about.to_string();
    }

    pub fn set_coliver_preferences(&mut self, preferences: &str) {
        self.profile.coliver_preferences = preferences.to_string();
    }

    pub fn set_username(&mut self, username: &str) {
        self.profile.username = username.to_string();
    }

    pub fn set_language(&mut self, language: Option<Language>) {
        self.profile.language = language;
    }

    pub fn set_travel_status(&mut self, status: Option<TravelStatus>) {
        self.profile.travel_status = status;
    }

    /// Text-input style edit. Select fields take their display label; an
    /// empty value clears them.
    pub fn set_field(&mut self, field: ProfileField, value: &str) -> Result<(), DraftError> {
        match field {
            ProfileField::Name => self.set_name(value),
            ProfileField::About => self.set_about(value),
            ProfileField::ColiverPreferences => self.set_coliver_preferences(value),
            ProfileField::Username => self.set_username(value),
            ProfileField::Language => {
                let language = parse_choice::<Language>(field, value)?;
                self.set_language(language);
            }
            ProfileField::TravelStatus => {
                let status = parse_choice::<TravelStatus>(field, value)?;
                self.set_travel_status(status);
            }
        }
        Ok(())
    }

    pub fn links(&self) -> &SocialLinks {
        &self.profile.social_media_links
    }

    /// Appends an empty link and returns its placeholder label.
    pub fn add_link(&mut self) -> String {
        self.profile
            .social_media_links
            .add_placeholder(Utc::now().timestamp_millis())
    }

    pub fn rename_link(&mut self, from: &str, to: &str) -> Result<(), DraftError> {
        Ok(self.profile.social_media_links.rename(from, to)?)
    }

    pub fn set_link_url(&mut self, platform: &str, url: &str) -> Result<(), DraftError> {
        Ok(self.profile.social_media_links.set_url(platform, url)?)
    }

    pub fn remove_link(&mut self, platform: &str) -> Result<(), DraftError> {
        self.profile
            .social_media_links
            .remove(platform)
            .map(|_| ())
            .ok_or_else(|| LinkError::UnknownLink(platform.to_string()).into())
    }
}

fn parse_choice<C: Choice>(field: ProfileField, value: &str) -> Result<Option<C>, DraftError> {
    if value.is_empty() {
        return Ok(None);
    }
    C::from_label(value)
        .map(Some)
        .ok_or_else(|| DraftError::InvalidChoice {
            field: field.key(),
            value: value.to_string(),
        })
}
