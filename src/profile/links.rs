//! Ordered contact links of a profile.
//!
//! On the wire the links are a JSON object `{platform: url}`. Here they are an
//! ordered list with unique platform labels, so renaming a platform keeps the
//! entry in place and a collision is reported instead of dropping an entry.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::models::PLATFORM_CHOICES;

/// Prefix of the placeholder label given to a freshly added link.
pub const NEW_LINK_PREFIX: &str = "new-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("No contact link for platform '{0}'")]
    UnknownLink(String),

    #[error("A contact link for platform '{0}' already exists")]
    DuplicatePlatform(String),

    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks(Vec<SocialLink>);

impl SocialLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SocialLink> {
        self.0.iter()
    }

    pub fn platforms(&self) -> Vec<&str> {
        self.0.iter().map(|l| l.platform.as_str()).collect()
    }

    pub fn get(&self, platform: &str) -> Option<&str> {
        self.position(platform).map(|i| self.0[i].url.as_str())
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.position(platform).is_some()
    }

    fn position(&self, platform: &str) -> Option<usize> {
        self.0.iter().position(|l| l.platform == platform)
    }

    /// Sets the URL of `platform`, appending a new entry when it's missing.
    pub fn insert(&mut self, platform: &str, url: &str) {
        match self.position(platform) {
            Some(i) => self.0[i].url = url.to_string(),
            None => self.0.push(SocialLink {
                platform: platform.to_string(),
                url: url.to_string(),
            }),
        }
    }

    /// Appends an empty link under a placeholder label `new-<millis>` and
    /// returns the label. `now_millis` is bumped until the label is free.
    pub fn add_placeholder(&mut self, now_millis: i64) -> String {
        let mut stamp = now_millis;
        let mut label = format!("{}{}", NEW_LINK_PREFIX, stamp);
        while self.contains(&label) {
            stamp += 1;
            label = format!("{}{}", NEW_LINK_PREFIX, stamp);
        }
        self.0.push(SocialLink {
            platform: label.clone(),
            url: String::new(),
        });
        label
    }

    /// Changes the label of `from` to `to`, keeping URL and position. `to`
    /// must be one of [`PLATFORM_CHOICES`].
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), LinkError> {
        let index = self
            .position(from)
            .ok_or_else(|| LinkError::UnknownLink(from.to_string()))?;
        if from == to {
            return Ok(());
        }
        if !PLATFORM_CHOICES.iter().any(|p| *p == to) {
            return Err(LinkError::UnknownPlatform(to.to_string()));
        }
        if self.contains(to) {
            return Err(LinkError::DuplicatePlatform(to.to_string()));
        }
        self.0[index].platform = to.to_string();
        Ok(())
    }

    pub fn set_url(&mut self, platform: &str, url: &str) -> Result<(), LinkError> {
        let index = self
            .position(platform)
            .ok_or_else(|| LinkError::UnknownLink(platform.to_string()))?;
        self.0[index].url = url.to_string();
        Ok(())
    }

    pub fn remove(&mut self, platform: &str) -> Option<SocialLink> {
        let index = self.position(platform)?;
        Some(self.0.remove(index))
    }

    /// The JSON object string sent in the profile update form.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for SocialLinks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for link in &self.0 {
            map.serialize_entry(&link.platform, &link.url)?;
        }
        map.end()
    }
}

struct SocialLinksVisitor;

impl<'de> Visitor<'de> for SocialLinksVisitor {
    type Value = SocialLinks;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of platform to url, or null")
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(SocialLinks::default())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(SocialLinks::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut links = SocialLinks::default();
        while let Some((platform, url)) = access.next_entry::<String, Option<String>>()? {
            links.insert(&platform, &url.unwrap_or_default());
        }
        Ok(links)
    }
}

impl<'de> Deserialize<'de> for SocialLinks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SocialLinksVisitor)
    }
}
