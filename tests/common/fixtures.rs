//! Profiles the mock backend starts with

use super::constants::*;
use share_trips_client::profile::{Language, SocialLinks, TravelStatus, UserProfile};

pub fn owner_profile() -> UserProfile {
    let mut links = SocialLinks::new();
    links.insert("Github", "https://github.com/dkorzhov");
    links.insert("LinkedIn", "https://www.linkedin.com/in/dkorzhov");
    UserProfile {
        id: OWNER_ID.to_string(),
        name: "Dmitry".to_string(),
        email: "dmitry@example.com".to_string(),
        photo: "https://cdn.example.com/avatars/dmitry.png".to_string(),
        about: "Remote developer, slow traveller".to_string(),
        coliver_preferences: "Quiet, early risers".to_string(),
        language: Some(Language::English),
        social_media_links: links,
        travel_status: Some(TravelStatus::ReadyToTravel),
        username: "dkorzhov".to_string(),
    }
}

pub fn other_profile() -> UserProfile {
    UserProfile {
        id: OTHER_USER_ID.to_string(),
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        photo: String::new(),
        about: "Surfing in Portugal".to_string(),
        coliver_preferences: String::new(),
        language: Some(Language::Spanish),
        social_media_links: SocialLinks::new(),
        travel_status: None,
        username: "ana".to_string(),
    }
}
