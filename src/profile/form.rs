use super::models::{Choice, UserProfile};

/// Multipart fields of `PUT /api/user/data/update/`, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    fields: Vec<(&'static str, String)>,
}

impl ProfileForm {
    /// Serializes a draft. Contact links travel as one JSON object string.
    pub fn from_profile(profile: &UserProfile) -> Result<Self, serde_json::Error> {
        let fields = vec![
            ("name", profile.name.clone()),
            ("language", label_or_empty(profile.language)),
            ("travel_status", label_or_empty(profile.travel_status)),
            ("about", profile.about.clone()),
            ("coliver_preferences", profile.coliver_preferences.clone()),
            (
                "social_media_links",
                profile.social_media_links.to_json_string()?,
            ),
            ("username", profile.username.clone()),
        ];
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(key, _)| *key).collect()
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

fn label_or_empty<C: Choice>(choice: Option<C>) -> String {
    choice.map(|c| c.label().to_string()).unwrap_or_default()
}
