//! Profile view/edit state machine.
//!
//! `Loading -> Viewing <-> Editing -> Saving -> Viewing | Editing`
//!
//! Network calls are split in a `begin_*` step that hands out what to send and
//! a `finish_*`/`complete_*` step that applies the answer, so a view can keep
//! running while a request is in flight. Fetch answers carry a sequence number
//! and only the latest one is applied.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::draft::{DraftError, ProfileDraft};
use super::form::ProfileForm;
use super::models::UserProfile;
use crate::api::{user_profile_path, ApiClient, ApiError, ApiResponse, USER_UPDATE_PATH};
use crate::session::SessionCookies;
use crate::toast::Toaster;

pub const SAVE_SUCCESS_MESSAGE: &str = "Profile updated successfully";
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to update profile";

/// Field name to validation messages, as returned by the backend.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// What to do when the profile can't be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FetchFailurePolicy {
    /// Log the error and keep showing the loading placeholder.
    #[default]
    LogOnly,
    /// Move to [`EditorState::FetchFailed`] so the view can show the error.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Loading,
    FetchFailed { message: String },
    Viewing,
    Editing,
    Saving,
}

/// Who is looking at the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Option<String>,
    pub access_token: Option<String>,
}

impl Viewer {
    pub fn from_session(cookies: &SessionCookies) -> Self {
        Self {
            user_id: cookies.user_id(),
            access_token: cookies.access_token(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Identifies one profile fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    user_id: String,
}

impl FetchTicket {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Performs the request this ticket stands for.
    pub async fn load(&self, api: &ApiClient) -> Result<UserProfile, ApiError> {
        api.get(&user_profile_path(&self.user_id)).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchResolution {
    Loaded,
    /// A newer fetch was started; this answer was dropped.
    Stale,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The backend rejected some fields.
    Rejected(FieldErrors),
    /// Anything else; a generic toast was shown.
    Failed,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Profile is not loaded yet")]
    NotLoaded,

    #[error("Only the profile owner with a valid session can edit it")]
    NotAllowed,

    #[error("Not possible while {0:?}")]
    InvalidState(EditorState),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Failed to encode profile form: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct ProfileEditor {
    user_id: String,
    viewer: Viewer,
    policy: FetchFailurePolicy,
    toaster: Toaster,
    state: EditorState,
    profile: Option<UserProfile>,
    draft: Option<ProfileDraft>,
    field_errors: FieldErrors,
    latest_seq: u64,
}

impl ProfileEditor {
    pub fn new(
        user_id: &str,
        viewer: Viewer,
        policy: FetchFailurePolicy,
        toaster: Toaster,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            viewer,
            policy,
            toaster,
            state: EditorState::Loading,
            profile: None,
            draft: None,
            field_errors: FieldErrors::new(),
            latest_seq: 0,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn set_viewer(&mut self, viewer: Viewer) {
        self.viewer = viewer;
    }

    /// Last committed profile.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    /// Draft while editing or saving, committed profile otherwise.
    pub fn displayed(&self) -> Option<&UserProfile> {
        match &self.draft {
            Some(draft) => Some(draft.profile()),
            None => self.profile.as_ref(),
        }
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// True when the viewer owns the loaded profile and holds an access token.
    pub fn can_edit(&self) -> bool {
        match (&self.profile, &self.viewer.user_id) {
            (Some(profile), Some(viewer_id)) => {
                *viewer_id == profile.id && self.viewer.access_token.is_some()
            }
            _ => false,
        }
    }

    // ========================================================================
    // Fetch
    // ========================================================================

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        FetchTicket {
            seq: self.latest_seq,
            user_id: self.user_id.clone(),
        }
    }

    /// Points the editor at another profile. Anything in flight for the
    /// previous one becomes stale. Rejected while a save is pending so its
    /// result can still be committed.
    pub fn set_profile_id(&mut self, user_id: &str) -> Result<FetchTicket, EditorError> {
        if self.state == EditorState::Saving {
            return Err(EditorError::InvalidState(EditorState::Saving));
        }
        self.user_id = user_id.to_string();
        self.profile = None;
        self.draft = None;
        self.field_errors.clear();
        self.state = EditorState::Loading;
        Ok(self.begin_fetch())
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<UserProfile, ApiError>,
    ) -> FetchResolution {
        if ticket.seq != self.latest_seq {
            debug!(
                "Dropping stale profile response #{} for {} (latest is #{})",
                ticket.seq, ticket.user_id, self.latest_seq
            );
            return FetchResolution::Stale;
        }

        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                if matches!(
                    self.state,
                    EditorState::Loading | EditorState::FetchFailed { .. }
                ) {
                    self.state = EditorState::Viewing;
                }
                FetchResolution::Loaded
            }
            Err(err) => {
                error!("Error fetching profile data for {}: {}", ticket.user_id, err);
                if let Some(body) = err.body() {
                    debug!("Profile response body: {}", body);
                }
                if self.policy == FetchFailurePolicy::Surface && self.profile.is_none() {
                    self.state = EditorState::FetchFailed {
                        message: err.to_string(),
                    };
                }
                FetchResolution::Failed
            }
        }
    }

    pub async fn fetch(&mut self, api: &ApiClient) -> FetchResolution {
        let ticket = self.begin_fetch();
        let result = ticket.load(api).await;
        self.complete_fetch(ticket, result)
    }

    // ========================================================================
    // Edit
    // ========================================================================

    pub fn begin_edit(&mut self) -> Result<(), EditorError> {
        let profile = self.profile.as_ref().ok_or(EditorError::NotLoaded)?;
        if !self.can_edit() {
            return Err(EditorError::NotAllowed);
        }
        if self.state != EditorState::Viewing {
            return Err(EditorError::InvalidState(self.state.clone()));
        }
        self.draft = Some(ProfileDraft::new(profile));
        self.state = EditorState::Editing;
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Result<&mut ProfileDraft, EditorError> {
        if self.state != EditorState::Editing {
            return Err(EditorError::InvalidState(self.state.clone()));
        }
        self.draft
            .as_mut()
            .ok_or_else(|| EditorError::InvalidState(EditorState::Editing))
    }

    /// Drops the draft and shows the committed profile again.
    pub fn cancel_edit(&mut self) -> Result<(), EditorError> {
        if self.state != EditorState::Editing {
            return Err(EditorError::InvalidState(self.state.clone()));
        }
        self.draft = None;
        self.state = EditorState::Viewing;
        Ok(())
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Moves to `Saving` and returns the form to submit. Field errors of the
    /// previous attempt are cleared.
    pub fn begin_save(&mut self) -> Result<ProfileForm, EditorError> {
        let draft = self.draft_mut()?;
        let form = ProfileForm::from_profile(draft.profile())?;
        self.field_errors.clear();
        self.state = EditorState::Saving;
        Ok(form)
    }

    /// Applies the answer to the form returned by [`Self::begin_save`].
    pub fn finish_save(
        &mut self,
        result: Result<ApiResponse, ApiError>,
    ) -> Result<SaveOutcome, EditorError> {
        if self.state != EditorState::Saving {
            return Err(EditorError::InvalidState(self.state.clone()));
        }

        let failure_body = match result {
            Ok(response) if response.is_ok() => match response.json::<UserProfile>() {
                Ok(profile) => {
                    info!("Profile {} updated", profile.id);
                    self.profile = Some(profile);
                    self.draft = None;
                    self.state = EditorState::Viewing;
                    self.toaster.success(SAVE_SUCCESS_MESSAGE);
                    return Ok(SaveOutcome::Saved);
                }
                Err(err) => {
                    error!("Failed to update profile: unreadable response: {}", err);
                    None
                }
            },
            Ok(response) => {
                warn!("Failed to update profile: status {}", response.status);
                Some(response.body)
            }
            Err(ApiError::Status { status, body }) => {
                warn!("Failed to update profile: status {}", status);
                Some(body)
            }
            Err(err) => {
                error!("Failed to update profile: {}", err);
                None
            }
        };

        self.state = EditorState::Editing;
        match failure_body.as_deref().and_then(parse_field_errors) {
            Some(errors) => {
                self.field_errors = errors.clone();
                Ok(SaveOutcome::Rejected(errors))
            }
            None => {
                self.toaster.error(SAVE_FAILURE_MESSAGE);
                Ok(SaveOutcome::Failed)
            }
        }
    }

    pub async fn save(&mut self, api: &ApiClient) -> Result<SaveOutcome, EditorError> {
        let form = self.begin_save()?;
        let result = api.put_form(USER_UPDATE_PATH, form.into_fields()).await;
        self.finish_save(result)
    }
}

/// Reads a validation error body: a non-empty JSON object whose values are a
/// message or a list of messages.
pub fn parse_field_errors(body: &str) -> Option<FieldErrors> {
    let object = match serde_json::from_str::<serde_json::Value>(body).ok()? {
        serde_json::Value::Object(object) if !object.is_empty() => object,
        _ => return None,
    };

    let errors = object
        .into_iter()
        .map(|(field, value)| {
            let messages = match value {
                serde_json::Value::String(message) => vec![message],
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(message) => message,
                        other => other.to_string(),
                    })
                    .collect(),
                other => vec![other.to_string()],
            };
            (field, messages)
        })
        .collect();
    Some(errors)
}
