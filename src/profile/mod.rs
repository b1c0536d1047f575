//! User profile: data model, editable draft, update form and the view/edit
//! state machine.

mod draft;
mod editor;
mod form;
mod links;
mod models;

pub use draft::{DraftError, ProfileDraft, ProfileField};
pub use editor::{
    parse_field_errors, EditorError, EditorState, FetchFailurePolicy, FetchResolution,
    FetchTicket, FieldErrors, ProfileEditor, SaveOutcome, Viewer, SAVE_FAILURE_MESSAGE,
    SAVE_SUCCESS_MESSAGE,
};
pub use form::ProfileForm;
pub use links::{LinkError, SocialLink, SocialLinks, NEW_LINK_PREFIX};
pub use models::{Choice, Language, SocialIcon, TravelStatus, UserProfile, PLATFORM_CHOICES};
