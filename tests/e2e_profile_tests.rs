//! End-to-end tests for the profile view and editor
//!
//! Tests fetching, ownership checks, the edit/save cycle and stale responses.

mod common;

use common::{
    other_profile, owner_profile, owner_shell, test_shell, test_shell_with_policy, TestServer,
    OTHER_USER_ID, OWNER_ID, TEST_ACCESS_TOKEN, UNKNOWN_USER_ID,
};
use reqwest::StatusCode;
use share_trips_client::profile::{
    EditorError, EditorState, FetchResolution, ProfileField, SaveOutcome, TravelStatus,
    SAVE_FAILURE_MESSAGE, SAVE_SUCCESS_MESSAGE,
};
use share_trips_client::{FetchFailurePolicy, ToastKind};
use std::time::Duration;

#[tokio::test]
async fn test_fetch_own_profile() {
    let server = TestServer::spawn().await;
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OWNER_ID);
    assert_eq!(editor.fetch(shell.api()).await, FetchResolution::Loaded);

    assert_eq!(editor.state(), &EditorState::Viewing);
    assert_eq!(editor.profile(), Some(&owner_profile()));
    assert!(editor.can_edit());

    // Fetches carry the access token too
    let headers = server.with_state(|s| s.authorization_headers.clone());
    assert_eq!(
        headers.last().cloned().flatten(),
        Some(format!("Bearer {}", TEST_ACCESS_TOKEN))
    );
}

#[tokio::test]
async fn test_other_profile_is_read_only() {
    let server = TestServer::spawn().await;
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OTHER_USER_ID);
    editor.fetch(shell.api()).await;

    assert_eq!(editor.profile(), Some(&other_profile()));
    assert!(!editor.can_edit());
    assert!(matches!(editor.begin_edit(), Err(EditorError::NotAllowed)));
    assert_eq!(editor.state(), &EditorState::Viewing);
}

#[tokio::test]
async fn test_anonymous_viewer_is_sent_to_login() {
    let server = TestServer::spawn().await;
    let shell = test_shell(&server.base_url);

    let mut editor = shell.profile_editor(OWNER_ID);
    editor.fetch(shell.api()).await;
    assert_eq!(editor.state(), &EditorState::Viewing);
    assert!(!editor.can_edit());

    let redirect = format!("/profile/{}", OWNER_ID);
    assert!(shell.require_login(&redirect).unwrap());
    let popup = shell.popup().state().unwrap();
    assert!(popup.is_login_form_open);
    assert_eq!(popup.redirect_url, redirect);

    // Logging in makes the same view editable
    shell
        .session()
        .login(OWNER_ID, TEST_ACCESS_TOKEN, "refresh", false)
        .await
        .unwrap();
    editor.set_viewer(shell.viewer());
    assert!(editor.can_edit());
}

#[tokio::test]
async fn test_unknown_profile_keeps_loading() {
    let server = TestServer::spawn().await;
    let shell = test_shell(&server.base_url);

    let mut editor = shell.profile_editor(UNKNOWN_USER_ID);
    assert_eq!(editor.fetch(shell.api()).await, FetchResolution::Failed);

    assert_eq!(editor.state(), &EditorState::Loading);
    assert!(editor.profile().is_none());
    assert_eq!(shell.toaster().pending(), 0);
}

#[tokio::test]
async fn test_unknown_profile_surfaced() {
    let server = TestServer::spawn().await;
    let shell = test_shell_with_policy(&server.base_url, FetchFailurePolicy::Surface);

    let mut editor = shell.profile_editor(UNKNOWN_USER_ID);
    editor.fetch(shell.api()).await;

    match editor.state() {
        EditorState::FetchFailed { message } => assert!(message.contains("404")),
        state => panic!("Unexpected state {:?}", state),
    }
}

#[tokio::test]
async fn test_edit_and_save() {
    let server = TestServer::spawn().await;
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OWNER_ID);
    editor.fetch(shell.api()).await;
    editor.begin_edit().unwrap();

    let draft = editor.draft_mut().unwrap();
    draft.set_field(ProfileField::Name, "Dima").unwrap();
    draft
        .set_field(ProfileField::TravelStatus, "Will be ready soon")
        .unwrap();
    draft.set_field(ProfileField::Language, "").unwrap();

    let outcome = editor.save(shell.api()).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(editor.state(), &EditorState::Viewing);

    let saved = editor.profile().unwrap().clone();
    assert_eq!(saved.name, "Dima");
    assert_eq!(saved.travel_status, Some(TravelStatus::WillBeReadySoon));
    assert_eq!(saved.language, None);
    assert_eq!(Some(saved), server.profile(OWNER_ID));

    let fields = server.with_state(|s| s.update_fields.clone());
    let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "name",
            "language",
            "travel_status",
            "about",
            "coliver_preferences",
            "social_media_links",
            "username"
        ]
    );
    assert!(fields.contains(&("language".to_string(), String::new())));

    let toasts = shell.toaster().drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Success);
    assert_eq!(toasts[0].message, SAVE_SUCCESS_MESSAGE);
}

#[tokio::test]
async fn test_edit_links_and_save() {
    let server = TestServer::spawn().await;
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OWNER_ID);
    editor.fetch(shell.api()).await;
    editor.begin_edit().unwrap();

    let draft = editor.draft_mut().unwrap();
    let label = draft.add_link();
    draft.rename_link(&label, "Instagram").unwrap();
    draft
        .set_link_url("Instagram", "https://instagram.com/dkorzhov")
        .unwrap();
    draft.rename_link("LinkedIn", "Other").unwrap();
    draft.remove_link("Github").unwrap();

    assert_eq!(editor.save(shell.api()).await.unwrap(), SaveOutcome::Saved);

    let fields = server.with_state(|s| s.update_fields.clone());
    let links = fields
        .iter()
        .find(|(name, _)| name == "social_media_links")
        .map(|(_, value)| value.clone())
        .unwrap();
    assert_eq!(
        links,
        r#"{"Other":"https://www.linkedin.com/in/dkorzhov","Instagram":"https://instagram.com/dkorzhov"}"#
    );

    let saved = editor.profile().unwrap();
    assert_eq!(saved.social_media_links.platforms(), vec!["Other", "Instagram"]);
}

#[tokio::test]
async fn test_validation_errors_keep_editing() {
    let server = TestServer::spawn().await;
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OWNER_ID);
    editor.fetch(shell.api()).await;
    editor.begin_edit().unwrap();
    editor
        .draft_mut()
        .unwrap()
        .set_field(ProfileField::Username, "")
        .unwrap();

    let outcome = editor.save(shell.api()).await.unwrap();

    match outcome {
        SaveOutcome::Rejected(errors) => {
            assert_eq!(
                errors.get("username"),
                Some(&vec!["This field may not be blank.".to_string()])
            );
        }
        other => panic!("Unexpected outcome {:?}", other),
    }
    assert_eq!(editor.state(), &EditorState::Editing);
    assert_eq!(editor.field_errors().len(), 1);
    assert_eq!(editor.displayed().unwrap().username, "");
    assert_eq!(editor.profile(), Some(&owner_profile()));
    assert_eq!(shell.toaster().pending(), 0);

    // Fixing the field and saving again succeeds and clears the errors
    editor
        .draft_mut()
        .unwrap()
        .set_field(ProfileField::Username, "dima")
        .unwrap();
    assert_eq!(editor.save(shell.api()).await.unwrap(), SaveOutcome::Saved);
    assert!(editor.field_errors().is_empty());
    assert_eq!(editor.profile().unwrap().username, "dima");
}

#[tokio::test]
async fn test_server_error_shows_one_toast() {
    let server = TestServer::spawn().await;
    server.with_state(|s| {
        s.update_override = Some((
            StatusCode::INTERNAL_SERVER_ERROR,
            "<h1>Server Error (500)</h1>".to_string(),
        ))
    });
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OWNER_ID);
    editor.fetch(shell.api()).await;
    editor.begin_edit().unwrap();

    assert_eq!(editor.save(shell.api()).await.unwrap(), SaveOutcome::Failed);
    assert_eq!(editor.state(), &EditorState::Editing);
    assert!(editor.field_errors().is_empty());

    let toasts = shell.toaster().drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, SAVE_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_cancel_sends_nothing() {
    let server = TestServer::spawn().await;
    let shell = owner_shell(&server.base_url).await;

    let mut editor = shell.profile_editor(OWNER_ID);
    editor.fetch(shell.api()).await;
    editor.begin_edit().unwrap();
    editor.draft_mut().unwrap().set_name("Someone else");
    editor.cancel_edit().unwrap();

    assert_eq!(editor.displayed(), Some(&owner_profile()));
    assert_eq!(server.with_state(|s| s.update_count), 0);
}

#[tokio::test]
async fn test_stale_fetch_is_dropped() {
    let server = TestServer::spawn().await;
    server.with_state(|s| {
        s.profile_delays
            .insert(OWNER_ID.to_string(), Duration::from_millis(200))
    });
    let shell = test_shell(&server.base_url);

    let mut editor = shell.profile_editor(OWNER_ID);
    let slow = editor.begin_fetch();
    let fast = editor.set_profile_id(OTHER_USER_ID).unwrap();

    let (slow_result, fast_result) =
        tokio::join!(slow.load(shell.api()), fast.load(shell.api()));

    assert_eq!(
        editor.complete_fetch(fast, fast_result),
        FetchResolution::Loaded
    );
    assert_eq!(
        editor.complete_fetch(slow, slow_result),
        FetchResolution::Stale
    );
    assert_eq!(editor.profile(), Some(&other_profile()));
    assert_eq!(editor.user_id(), OTHER_USER_ID);
}
