//! Builds the client under test against a [`TestServer`](super::TestServer)

use super::constants::*;
use share_trips_client::{AppConfig, AppShell, CliConfig, FetchFailurePolicy, MemoryCookieStore};
use std::sync::Arc;

pub fn test_config(base_url: &str, policy: FetchFailurePolicy) -> AppConfig {
    let cli = CliConfig {
        api_base_url: Some(base_url.to_string()),
        request_timeout_sec: CLIENT_TIMEOUT_SEC,
        fetch_failure_policy: policy,
        ..Default::default()
    };
    AppConfig::resolve(&cli, None).expect("Failed to resolve test config")
}

/// A shell with an empty in-memory cookie jar.
pub fn test_shell(base_url: &str) -> AppShell {
    test_shell_with_policy(base_url, FetchFailurePolicy::LogOnly)
}

pub fn test_shell_with_policy(base_url: &str, policy: FetchFailurePolicy) -> AppShell {
    AppShell::with_store(
        test_config(base_url, policy),
        Arc::new(MemoryCookieStore::new()),
    )
    .expect("Failed to build test shell")
}

/// A shell logged in as the profile owner.
pub async fn owner_shell(base_url: &str) -> AppShell {
    let shell = test_shell(base_url);
    shell
        .session()
        .login(OWNER_ID, TEST_ACCESS_TOKEN, TEST_REFRESH_TOKEN, false)
        .await
        .expect("Failed to store session");
    shell
}
