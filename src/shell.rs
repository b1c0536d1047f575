//! Application root: builds the shared services once and hands out handles.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::popup::{PopupContext, PopupError, PopupProvider};
use crate::profile::{ProfileEditor, Viewer};
use crate::session::{CookieStore, FileCookieStore, MemoryCookieStore, SessionCookies, SessionService};
use crate::toast::Toaster;

pub struct AppShell {
    config: AppConfig,
    cookies: SessionCookies,
    api: ApiClient,
    session: SessionService,
    popup: PopupProvider,
    toaster: Toaster,
}

impl AppShell {
    /// Builds the shell, persisting cookies to `config.cookie_file` when set.
    pub fn new(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn CookieStore> = match &config.cookie_file {
            Some(path) => {
                let store = FileCookieStore::open(path.clone())
                    .with_context(|| format!("Failed to open cookie file {:?}", path))?;
                info!("Using cookie file {:?}", store.file_path());
                Arc::new(store)
            }
            None => {
                info!("Keeping cookies in memory");
                Arc::new(MemoryCookieStore::new())
            }
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn CookieStore>) -> Result<Self> {
        let cookies = SessionCookies::new(store, config.secure_cookies);
        let api = ApiClient::new(
            &config.api_base_url,
            config.request_timeout_sec,
            cookies.clone(),
        )
        .context("Failed to create API client")?;
        let session = SessionService::new(cookies.clone(), api.clone());

        Ok(Self {
            config,
            cookies,
            api,
            session,
            popup: PopupProvider::new(),
            toaster: Toaster::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn popup(&self) -> PopupContext {
        self.popup.context()
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    /// The current viewer, read from the session cookies.
    pub fn viewer(&self) -> Viewer {
        Viewer::from_session(&self.cookies)
    }

    /// A profile view for `user_id`, wired to this shell's viewer and toaster.
    pub fn profile_editor(&self, user_id: &str) -> ProfileEditor {
        ProfileEditor::new(
            user_id,
            self.viewer(),
            self.config.fetch_failure_policy,
            self.toaster.clone(),
        )
    }

    /// Opens the login form unless someone is logged in. Returns whether it
    /// was opened.
    pub fn require_login(&self, redirect_url: &str) -> Result<bool, PopupError> {
        if self.cookies.access_token().is_some() {
            return Ok(false);
        }
        self.popup().open_login_form(redirect_url)?;
        Ok(true)
    }
}
