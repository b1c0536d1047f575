//! Popup and login-form visibility shared across the views of one shell.
//!
//! The [`PopupProvider`] owns the state; views get [`PopupContext`] handles.
//! A handle outlives its provider only as a dangling reference: using it then
//! fails with [`PopupError::OutsideProvider`].

use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_REDIRECT_URL: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    pub is_popup_open: bool,
    pub is_login_form_open: bool,
    /// Where to navigate once the login form succeeds.
    pub redirect_url: String,
}

impl Default for PopupState {
    fn default() -> Self {
        Self {
            is_popup_open: false,
            is_login_form_open: false,
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopupError {
    #[error("popup context used outside of its PopupProvider")]
    OutsideProvider,
}

/// Owner of the popup state.
pub struct PopupProvider {
    state: Arc<watch::Sender<PopupState>>,
}

impl PopupProvider {
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(PopupState::default())),
        }
    }

    /// A consumer handle bound to this provider.
    pub fn context(&self) -> PopupContext {
        PopupContext {
            state: Arc::downgrade(&self.state),
        }
    }
}

impl Default for PopupProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer handle on a [`PopupProvider`].
#[derive(Clone)]
pub struct PopupContext {
    state: Weak<watch::Sender<PopupState>>,
}

impl PopupContext {
    fn modify(&self, f: impl FnOnce(&mut PopupState)) -> Result<(), PopupError> {
        let sender = self.state.upgrade().ok_or(PopupError::OutsideProvider)?;
        sender.send_modify(f);
        Ok(())
    }

    pub fn state(&self) -> Result<PopupState, PopupError> {
        let sender = self.state.upgrade().ok_or(PopupError::OutsideProvider)?;
        let state = sender.borrow().clone();
        Ok(state)
    }

    /// Receiver notified on every change, for views rendering the modals.
    pub fn subscribe(&self) -> Result<watch::Receiver<PopupState>, PopupError> {
        let sender = self.state.upgrade().ok_or(PopupError::OutsideProvider)?;
        Ok(sender.subscribe())
    }

    pub fn open_popup(&self) -> Result<(), PopupError> {
        self.modify(|s| s.is_popup_open = true)
    }

    pub fn close_popup(&self) -> Result<(), PopupError> {
        self.modify(|s| s.is_popup_open = false)
    }

    /// Opens the login form, remembering where to go after a successful login.
    pub fn open_login_form(&self, redirect_url: &str) -> Result<(), PopupError> {
        debug!("Opening login form, redirect to {}", redirect_url);
        self.modify(|s| {
            s.redirect_url = redirect_url.to_string();
            s.is_login_form_open = true;
        })
    }

    pub fn open_login_form_default(&self) -> Result<(), PopupError> {
        self.open_login_form(DEFAULT_REDIRECT_URL)
    }

    /// Closes the login form. The redirect target is kept.
    pub fn close_login_form(&self) -> Result<(), PopupError> {
        self.modify(|s| s.is_login_form_open = false)
    }
}
