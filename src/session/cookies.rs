use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::cookie_store::{CookieStore, CookieStoreError};

pub const COOKIE_USER_ID: &str = "session_userid";
pub const COOKIE_ACCESS_TOKEN: &str = "session_access_token";
pub const COOKIE_REFRESH_TOKEN: &str = "session_refresh_token";
pub const COOKIE_IS_VERIFIED: &str = "user_is_verified";

pub const SESSION_COOKIES: [&str; 4] = [
    COOKIE_USER_ID,
    COOKIE_ACCESS_TOKEN,
    COOKIE_REFRESH_TOKEN,
    COOKIE_IS_VERIFIED,
];

/// Lifetime of the user id, refresh token and verification cookies.
pub const SESSION_MAX_AGE: Duration = Duration::days(7);
/// Lifetime of the access token cookie.
pub const ACCESS_TOKEN_MAX_AGE: Duration = Duration::hours(1);

/// Values of the four session cookies at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_verified: Option<String>,
}

/// Typed access to the session cookies of a [`CookieStore`].
///
/// Nothing is cached: every getter reads the store again.
#[derive(Clone)]
pub struct SessionCookies {
    store: Arc<dyn CookieStore>,
    secure: bool,
}

impl SessionCookies {
    /// `secure` marks written cookies as HTTPS-only (production).
    pub fn new(store: Arc<dyn CookieStore>, secure: bool) -> Self {
        Self { store, secure }
    }

    pub fn store(&self) -> &Arc<dyn CookieStore> {
        &self.store
    }

    fn read(&self, name: &str) -> Option<String> {
        self.store
            .get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn user_id(&self) -> Option<String> {
        self.read(COOKIE_USER_ID)
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(COOKIE_ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(COOKIE_REFRESH_TOKEN)
    }

    /// Raw verification cookie (`"true"` / `"false"`).
    pub fn is_verified(&self) -> Option<String> {
        self.read(COOKIE_IS_VERIFIED)
    }

    pub fn is_verified_flag(&self) -> bool {
        self.is_verified().as_deref() == Some("true")
    }

    pub fn snapshot(&self) -> Session {
        Session {
            user_id: self.user_id(),
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            is_verified: self.is_verified(),
        }
    }

    /// Writes an http-only cookie on path `/` living for `max_age`.
    pub fn write(
        &self,
        name: &'static str,
        value: String,
        max_age: Duration,
    ) -> Result<(), CookieStoreError> {
        let cookie = Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .max_age(max_age)
            .expires(OffsetDateTime::now_utc() + max_age)
            .build();
        self.store.set(cookie)
    }

    pub fn set_user_id(&self, user_id: &str) -> Result<(), CookieStoreError> {
        self.write(COOKIE_USER_ID, user_id.to_string(), SESSION_MAX_AGE)
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), CookieStoreError> {
        self.write(COOKIE_ACCESS_TOKEN, token.to_string(), ACCESS_TOKEN_MAX_AGE)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<(), CookieStoreError> {
        self.write(COOKIE_REFRESH_TOKEN, token.to_string(), SESSION_MAX_AGE)
    }

    pub fn set_verified(&self, is_verified: bool) -> Result<(), CookieStoreError> {
        self.write(COOKIE_IS_VERIFIED, is_verified.to_string(), SESSION_MAX_AGE)
    }

    /// Clears all session cookies by rewriting them empty with a zero max-age.
    pub fn reset(&self) -> Result<(), CookieStoreError> {
        debug!("Resetting session cookies");
        for name in SESSION_COOKIES {
            let cookie = Cookie::build((name, ""))
                .path("/")
                .max_age(Duration::ZERO)
                .build();
            self.store.set(cookie)?;
        }
        Ok(())
    }
}
