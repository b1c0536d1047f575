use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::cookie_store::CookieStoreError;
use super::cookies::SessionCookies;
use crate::api::{ApiClient, CURRENT_USER_PATH, TOKEN_REFRESH_PATH};

#[derive(Deserialize)]
struct CurrentUser {
    is_active: bool,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: Option<&'a str>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: Option<String>,
}

/// Login, logout and token refresh on top of the session cookies.
#[derive(Clone)]
pub struct SessionService {
    cookies: SessionCookies,
    api: ApiClient,
}

impl SessionService {
    pub fn new(cookies: SessionCookies, api: ApiClient) -> Self {
        Self { cookies, api }
    }

    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    /// Stores the session and asks the backend whether the account is
    /// verified. The answer replaces `is_verified`; when the backend can't be
    /// asked the flag is stored as `false`.
    ///
    /// Returns the verification flag that ended up in the cookie.
    pub async fn login(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        is_verified: bool,
    ) -> Result<bool, CookieStoreError> {
        self.cookies.set_user_id(user_id)?;
        self.cookies.set_access_token(access_token)?;
        self.cookies.set_refresh_token(refresh_token)?;
        self.cookies.set_verified(is_verified)?;

        let verified = match self.api.get::<CurrentUser>(CURRENT_USER_PATH).await {
            Ok(user) => user.is_active,
            Err(err) => {
                error!("Failed to fetch user data: {}", err);
                false
            }
        };
        self.cookies.set_verified(verified)?;

        info!("Logged in as {} (verified: {})", user_id, verified);
        Ok(verified)
    }

    /// Stores the verification flag alone, e.g. after an OTP confirmation.
    pub fn set_verified(&self, is_verified: bool) -> Result<(), CookieStoreError> {
        self.cookies.set_verified(is_verified)
    }

    pub fn logout(&self) -> Result<(), CookieStoreError> {
        info!("Logging out");
        self.cookies.reset()
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Any failure clears the whole session and yields `None`.
    pub async fn refresh(&self) -> Result<Option<String>, CookieStoreError> {
        let refresh_token = self.cookies.refresh_token();
        let request = RefreshRequest {
            refresh: refresh_token.as_deref(),
        };

        let response = self
            .api
            .post_json::<_, RefreshResponse>(TOKEN_REFRESH_PATH, &request)
            .await;

        match response {
            Ok(RefreshResponse {
                access: Some(access),
            }) if !access.is_empty() => {
                self.cookies.set_access_token(&access)?;
                info!("Access token refreshed");
                Ok(Some(access))
            }
            Ok(_) => {
                warn!("Token refresh response has no access token, resetting session");
                self.cookies.reset()?;
                Ok(None)
            }
            Err(err) => {
                warn!("Token refresh failed, resetting session: {}", err);
                self.cookies.reset()?;
                Ok(None)
            }
        }
    }
}
