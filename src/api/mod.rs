//! REST client for the Share Trips backend.

mod client;

pub use client::{ApiClient, ApiError, ApiResponse};

/// Profile of the user with the given id.
pub const USER_PROFILE_PATH: &str = "/api/user/data/get";
/// Multipart update of the authenticated user's profile.
pub const USER_UPDATE_PATH: &str = "/api/user/data/update/";
/// Data of the authenticated user (carries `is_active`).
pub const CURRENT_USER_PATH: &str = "/api/user/data";
/// Exchanges a refresh token for a new access token.
pub const TOKEN_REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Builds the profile path for `user_id`, percent-encoding the id.
pub fn user_profile_path(user_id: &str) -> String {
    format!("{}/{}/", USER_PROFILE_PATH, urlencoding::encode(user_id))
}
