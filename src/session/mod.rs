//! Session state kept in cookies: user id, access/refresh tokens and the
//! account verification flag.

mod cookie_store;
mod cookies;
mod service;

pub use cookie_store::{CookieStore, CookieStoreError, FileCookieStore, MemoryCookieStore};
pub use cookies::{
    Session, SessionCookies, ACCESS_TOKEN_MAX_AGE, COOKIE_ACCESS_TOKEN, COOKIE_IS_VERIFIED,
    COOKIE_REFRESH_TOKEN, COOKIE_USER_ID, SESSION_COOKIES, SESSION_MAX_AGE,
};
pub use service::SessionService;
