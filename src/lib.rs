//! Share Trips client library
//!
//! Client-side core of the Share Trips application: session cookies, the REST
//! API client, the popup/login-form context, listing cards and the user
//! profile editor. The `share-trips` binary drives it from a terminal.

pub mod api;
pub mod config;
pub mod listing;
pub mod popup;
pub mod profile;
pub mod session;
pub mod shell;
pub mod toast;

// Re-export commonly used types for convenience
pub use api::{ApiClient, ApiError, ApiResponse};
pub use config::{AppConfig, CliConfig, FileConfig};
pub use listing::{Listing, ListingCard};
pub use popup::{PopupContext, PopupError, PopupProvider, PopupState};
pub use profile::{
    EditorState, FetchFailurePolicy, ProfileEditor, SaveOutcome, UserProfile, Viewer,
};
pub use session::{
    CookieStore, FileCookieStore, MemoryCookieStore, SessionCookies, SessionService,
};
pub use shell::AppShell;
pub use toast::{Toast, ToastKind, Toaster};
