//! Shared constants for end-to-end tests
//!
//! When the seeded backend data changes (users, tokens), update only this file.

// ============================================================================
// Users
// ============================================================================

/// Id of the user the test tokens belong to
pub const OWNER_ID: &str = "3f1c2d4e-0000-4000-8000-000000000001";

/// Another user with a public profile
pub const OTHER_USER_ID: &str = "3f1c2d4e-0000-4000-8000-000000000002";

/// An id the backend knows nothing about
pub const UNKNOWN_USER_ID: &str = "3f1c2d4e-0000-4000-8000-00000000dead";

// ============================================================================
// Tokens
// ============================================================================

pub const TEST_ACCESS_TOKEN: &str = "access-token-owner";

pub const TEST_REFRESH_TOKEN: &str = "refresh-token-owner";

/// Access token handed out by the refresh endpoint
pub const REFRESHED_ACCESS_TOKEN: &str = "access-token-owner-2";

// ============================================================================
// Timeouts
// ============================================================================

/// Max time to wait for the server to be ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Polling interval when waiting for the server (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Request timeout of the client under test (seconds)
pub const CLIENT_TIMEOUT_SEC: u64 = 5;
