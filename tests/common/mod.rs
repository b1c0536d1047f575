//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{owner_shell, TestServer, OWNER_ID};
//!
//! #[tokio::test]
//! async fn test_load_profile() {
//!     let server = TestServer::spawn().await;
//!     let shell = owner_shell(&server.base_url).await;
//!
//!     let mut editor = shell.profile_editor(OWNER_ID);
//!     editor.fetch(shell.api()).await;
//!     assert!(editor.can_edit());
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use client::{owner_shell, test_config, test_shell, test_shell_with_policy};
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{other_profile, owner_profile};
#[allow(unused_imports)]
pub use server::{BackendState, TestServer};
