//! # authclient
//!
//! A pre-configured HTTP client that attaches a bearer token read from a
//! persisted cookie to every outgoing request.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use authclient::{ClientConfig, CookieFileStore, HttpClient, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Base URL from NEXT_PUBLIC_API_BASE_URL, else http://localhost:4000/api
//!     let config = ClientConfig::from_env();
//!     let store = Arc::new(CookieFileStore::new("cookies.txt"));
//!     let client = HttpClient::authenticated(config, store)?;
//!
//!     let me: serde_json::Value = client.get_json("/me").await?;
//!     println!("{me}");
//!     Ok(())
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! caller ──► prepare (base URL, default headers) ──► interceptors ──► transport
//!                                                      │
//!                                   BearerTokenInterceptor reads `token`
//!                                   from the CredentialStore every time
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
#[allow(missing_docs)]
pub mod error;

/// Client configuration and settings file
pub mod config;

/// Credential stores
pub mod credential;

/// HTTP client and request interceptors
pub mod http;

/// Icon action buttons
pub mod actions;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ClientConfig, Settings};
pub use credential::{CookieFileStore, Credential, CredentialStore, MemoryStore, TOKEN_COOKIE};
pub use error::{Error, Result};
pub use http::{
    BearerTokenInterceptor, HttpClient, OutgoingRequest, RequestConfig, RequestInterceptor,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
