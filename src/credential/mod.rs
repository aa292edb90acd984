//! Credential module
//!
//! Read-only access to the bearer token the rest of the application persists.
//! The HTTP client only ever looks credentials up; issuing, refreshing and
//! expiring them belongs to whatever flow writes the store.
//!
//! Stores:
//! - [`CookieFileStore`]: Netscape cookie file, re-read on every lookup
//! - [`MemoryStore`]: shared in-process map, useful for embedding and tests

mod cookie_file;
mod memory;
mod types;

pub use cookie_file::{parse_netscape_cookies, CookieEntry, CookieFileStore};
pub use memory::MemoryStore;
pub use types::{Credential, CredentialStore, TOKEN_COOKIE};
