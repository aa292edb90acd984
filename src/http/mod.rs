//! HTTP client module
//!
//! Provides the pre-configured client and the interceptor chain every request
//! passes through before it reaches the transport.
//!
//! # Features
//!
//! - **Base URL**: relative paths resolve against the configured base
//! - **Fixed timeout**: requests that run past it fail with `Error::Timeout`
//! - **Default headers**: JSON content type unless a call overrides it
//! - **Bearer injection**: `BearerTokenInterceptor` attaches the `token` cookie

mod client;
mod interceptor;
mod types;

pub use client::{HttpClient, HttpClientBuilder};
pub use interceptor::{BearerTokenInterceptor, RequestInterceptor};
pub use types::{OutgoingRequest, RequestConfig};
