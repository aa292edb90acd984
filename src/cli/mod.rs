//! CLI module
//!
//! Command-line interface for calling the API through the authenticated client.
//!
//! # Commands
//!
//! - `get` / `delete` - Request a path and print the response
//! - `post` / `put` / `patch` - Send a JSON body
//! - `config` - Show the resolved client configuration
//! - `token` - Report whether a bearer token is available

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
