//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Call an API with the bearer token from your cookie file
#[derive(Parser, Debug)]
#[command(name = "authclient")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL (overrides NEXT_PUBLIC_API_BASE_URL and the settings file)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Netscape cookie file holding the `token` cookie
    #[arg(long, global = true, env = "AUTHCLIENT_COOKIE_FILE")]
    pub cookie_file: Option<PathBuf>,

    /// Only use cookies that apply to this host
    #[arg(long, global = true)]
    pub cookie_domain: Option<String>,

    /// Settings file (YAML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "raw")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET a path
    Get {
        /// Path relative to the base URL, or an absolute URL
        path: String,
    },

    /// DELETE a path
    Delete {
        /// Path relative to the base URL, or an absolute URL
        path: String,
    },

    /// POST a JSON body
    Post {
        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// Inline JSON body
        #[arg(long)]
        json: Option<String>,
    },

    /// PUT a JSON body
    Put {
        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// Inline JSON body
        #[arg(long)]
        json: Option<String>,
    },

    /// PATCH a JSON body
    Patch {
        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// Inline JSON body
        #[arg(long)]
        json: Option<String>,
    },

    /// Show the resolved client configuration
    Config,

    /// Report whether a bearer token is available (never prints it)
    Token,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Response body as received
    Raw,
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
