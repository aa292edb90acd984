//! Netscape cookie file store
//!
//! Each data line holds 7 TAB-separated fields:
//! `domain`, `include_subdomains`, `path`, `secure`, `expires`, `name`, `value`.
//! Lines starting with `#` are comments, except the `#HttpOnly_` domain prefix
//! curl writes for HTTP-only cookies.

use super::types::{Credential, CredentialStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// A single parsed cookie
#[derive(Clone, PartialEq, Eq)]
pub struct CookieEntry {
    /// Domain the cookie belongs to (e.g. `.example.com`)
    pub domain: String,
    /// Whether subdomains match
    pub include_subdomains: bool,
    /// URL path scope
    pub path: String,
    /// HTTPS only
    pub secure: bool,
    /// HTTP only (from the `#HttpOnly_` prefix)
    pub http_only: bool,
    /// Unix timestamp of expiry, 0 for session cookies
    pub expires: i64,
    /// Cookie name
    pub name: String,
    value: String,
}

impl CookieEntry {
    /// Cookie value. Avoid logging it.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the cookie expired at or before `now` (unix seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires != 0 && self.expires <= now
    }

    /// Whether the cookie applies to `host`
    pub fn matches_host(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.').to_ascii_lowercase();
        let host = host.trim_start_matches('.').to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    }
}

impl fmt::Debug for CookieEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieEntry")
            .field("domain", &self.domain)
            .field("include_subdomains", &self.include_subdomains)
            .field("path", &self.path)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("expires", &self.expires)
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Parse Netscape cookie file content.
///
/// Malformed lines are skipped with a warning; the rest still load.
pub fn parse_netscape_cookies(content: &str) -> Vec<CookieEntry> {
    let mut cookies = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;

        let (line, http_only) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
            Some(rest) => (rest, true),
            None => (line, false),
        };

        if line.trim().is_empty() || (!http_only && line.starts_with('#')) {
            continue;
        }

        match parse_cookie_line(line, line_number, http_only) {
            Ok(cookie) => cookies.push(cookie),
            Err(e) => warn!(line = line_number, error = %e, "Skipping malformed cookie line"),
        }
    }

    cookies
}

fn parse_cookie_line(line: &str, line_number: usize, http_only: bool) -> Result<CookieEntry> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 7 {
        return Err(Error::CookieParse {
            line: line_number,
            message: format!("expected 7 TAB-separated fields, found {}", fields.len()),
        });
    }

    let expires = fields[4].trim().parse::<i64>().map_err(|_| Error::CookieParse {
        line: line_number,
        message: format!("invalid expiry '{}'", fields[4]),
    })?;

    Ok(CookieEntry {
        domain: fields[0].to_string(),
        include_subdomains: parse_flag(fields[1], "include_subdomains", line_number)?,
        path: fields[2].to_string(),
        secure: parse_flag(fields[3], "secure", line_number)?,
        http_only,
        expires,
        name: fields[5].to_string(),
        value: fields[6].to_string(),
    })
}

fn parse_flag(value: &str, field: &str, line_number: usize) -> Result<bool> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        other => Err(Error::CookieParse {
            line: line_number,
            message: format!("{field} must be TRUE or FALSE, got '{other}'"),
        }),
    }
}

/// Credential store backed by a Netscape cookie file
///
/// The file is read on every lookup so a token written by another process is
/// picked up by the next request. A missing file means no credential.
#[derive(Debug, Clone)]
pub struct CookieFileStore {
    path: PathBuf,
    host: Option<String>,
}

impl CookieFileStore {
    /// Store reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            host: None,
        }
    }

    /// Only accept cookies that apply to `host`
    #[must_use]
    pub fn for_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn select<'a>(&self, cookies: &'a [CookieEntry], name: &str) -> Option<&'a CookieEntry> {
        let now = Utc::now().timestamp();
        // Later lines win, matching how cookie jars append updates
        cookies.iter().rev().find(|c| {
            c.name == name
                && !c.is_expired_at(now)
                && self.host.as_deref().map_or(true, |h| c.matches_host(h))
        })
    }
}

#[async_trait]
impl CredentialStore for CookieFileStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    async fn lookup(&self, name: &str) -> Result<Option<Credential>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cookie file not found, no credential");
                return Ok(None);
            }
            Err(e) => return Err(Error::credential_lookup(name, e)),
        };

        let cookies = parse_netscape_cookies(&content);
        let found = self.select(&cookies, name).map(|c| Credential::new(c.value()));
        debug!(found = found.is_some(), "Cookie lookup finished");
        Ok(found)
    }
}
