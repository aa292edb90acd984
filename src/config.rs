//! Client configuration
//!
//! `ClientConfig` is built once by the application's composition root and
//! passed to [`HttpClient`](crate::http::HttpClient). The base URL comes from
//! `NEXT_PUBLIC_API_BASE_URL` when set, otherwise a local development address.
//! An optional YAML settings file can override any of the defaults.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the base URL override
pub const BASE_URL_ENV: &str = "NEXT_PUBLIC_API_BASE_URL";

/// Base URL used when no override is present
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// Request timeout applied to every call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Media type sent as `Content-Type` unless a call overrides it
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Pick the base URL from an optional override.
///
/// Blank overrides count as unset.
pub fn resolve_base_url(override_url: Option<&str>) -> String {
    match override_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Immutable configuration for the HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Base URL relative paths are resolved against
    pub base_url: String,
    /// Per-request timeout
    #[serde(serialize_with = "serialize_millis")]
    pub timeout: Duration,
    /// Headers sent with every request, keyed by lowercase name
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_headers,
            user_agent: format!("authclient/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Default config with the base URL taken from the process environment
    pub fn from_env() -> Self {
        Self::builder().base_url_from_env().build()
    }

    /// Timeout in whole milliseconds
    #[allow(clippy::cast_possible_truncation)]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: serde::Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    #[allow(clippy::cast_possible_truncation)]
    serializer.serialize_u64(value.as_millis() as u64)
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Resolve the base URL from `NEXT_PUBLIC_API_BASE_URL`
    #[must_use]
    pub fn base_url_from_env(mut self) -> Self {
        let value = std::env::var(BASE_URL_ENV).ok();
        self.config.base_url = resolve_base_url(value.as_deref());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add or replace a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Apply values from a settings file on top of the current config
    #[must_use]
    pub fn settings(mut self, settings: &Settings) -> Self {
        if let Some(url) = settings.base_url.as_deref() {
            self = self.base_url(resolve_base_url(Some(url)));
        }
        if let Some(ms) = settings.timeout_ms {
            self = self.timeout(Duration::from_millis(ms));
        }
        for (key, value) in &settings.headers {
            self = self.header(key.as_str(), value.as_str());
        }
        if let Some(agent) = settings.user_agent.as_deref() {
            self = self.user_agent(agent);
        }
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// Settings file
// ============================================================================

/// Optional YAML settings file
///
/// ```yaml
/// base_url: https://api.example.com
/// timeout_ms: 5000
/// headers:
///   x-client: dashboard
/// cookie_file: ~/.config/app/cookies.txt
/// cookie_domain: example.com
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,

    /// Timeout override in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Extra default headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Netscape cookie file holding the `token` cookie
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,

    /// Only accept cookies scoped to this domain
    #[serde(default)]
    pub cookie_domain: Option<String>,
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        if settings.timeout_ms == Some(0) {
            return Err(Error::config("timeout_ms must be greater than zero"));
        }
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(Some("https://api.example.com"), "https://api.example.com" ; "override wins")]
    #[test_case(Some("  https://api.example.com "), "https://api.example.com" ; "override trimmed")]
    #[test_case(Some(""), DEFAULT_BASE_URL ; "empty falls back")]
    #[test_case(Some("   "), DEFAULT_BASE_URL ; "blank falls back")]
    #[test_case(None, DEFAULT_BASE_URL ; "unset falls back")]
    fn test_resolve_base_url(input: Option<&str>, expected: &str) {
        assert_eq!(resolve_base_url(input), expected);
    }

    /// Serializes tests that touch the process environment
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// Run `f` with `NEXT_PUBLIC_API_BASE_URL` set to `value`, then restore it
    fn with_base_url_env<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = std::env::var(BASE_URL_ENV).ok();

        match value {
            Some(v) => std::env::set_var(BASE_URL_ENV, v),
            None => std::env::remove_var(BASE_URL_ENV),
        }
        let out = f();
        match previous {
            Some(v) => std::env::set_var(BASE_URL_ENV, v),
            None => std::env::remove_var(BASE_URL_ENV),
        }
        out
    }

    #[test]
    fn test_from_env_uses_override() {
        let config = with_base_url_env(Some("https://api.example.com"), ClientConfig::from_env);
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test_case(None ; "unset")]
    #[test_case(Some("") ; "empty")]
    #[test_case(Some("   ") ; "blank")]
    fn test_from_env_falls_back(value: Option<&str>) {
        let config = with_base_url_env(value, ClientConfig::from_env);
        assert_eq!(config.base_url, "http://localhost:4000/api");
    }

    #[test]
    fn test_settings_override_env() {
        let settings = Settings {
            base_url: Some("https://settings.example.com".to_string()),
            ..Settings::default()
        };
        let config = with_base_url_env(Some("https://env.example.com"), || {
            ClientConfig::builder()
                .base_url_from_env()
                .settings(&settings)
                .build()
        });
        assert_eq!(config.base_url, "https://settings.example.com");
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:4000/api");
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.timeout_ms(), 10_000);
        assert_eq!(
            config.default_headers.get("content-type"),
            Some(&"application/json".to_string())
        );
        assert!(config.user_agent.starts_with("authclient/"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::builder()
            .base_url("https://api.example.com")
            .timeout(Duration::from_secs(3))
            .header("X-Custom", "value")
            .header("Content-Type", "text/plain")
            .user_agent("test-agent/1.0")
            .build();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(
            config.default_headers.get("x-custom"),
            Some(&"value".to_string())
        );
        assert_eq!(
            config.default_headers.get("content-type"),
            Some(&"text/plain".to_string())
        );
        assert_eq!(config.default_headers.len(), 2);
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test]
    fn test_settings_from_yaml() {
        let settings = Settings::from_yaml(
            r"
base_url: https://api.example.com
timeout_ms: 2500
headers:
  X-Client: dashboard
cookie_file: /tmp/cookies.txt
cookie_domain: example.com
",
        )
        .unwrap();

        assert_eq!(settings.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(settings.timeout_ms, Some(2500));
        assert_eq!(settings.cookie_file, Some(PathBuf::from("/tmp/cookies.txt")));
        assert_eq!(settings.cookie_domain.as_deref(), Some("example.com"));

        let config = ClientConfig::builder().settings(&settings).build();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(
            config.default_headers.get("x-client"),
            Some(&"dashboard".to_string())
        );
        assert_eq!(
            config.default_headers.get("content-type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_settings_empty_document_keeps_defaults() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let config = ClientConfig::builder().settings(&settings).build();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_settings_rejects_unknown_and_zero_timeout() {
        assert!(matches!(
            Settings::from_yaml("retries: 3"),
            Err(Error::YamlParse(_))
        ));
        assert!(matches!(
            Settings::from_yaml("timeout_ms: 0"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_settings_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "base_url: https://staging.example.com\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(
            settings.base_url.as_deref(),
            Some("https://staging.example.com")
        );

        let missing = Settings::load(dir.path().join("nope.yaml"));
        assert!(missing
            .unwrap_err()
            .to_string()
            .contains("Failed to read settings file"));
    }

    #[test]
    fn test_config_serializes_timeout_as_millis() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json["timeout"], 10_000);
        assert_eq!(json["base_url"], DEFAULT_BASE_URL);
    }
}
