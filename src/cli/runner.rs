//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ClientConfig, Settings};
use crate::credential::{CookieFileStore, CredentialStore, TOKEN_COOKIE};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use reqwest::Method;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = self.settings()?;

        match &self.cli.command {
            Commands::Get { path } => self.call(&settings, Method::GET, path, None).await,
            Commands::Delete { path } => self.call(&settings, Method::DELETE, path, None).await,
            Commands::Post { path, json } => {
                self.call(&settings, Method::POST, path, json.as_deref())
                    .await
            }
            Commands::Put { path, json } => {
                self.call(&settings, Method::PUT, path, json.as_deref())
                    .await
            }
            Commands::Patch { path, json } => {
                self.call(&settings, Method::PATCH, path, json.as_deref())
                    .await
            }
            Commands::Config => self.show_config(&settings),
            Commands::Token => self.token(&settings).await,
        }
    }

    /// Load the settings file, if one was given
    fn settings(&self) -> Result<Settings> {
        match &self.cli.settings {
            Some(path) => {
                debug!("Loading settings from {}", path.display());
                Settings::load(path)
            }
            None => Ok(Settings::default()),
        }
    }

    /// Resolve the client config: defaults, environment, settings file, flags
    pub fn client_config(&self, settings: &Settings) -> ClientConfig {
        let mut builder = ClientConfig::builder()
            .base_url_from_env()
            .settings(settings);

        if let Some(url) = &self.cli.base_url {
            builder = builder.base_url(url.as_str());
        }
        if let Some(ms) = self.cli.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Credential store from flags or settings; `None` when no cookie file is configured
    pub fn credential_store(&self, settings: &Settings) -> Option<Arc<dyn CredentialStore>> {
        let mut store = CookieFileStore::new(self.cookie_file(settings)?);
        if let Some(host) = self.cookie_domain(settings) {
            store = store.for_host(host);
        }
        Some(Arc::new(store))
    }

    fn cookie_file(&self, settings: &Settings) -> Option<PathBuf> {
        self.cli
            .cookie_file
            .clone()
            .or_else(|| settings.cookie_file.clone())
    }

    fn cookie_domain<'a>(&'a self, settings: &'a Settings) -> Option<&'a str> {
        self.cli
            .cookie_domain
            .as_deref()
            .or(settings.cookie_domain.as_deref())
    }

    fn client(&self, settings: &Settings) -> Result<HttpClient> {
        let config = self.client_config(settings);
        match self.credential_store(settings) {
            Some(store) => HttpClient::authenticated(config, store),
            None => {
                debug!("No cookie file configured, requests will be unauthenticated");
                HttpClient::new(config)
            }
        }
    }

    async fn call(
        &self,
        settings: &Settings,
        method: Method,
        path: &str,
        body: Option<&str>,
    ) -> Result<()> {
        let client = self.client(settings)?;

        let mut request = RequestConfig::new();
        if let Some(body) = body {
            let body: Value = serde_json::from_str(body)?;
            request = request.json(body);
        }

        let response = client.request(method.clone(), path, request).await?;
        info!("{} {} -> {}", method, path, response.status().as_u16());
        let text = client.read_text(response).await?;
        self.output_body(&text)
    }

    fn show_config(&self, settings: &Settings) -> Result<()> {
        let config = self.client_config(settings);
        self.output_value(&json!({
            "client": config,
            "cookie_file": self.cookie_file(settings),
            "cookie_domain": self.cookie_domain(settings),
        }));
        Ok(())
    }

    async fn token(&self, settings: &Settings) -> Result<()> {
        let Some(store) = self.credential_store(settings) else {
            return Err(Error::config(
                "No cookie file configured (use --cookie-file or AUTHCLIENT_COOKIE_FILE)",
            ));
        };

        let available = store
            .lookup(TOKEN_COOKIE)
            .await?
            .is_some_and(|c| !c.is_blank());

        self.output_value(&json!({ "token": TOKEN_COOKIE, "available": available }));
        Ok(())
    }

    fn output_body(&self, text: &str) -> Result<()> {
        match self.cli.format {
            OutputFormat::Raw => println!("{text}"),
            OutputFormat::Json | OutputFormat::Pretty => {
                let value: Value = if text.trim().is_empty() {
                    Value::Null
                } else {
                    serde_json::from_str(text)?
                };
                self.output_value(&value);
            }
        }
        Ok(())
    }

    /// Output a JSON value
    fn output_value(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Raw | OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}
