//! Authenticated HTTP client
//!
//! Resolves paths against the configured base URL, applies default headers,
//! runs the interceptor chain and sends the request once. There are no
//! retries: timeouts and transport failures go straight back to the caller.

use super::interceptor::{BearerTokenInterceptor, RequestInterceptor};
use super::types::{OutgoingRequest, RequestConfig};
use crate::config::ClientConfig;
use crate::credential::CredentialStore;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Builder for [`HttpClient`]
pub struct HttpClientBuilder {
    config: ClientConfig,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl HttpClientBuilder {
    /// Append an interceptor to the chain
    #[must_use]
    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Attach bearer tokens read from `store`
    #[must_use]
    pub fn credential_store(self, store: Arc<dyn CredentialStore>) -> Self {
        self.interceptor(BearerTokenInterceptor::new(store))
    }

    /// Build the client
    pub fn build(self) -> Result<HttpClient> {
        let base_url = Url::parse(&self.config.base_url)?;
        let default_headers = to_header_map(&self.config.default_headers)?;

        let client = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .build()?;

        debug!(
            base_url = %base_url,
            timeout_ms = self.config.timeout_ms(),
            interceptors = self.interceptors.len(),
            "HTTP client ready"
        );

        Ok(HttpClient {
            client,
            config: self.config,
            default_headers,
            interceptors: self.interceptors,
        })
    }
}

/// HTTP client with a fixed base URL, timeout and interceptor chain
///
/// Construct it once and share it (it is cheap to wrap in an `Arc`); it is
/// safe to use from many tasks at once.
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    default_headers: HeaderMap,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl HttpClient {
    /// Start building a client from `config`
    pub fn builder(config: ClientConfig) -> HttpClientBuilder {
        HttpClientBuilder {
            config,
            interceptors: Vec::new(),
        }
    }

    /// Client without interceptors
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Client that attaches the `token` credential from `store` to every request
    pub fn authenticated(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::builder(config).credential_store(store).build()
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a GET request with config
    pub async fn get_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::GET, url, config).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a PUT request
    pub async fn put(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a PATCH request
    pub async fn patch(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::PATCH, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.request(Method::DELETE, url, RequestConfig::default())
            .await
    }

    /// Make a generic request
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let request = self.prepare(method, url, config)?;
        self.send(request).await
    }

    /// Make a request and parse JSON response
    ///
    /// The timeout covers reading the body too; a malformed body is
    /// `Error::JsonParse`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let timeout = config.timeout.unwrap_or(self.config.timeout);
        let response = self.request(method, url, config).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let json: T = serde_json::from_slice(&bytes)?;
        Ok(json)
    }

    /// Read a response body sent with the client's default timeout
    pub async fn read_text(&self, response: Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| transport_error(e, self.config.timeout))
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Resolve a path and per-call options into a request descriptor
    ///
    /// Default headers are applied first so per-call headers replace them.
    pub fn prepare(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<OutgoingRequest> {
        let mut full_url = Url::parse(&self.build_url(url))?;
        if !config.query.is_empty() {
            let mut pairs = full_url.query_pairs_mut();
            for (key, value) in &config.query {
                pairs.append_pair(key, value);
            }
        }

        let timeout = config.timeout.unwrap_or(self.config.timeout);
        let mut request = OutgoingRequest::new(method, full_url, timeout);
        request.headers = self.default_headers.clone();
        for (name, value) in to_header_map(&config.headers)? {
            if let Some(name) = name {
                request.headers.insert(name, value);
            }
        }
        request.body = config.body;

        Ok(request)
    }

    /// Run the interceptor chain and send the request
    ///
    /// If any interceptor fails the request is not sent.
    #[instrument(level = "debug", skip_all, fields(method = %request.method, url = %request.url))]
    pub async fn send(&self, mut request: OutgoingRequest) -> Result<Response> {
        for interceptor in &self.interceptors {
            request = interceptor.intercept(request).await?;
        }
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: OutgoingRequest) -> Result<Response> {
        let OutgoingRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        let mut req = self
            .client
            .request(method.clone(), url.clone())
            .headers(headers)
            .timeout(timeout);

        // Raw bytes so the configured Content-Type is the one on the wire
        if let Some(body) = body {
            req = req.body(serde_json::to_vec(&body)?);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Request timed out after {:?}: {} {}", timeout, method, url);
            }
            transport_error(e, timeout)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) if e.is_timeout() => {
                    warn!("Error body timed out after {:?}: {} {}", timeout, method, url);
                    return Err(transport_error(e, timeout));
                }
                Err(_) => String::new(),
            };
            debug!("Request failed with {}: {} {}", status.as_u16(), method, url);
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, url);
        Ok(response)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return base.to_string();
        }
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|e| Error::invalid_header(key, e))?;
        let value = HeaderValue::from_str(value).map_err(|e| Error::invalid_header(key, e))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Classify a reqwest failure, whether raised while sending or reading the body
fn transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            timeout_ms: duration_ms(timeout),
        }
    } else {
        Error::Http(e)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
