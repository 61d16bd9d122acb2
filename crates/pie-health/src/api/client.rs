//! Request functions bound to a base URL and default headers.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::error::{HealthError, Result};

/// Longest response body kept in a [`HealthError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Per-request options.
///
/// `headers`, when set, replaces the client's default header set entirely.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Header set to send instead of the defaults.
    pub headers: Option<HeaderMap>,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// JSON request body.
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: None,
            query: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Plain `GET` with default headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Send `headers` instead of the client defaults.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Append a query string pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Send a JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Observable state of a [`FetchHandle`].
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    /// The request has not completed yet.
    pub pending: bool,
    /// Decoded response, once successful.
    pub data: Option<T>,
    /// Failure, once failed.
    pub error: Option<Arc<HealthError>>,
}

impl<T> FetchState<T> {
    fn loading() -> Self {
        Self {
            pending: true,
            data: None,
            error: None,
        }
    }

    fn settled(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self {
                pending: false,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                pending: false,
                data: None,
                error: Some(Arc::new(err)),
            },
        }
    }
}

/// A request running in the background whose state can be observed.
#[derive(Debug)]
pub struct FetchHandle<T> {
    url: String,
    rx: watch::Receiver<FetchState<T>>,
}

impl<T: Clone> FetchHandle<T> {
    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.rx.borrow().clone()
    }

    /// Whether the request is still in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.rx.borrow().pending
    }

    /// Wait for the next state change. Returns `false` once no more changes can happen.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the request completes and return the final state.
    pub async fn settled(mut self) -> FetchState<T> {
        if let Ok(state) = self.rx.wait_for(|s| !s.pending).await {
            return state.clone();
        }
        FetchState::settled(Err(HealthError::Request {
            url: self.url,
            reason: "request task ended before completing".to_string(),
        }))
    }
}

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    headers: HeaderMap,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HealthError::InvalidBaseUrl(format!(
                "{}, must start with http:// or https://",
                config.base_url
            )));
        }

        let headers = build_headers(&config.default_headers)?;

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(5);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| HealthError::ClientBuild(e.to_string()))?;

        debug!(base_url = %base_url, "health API client ready");
        Ok(Self {
            http,
            base_url,
            headers,
        })
    }

    /// Client for the public APIpie API.
    pub fn apipie() -> Result<Self> {
        Self::new(&ApiConfig::default())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default header set.
    #[must_use]
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Full URL for `path`: `{base}/{path}`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue one request and decode the JSON response.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        send(&self.http, self.url(path), &self.headers, options).await
    }

    /// Start a request in the background and return a handle to observe it.
    ///
    /// Outside a tokio runtime the handle is returned already failed.
    pub fn request<T>(&self, path: &str, options: RequestOptions) -> FetchHandle<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let url = self.url(path);
        let (tx, rx) = watch::channel(FetchState::loading());

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let http = self.http.clone();
                let headers = self.headers.clone();
                let task_url = url.clone();
                runtime.spawn(async move {
                    let result = send(&http, task_url, &headers, options).await;
                    tx.send_replace(FetchState::settled(result));
                });
            }
            Err(e) => {
                tx.send_replace(FetchState::settled(Err(HealthError::Request {
                    url: url.clone(),
                    reason: e.to_string(),
                })));
            }
        }

        FetchHandle { url, rx }
    }
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| HealthError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| HealthError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

async fn send<T: DeserializeOwned>(
    http: &Client,
    url: String,
    default_headers: &HeaderMap,
    options: RequestOptions,
) -> Result<T> {
    let RequestOptions {
        method,
        headers,
        query,
        body,
    } = options;

    debug!(method = %method, url = %url, "sending request");

    let mut request = http
        .request(method, &url)
        .headers(headers.unwrap_or_else(|| default_headers.clone()));
    if !query.is_empty() {
        request = request.query(&query);
    }
    if let Some(body) = &body {
        request = request.json(body);
    }

    let response = request.send().await.map_err(|e| HealthError::Request {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(HealthError::Status {
            url,
            status: status.as_u16(),
            body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| HealthError::Request {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    trace!(url = %url, bytes = bytes.len(), "response received");

    // An empty body (e.g. 204) decodes like a JSON `null`
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };
    serde_json::from_slice(body).map_err(|e| HealthError::Decode {
        url,
        reason: e.to_string(),
    })
}
