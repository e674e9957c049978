//! API transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port. Every call runs the
//! registered interceptors: `before_send` hooks in order before the request
//! leaves, and `on_error` hooks in order on any non-success response.
//! Requests that never produced a response skip the `on_error` hooks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use sessiongate_application::ports::{ErrorResponse, Interceptor, Transport, TransportError};
use sessiongate_domain::{HttpMethod, OutboundRequest};
use tracing::{debug, warn};
use url::Url;

use crate::cache::MokaResponseCache;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON API transport with interceptor hooks.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    timeout: Duration,
    interceptors: Vec<Arc<dyn Interceptor>>,
    cache: Option<MokaResponseCache>,
}

impl ReqwestTransport {
    /// Creates a transport for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {base_url}")))?;
        let client = Client::builder()
            .user_agent(concat!("sessiongate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            interceptors: Vec::new(),
            cache: None,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers an interceptor. Hooks run in registration order.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Enables [`ReqwestTransport::get_json_cached`] backed by `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: MokaResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GETs `path`, serving from the response cache when possible.
    ///
    /// This is the read path offered to hosts for derived data such as
    /// feeds and profiles. Hooks run before the lookup, so a hit requires
    /// the same `Authorization` the request would carry now. Without a
    /// configured cache this is a plain GET.
    ///
    /// # Errors
    ///
    /// Same as [`Transport::send`]. Errors are never cached.
    pub async fn get_json_cached(&self, path: &str) -> Result<Value, TransportError> {
        let request = self.prepare(OutboundRequest::get(path)).await;
        let Some(cache) = &self.cache else {
            return self.dispatch(request).await;
        };

        let credentials = request.authorization().map(str::to_string);
        if let Some(body) = cache.get(path, credentials.as_deref()) {
            debug!(path, authenticated = credentials.is_some(), "response cache hit");
            return Ok(body);
        }

        let body = self.dispatch(request).await?;
        cache.insert(path, credentials.as_deref(), body.clone());
        Ok(body)
    }

    /// Runs the `before_send` hooks.
    async fn prepare(&self, mut request: OutboundRequest) -> OutboundRequest {
        for interceptor in &self.interceptors {
            interceptor.before_send(&mut request).await;
        }
        request
    }

    /// Resolves a request path against the base URL. Absolute URLs pass
    /// through unchanged.
    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| TransportError::InvalidUrl(format!("{e}: {path}")));
        }

        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{e}: {joined}")))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        if error.is_decode() {
            return TransportError::Decode(error.to_string());
        }

        TransportError::Network(error.to_string())
    }

    /// Parses an error body. Bodies that are not JSON are kept as a string.
    fn error_body(bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Value, TransportError> {
        let request = self.prepare(request).await;
        self.dispatch(request).await
    }
}

impl ReqwestTransport {
    /// Sends a prepared request and runs the `on_error` hooks on a
    /// non-success response.
    async fn dispatch(&self, request: OutboundRequest) -> Result<Value, TransportError> {
        let url = self.resolve(&request.path)?;
        let timeout_ms = self.timeout_ms();
        debug!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path,
            authenticated = request.authorization().is_some(),
            "sending request"
        );

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let error = Self::map_error(&e, timeout_ms);
            warn!(request_id = %request.id, error = %error, "request failed before a response");
            error
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()));
        }

        debug!(request_id = %request.id, status = status.as_u16(), "error response");
        let mut error = ErrorResponse::raw(status.as_u16(), request.path.clone(), Self::error_body(&bytes));
        for interceptor in &self.interceptors {
            error = interceptor.on_error(&request, error);
        }
        Err(TransportError::Status(error))
    }
}
