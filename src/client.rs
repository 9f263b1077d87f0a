use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::config::ClientConfig;
use crate::endpoint;
use crate::error::{Error, Result};
use crate::extract;
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_RETRIES,
    CLIENT_REQUEST_TIMEOUTS, CLIENT_REQUESTS, CLIENT_RETRY_BACKOFF,
};
use crate::types::{ChatRequest, ChatResponse, HealthStatus, Message};

/// Path of the chat endpoint, relative to the base URL.
pub const CHAT_PATH: &str = "/api/chat";

/// Path of the liveness probe, relative to the base URL.
pub const HEALTH_PATH: &str = "/health";

const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

/// Method, headers and body of a single request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Headers sent on every attempt.
    pub headers: HeaderMap,
    /// Encoded body, if any.
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    /// A bodiless request with the given method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A plain `GET`.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// A `POST` carrying `body` encoded as JSON.
    pub fn post_json<T: Serialize + ?Sized>(body: &T) -> Result<Self> {
        let mut options = Self::new(Method::POST);
        options.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        options
            .headers
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        options.body = Some(serde_json::to_vec(body)?);
        Ok(options)
    }

    /// Adds or replaces a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Per-call overrides for [`CopilotClient::post_chat_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatOptions {
    /// Base URL to use instead of the client's resolved one.  Blank values are ignored.
    pub base_url: Option<String>,
    /// Deadline to use instead of the client's default.
    pub timeout: Option<Duration>,
}

impl ChatOptions {
    /// Options that change nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends this call to `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Applies `timeout` to each attempt of this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for the copilot chat backend.
///
/// Clones share one connection pool.  Calls are independent of each other; the only state
/// shared between them is the base URL resolved at construction.
#[derive(Clone)]
pub struct CopilotClient {
    client: ReqwestClient,
    base_url: String,
    origin: Option<Url>,
    timeout: Duration,
    health_timeout: Duration,
    retry_backoff: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl CopilotClient {
    /// Create a new client, resolving the base URL from `config` once.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder().build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        // An unusable origin is treated as absent.
        let origin = config
            .origin
            .as_deref()
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .and_then(|origin| Url::parse(origin).ok())
            .filter(|origin| !origin.cannot_be_a_base());

        Ok(Self {
            client,
            base_url: config.resolve_base_url(),
            origin,
            timeout: config.timeout,
            health_timeout: config.health_timeout,
            retry_backoff: config.retry_backoff,
            logger: None,
        })
    }

    /// Create a new client configured from the environment.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Attach a logger that observes every chat exchange.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL every path is joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The origin relative URLs are resolved against, if one was configured.
    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// The default per-attempt deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join `path` onto this client's base URL.
    pub fn build_url(&self, path: &str) -> String {
        endpoint::build_url(path, &self.base_url)
    }

    /// Issue a request bounded by `timeout`, retrying once on a transient failure.
    ///
    /// A relative `url` is resolved against the configured origin and fails with
    /// [`Error::Url`] when there is none.  A success body that is not JSON yields `Value::Null`.
    pub async fn request_with_timeout(
        &self,
        url: &str,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<Value> {
        let body = self.execute(url, options, timeout).await?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    /// Send the conversation to `/api/chat` on the client's base URL.
    pub async fn post_chat(&self, messages: &[Message]) -> Result<ChatResponse> {
        self.post_chat_with(messages, &ChatOptions::default()).await
    }

    /// Send the conversation to `/api/chat`, honoring per-call overrides.
    ///
    /// `messages` go out in order and unmodified; an empty slice sends `{"messages": []}`.
    pub async fn post_chat_with(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatResponse> {
        let url = endpoint::build_url(CHAT_PATH, self.base_for(options));
        let timeout = options.timeout.unwrap_or(self.timeout);
        let request = ChatRequest::new(messages);

        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }
        let result = self.send_chat(&url, &request, timeout).await;
        if let Some(logger) = &self.logger {
            match &result {
                Ok(response) => logger.log_response(response),
                Err(err) => logger.log_error(err),
            }
        }
        result
    }

    /// Probe `/health` with the configured health deadline.
    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.health_check_with_timeout(self.health_timeout).await
    }

    /// Probe `/health` with an explicit deadline.
    pub async fn health_check_with_timeout(&self, timeout: Duration) -> Result<HealthStatus> {
        self.health_check_with(&ChatOptions::new().with_timeout(timeout)).await
    }

    /// Probe `/health`, honoring the same per-call overrides as [`Self::post_chat_with`].
    ///
    /// Without an explicit timeout the configured health deadline applies.
    pub async fn health_check_with(&self, options: &ChatOptions) -> Result<HealthStatus> {
        let url = endpoint::build_url(HEALTH_PATH, self.base_for(options));
        let timeout = options.timeout.unwrap_or(self.health_timeout);
        let body = self.execute(&url, &RequestOptions::get(), timeout).await?;
        Ok(HealthStatus::from_body(&body))
    }

    fn base_for<'a>(&'a self, options: &'a ChatOptions) -> &'a str {
        options
            .base_url
            .as_deref()
            .filter(|base| !base.trim().is_empty())
            .unwrap_or(self.base_url.as_str())
    }

    async fn send_chat(
        &self,
        url: &str,
        request: &ChatRequest,
        timeout: Duration,
    ) -> Result<ChatResponse> {
        let options = RequestOptions::post_json(request)?;
        let value = self.request_with_timeout(url, &options, timeout).await?;
        serde_json::from_value(value).map_err(|e| {
            Error::serialization(
                format!("Chat response did not contain a reply: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Run the attempt, backoff, attempt sequence and return the raw success body.
    async fn execute(
        &self,
        url: &str,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<String> {
        let url = self.resolve_url(url)?;
        CLIENT_REQUESTS.click();
        let start = Instant::now();

        let result = match self.attempt(&url, options, timeout).await {
            Err(err) if err.is_transient() => {
                CLIENT_REQUEST_RETRIES.click();
                CLIENT_RETRY_BACKOFF.add(self.retry_backoff.as_secs_f64());
                warn!(
                    %url,
                    code = err.code(),
                    status = err.status(),
                    backoff_ms = self.retry_backoff.as_millis() as u64,
                    error = %err,
                    "transient failure; retrying once"
                );
                tokio::time::sleep(self.retry_backoff).await;
                self.attempt(&url, options, timeout).await
            }
            result => result,
        };

        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            debug!(%url, code = err.code(), status = err.status(), error = %err, "request failed");
        }
        result
    }

    /// One attempt raced against its deadline.  Losing the race drops the in-flight request.
    async fn attempt(
        &self,
        url: &Url,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<String> {
        debug!(
            %url,
            method = %options.method,
            timeout_ms = timeout.as_millis() as u64,
            "sending request"
        );
        match tokio::time::timeout(timeout, self.round_trip(url, options)).await {
            Ok(result) => result,
            Err(_) => {
                CLIENT_REQUEST_TIMEOUTS.click();
                Err(Error::timeout(TIMEOUT_MESSAGE, Some(timeout.as_secs_f64())))
            }
        }
    }

    fn resolve_url(&self, url: &str) -> Result<Url> {
        match (Url::parse(url), &self.origin) {
            (Err(url::ParseError::RelativeUrlWithoutBase), Some(origin)) => {
                debug!(%url, %origin, "resolving relative URL against origin");
                Ok(origin.join(url)?)
            }
            (parsed, _) => Ok(parsed?),
        }
    }

    async fn round_trip(&self, url: &Url, options: &RequestOptions) -> Result<String> {
        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(options.headers.clone());
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await.map_err(Self::transport_error)?;
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        response.text().await.map_err(Self::transport_error)
    }

    /// Turn a non-success response into an [`Error::Http`].
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // An unreadable or non-JSON body leaves the error without details.
        let details = match response.text().await {
            Ok(body) => serde_json::from_str::<Value>(&body).ok(),
            Err(_) => None,
        };

        let message = extract::error_message(status_code, details.as_ref());
        let code = extract::error_code(status_code, details.as_ref());
        Error::http(status_code, code, message, details)
    }

    fn transport_error(e: reqwest::Error) -> Error {
        if e.is_builder() {
            Error::url(format!("Invalid request: {}", e), None)
        } else {
            Error::network(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }
}

impl fmt::Debug for CopilotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopilotClient")
            .field("base_url", &self.base_url)
            .field("origin", &self.origin.as_ref().map(Url::as_str))
            .field("timeout", &self.timeout)
            .field("health_timeout", &self.health_timeout)
            .field("retry_backoff", &self.retry_backoff)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}
