//! HTTP client for the document analysis service.
//!
//! This module provides [`DocClient`], the entry point for talking to a
//! document analysis resource. The client handles authentication, HTTP
//! transport, retry on transient errors, and endpoint management.
//!
//! # Examples
//!
//! ## Using an API key
//! ```rust,no_run
//! use doc_analysis_core::client::DocClient;
//! use doc_analysis_core::auth::DocCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DocClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(DocCredential::api_key("your-key"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a pre-issued bearer token
//! ```rust,no_run
//! use doc_analysis_core::client::DocClient;
//! use doc_analysis_core::auth::DocCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DocClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(DocCredential::bearer_token("token"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::DocCredential;
use crate::error::{DocError, DocResult};
use bytes::Bytes;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use url::Url;

use std::time::Duration;

/// Default service API version.
pub const DEFAULT_API_VERSION: &str = "2023-07-31";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Determines if an HTTP status code represents a retriable error.
///
/// Retriable errors are transient server-side issues that may succeed on retry:
/// - 429 Too Many Requests (rate limiting)
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (2^attempt * initial_backoff).
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// Wire shape of a structured service error body.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    innererror: Option<InnerErrorBody>,
}

#[derive(Debug, Deserialize)]
struct InnerErrorBody {
    code: Option<String>,
}

/// The base client for interacting with a document analysis resource.
///
/// Higher-level operations in `doc_analysis_client` are free functions that
/// take a `DocClient` and a request. The client is cheaply cloneable and can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct DocClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) credential: DocCredential,
    pub(crate) api_version: String,
    pub(crate) retry_policy: RetryPolicy,
}

/// Builder for constructing a [`DocClient`].
///
/// Use [`DocClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct DocClientBuilder {
    endpoint: Option<String>,
    credential: Option<DocCredential>,
    api_version: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
}

impl DocClient {
    /// Create a new builder for configuring a `DocClient`.
    pub fn builder() -> DocClientBuilder {
        DocClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the API version being used.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the retry policy configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Build a full URL for an API path.
    ///
    /// The `api-version` query parameter is appended unless the path already
    /// carries one (polling URLs returned by the service do).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> DocResult<Url> {
        let mut url = self
            .endpoint
            .join(path)
            .map_err(|e| DocError::invalid_endpoint_with_source("failed to construct URL", e))?;

        let has_api_version = url.query_pairs().any(|(k, _)| k == "api-version");
        if !has_api_version {
            url.query_pairs_mut()
                .append_pair("api-version", &self.api_version);
        }

        Ok(url)
    }

    /// Send a GET request with automatic retry on transient errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retries or the server
    /// returns a non-retriable error response.
    pub async fn get(&self, path: &str) -> DocResult<reqwest::Response> {
        let url = self.url(path)?;
        self.send_with_retry(self.http.get(url)).await
    }

    /// Send a POST request with a JSON body, with automatic retry.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the request fails after all
    /// retries, or the server returns a non-retriable error response.
    pub async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> DocResult<reqwest::Response> {
        let url = self.url(path)?;
        self.send_with_retry(self.http.post(url).json(body)).await
    }

    /// Send a POST request with a raw binary body and an explicit
    /// `Content-Type` header, with automatic retry.
    ///
    /// Used for submitting document bytes directly instead of a URL source.
    pub async fn post_bytes(
        &self,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> DocResult<reqwest::Response> {
        let url = self.url(path)?;
        let builder = self
            .http
            .post(url)
            .header("Content-Type", content_type)
            .body(body);
        self.send_with_retry(builder).await
    }

    /// Send a DELETE request with automatic retry.
    pub async fn delete(&self, path: &str) -> DocResult<reqwest::Response> {
        let url = self.url(path)?;
        self.send_with_retry(self.http.delete(url)).await
    }

    /// Execute a request, retrying on retriable statuses with exponential
    /// backoff and jitter. The auth header is attached here so callers never
    /// handle credentials directly.
    async fn send_with_retry(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> DocResult<reqwest::Response> {
        let auth = self.credential.resolve();
        let builder = builder.header(auth.name, &auth.value);

        for attempt in 0..=self.retry_policy.max_retries {
            let request = builder.try_clone().ok_or_else(|| {
                DocError::InvalidRequest("request body cannot be replayed for retry".into())
            })?;

            let response = request.send().await?;
            let status = response.status().as_u16();

            if response.status().is_success() {
                return Ok(response);
            }

            if !is_retriable_status(status) || attempt == self.retry_policy.max_retries {
                return Self::check_response(response).await;
            }

            // Exponential backoff with jitter in [0.75, 1.25] of the base delay.
            let base_backoff = self.retry_policy.initial_backoff * 2_u32.pow(attempt);
            let jitter = 0.75 + fastrand::f64() * 0.5;
            let backoff = base_backoff.mul_f64(jitter);
            tracing::debug!(status, attempt, ?backoff, "retrying after transient error");
            tokio::time::sleep(backoff).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Maximum length for error messages surfaced to callers.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Redact bearer tokens and subscription keys from an error message.
    ///
    /// Service error bodies occasionally echo request headers back; this keeps
    /// credentials out of logs and error chains.
    pub(crate) fn redact_secrets(msg: &str) -> String {
        const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key:";
        let mut result = String::with_capacity(msg.len());
        let mut redact_next = false;
        for (i, word) in msg.split_whitespace().enumerate() {
            if i > 0 {
                result.push(' ');
            }
            if redact_next {
                result.push_str("[REDACTED]");
                redact_next = false;
            } else if word == "Bearer" || word == KEY_HEADER {
                // The secret is the word that follows the scheme or header name.
                result.push_str(word);
                redact_next = true;
            } else if word.starts_with(KEY_HEADER) {
                result.push_str(KEY_HEADER);
                result.push_str(" [REDACTED]");
            } else {
                result.push_str(word);
            }
        }
        result
    }

    /// Truncate a message if it exceeds the maximum length, redacting first.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let redacted = Self::redact_secrets(msg);
        if redacted.len() > Self::MAX_ERROR_MESSAGE_LEN {
            let mut end = Self::MAX_ERROR_MESSAGE_LEN;
            while !redacted.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &redacted[..end])
        } else {
            redacted
        }
    }

    /// Map a non-success response to the error taxonomy.
    ///
    /// Structured bodies shaped `{"error": {"code", "message", "innererror"}}`
    /// become [`DocError::Api`]; everything else becomes [`DocError::Http`].
    async fn check_response(response: reqwest::Response) -> DocResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(&body) {
            return Err(DocError::Api {
                code: parsed.error.code.unwrap_or_else(|| "unknown".to_string()),
                message: Self::truncate_message(
                    parsed.error.message.as_deref().unwrap_or(&body),
                ),
                inner_code: parsed.error.innererror.and_then(|inner| inner.code),
            });
        }

        Err(DocError::Http {
            status,
            message: Self::truncate_message(&body),
        })
    }
}

impl DocClientBuilder {
    /// Set the service endpoint URL.
    ///
    /// This should be in the format:
    /// `https://<resource-name>.cognitiveservices.azure.com`
    ///
    /// If not set, the builder will check the `DOC_ANALYSIS_ENDPOINT`
    /// environment variable.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder will use [`DocCredential::from_env()`].
    pub fn credential(mut self, credential: DocCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the API version.
    ///
    /// Defaults to [`DEFAULT_API_VERSION`] (`2023-07-31`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// Use this to configure proxies or other HTTP settings.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout configuration
    /// via [`connect_timeout`](Self::connect_timeout) or
    /// [`read_timeout`](Self::read_timeout) will be ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout, covering the full request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry policy for transient errors.
    ///
    /// Defaults to 3 retries with 500ms initial backoff.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Build the `DocClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No endpoint is provided and `DOC_ANALYSIS_ENDPOINT` is not set
    /// - The endpoint URL is invalid
    /// - Credential creation fails (when using environment-based credentials)
    pub fn build(self) -> DocResult<DocClient> {
        let http = self.http_client.unwrap_or_else(|| {
            let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
            let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);

            reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .timeout(read_timeout)
                .build()
                .expect("failed to build HTTP client")
        });

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var("DOC_ANALYSIS_ENDPOINT").ok())
            .ok_or_else(|| {
                DocError::MissingConfig(
                    "endpoint is required. Set it via builder or DOC_ANALYSIS_ENDPOINT env var."
                        .into(),
                )
            })?;

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| DocError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        let credential = self
            .credential
            .map(Ok)
            .unwrap_or_else(DocCredential::from_env)?;

        Ok(DocClient {
            http,
            endpoint,
            credential,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}
