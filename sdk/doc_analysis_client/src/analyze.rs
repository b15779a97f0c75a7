//! Document analysis operations.
//!
//! Analysis is a long-running operation: submitting a document returns
//! `202 Accepted` with an `Operation-Location` header, and the client polls
//! that URL until the operation reaches a terminal status.
//!
//! ## Example
//!
//! ```rust,no_run
//! use doc_analysis_core::client::DocClient;
//! use doc_analysis_core::auth::DocCredential;
//! use doc_analysis_client::analyze::{self, AnalyzeRequest, PREBUILT_RECEIPT};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DocClient::builder()
//!     .endpoint("https://your-resource.cognitiveservices.azure.com")
//!     .credential(DocCredential::api_key("your-key"))
//!     .build()?;
//!
//! let request = AnalyzeRequest::builder()
//!     .model_id(PREBUILT_RECEIPT)
//!     .url_source("https://example.com/receipt.png")
//!     .build()?;
//!
//! let operation = analyze::begin_analyze(&client, &request).await?;
//! let result = analyze::poll_until_complete(
//!     &client,
//!     &operation.operation_location,
//!     std::time::Duration::from_secs(2),
//!     60,
//! ).await?;
//! # Ok(())
//! # }
//! ```

use crate::content_type::{detect_content_type, ContentType};
use crate::models::{AnalyzeOperationResult, AnalyzeResult, OperationStatus};
use bytes::Bytes;
use doc_analysis_core::client::DocClient;
use doc_analysis_core::error::{DocError, DocResult};
use serde::Serialize;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Prebuilt model ID constants
// ---------------------------------------------------------------------------

/// Prebuilt model for receipt data extraction.
pub const PREBUILT_RECEIPT: &str = "prebuilt-receipt";

/// Prebuilt model for document layout analysis (tables, selection marks).
pub const PREBUILT_LAYOUT: &str = "prebuilt-layout";

/// Prebuilt model for business card data extraction.
pub const PREBUILT_BUSINESS_CARD: &str = "prebuilt-businessCard";

/// Prebuilt model for invoice data extraction.
pub const PREBUILT_INVOICE: &str = "prebuilt-invoice";

/// Prebuilt model for identity document extraction (passports, licenses).
pub const PREBUILT_ID_DOCUMENT: &str = "prebuilt-idDocument";

/// Prebuilt model for general document extraction (key-value pairs).
pub const PREBUILT_DOCUMENT: &str = "prebuilt-document";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// The document to analyze: a remote blob URL or raw bytes.
#[derive(Debug, Clone)]
pub enum AnalyzeSource {
    /// A publicly reachable (or SAS-signed) URL the service fetches itself.
    Url(String),
    /// Raw document bytes, submitted as the request body.
    Bytes {
        data: Bytes,
        /// Content type of the payload. When `None`, the leading bytes are
        /// sniffed at submit time.
        content_type: Option<ContentType>,
    },
}

/// The JSON body sent when analyzing a URL source.
#[derive(Debug, Serialize)]
struct UrlSourceBody<'a> {
    #[serde(rename = "urlSource")]
    url_source: &'a str,
}

/// A validated request to analyze a document.
///
/// Use the builder to construct requests:
///
/// ```rust
/// use doc_analysis_client::analyze::{AnalyzeRequest, PREBUILT_INVOICE};
///
/// let request = AnalyzeRequest::builder()
///     .model_id(PREBUILT_INVOICE)
///     .url_source("https://example.com/invoice.pdf")
///     .build()
///     .expect("valid request");
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// The model ID to use for analysis (prebuilt or custom).
    pub model_id: String,

    /// The document source.
    pub source: AnalyzeSource,

    /// Page ranges to analyze (e.g., "1-3,5").
    pages: Option<String>,

    /// Document locale hint (e.g., "en-US").
    locale: Option<String>,

    /// String index type for span offsets (e.g., "utf16CodeUnit").
    string_index_type: Option<String>,
}

impl AnalyzeRequest {
    /// Creates a new builder for an analyze request.
    pub fn builder() -> AnalyzeRequestBuilder {
        AnalyzeRequestBuilder::default()
    }

    /// The analyze path for this request, including optional query parameters.
    ///
    /// The client appends the `api-version` parameter itself.
    pub(crate) fn path(&self) -> String {
        let mut path = format!(
            "/formrecognizer/documentModels/{}:analyze",
            self.model_id
        );

        let mut params = Vec::new();
        if let Some(ref pages) = self.pages {
            params.push(format!("pages={pages}"));
        }
        if let Some(ref locale) = self.locale {
            params.push(format!("locale={locale}"));
        }
        if let Some(ref sit) = self.string_index_type {
            params.push(format!("stringIndexType={sit}"));
        }
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }

        path
    }
}

/// Builder for [`AnalyzeRequest`].
#[derive(Debug, Default)]
pub struct AnalyzeRequestBuilder {
    model_id: Option<String>,
    url_source: Option<String>,
    bytes: Option<Bytes>,
    content_type: Option<ContentType>,
    pages: Option<String>,
    locale: Option<String>,
    string_index_type: Option<String>,
}

impl AnalyzeRequestBuilder {
    /// Sets the model ID to use for analysis (required).
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Sets the URL of the document to analyze.
    ///
    /// Mutually exclusive with [`bytes`](Self::bytes).
    pub fn url_source(mut self, url: impl Into<String>) -> Self {
        self.url_source = Some(url.into());
        self
    }

    /// Sets the raw document bytes to analyze.
    ///
    /// Mutually exclusive with [`url_source`](Self::url_source). The content
    /// type is sniffed from the leading bytes unless set via
    /// [`content_type`](Self::content_type).
    pub fn bytes(mut self, data: impl Into<Bytes>) -> Self {
        self.bytes = Some(data.into());
        self
    }

    /// Sets the content type of the byte payload explicitly, skipping
    /// detection.
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Sets the page ranges to analyze (e.g., "1-3,5").
    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    /// Sets the document locale hint.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the string index type for span offsets.
    pub fn string_index_type(mut self, string_index_type: impl Into<String>) -> Self {
        self.string_index_type = Some(string_index_type.into());
        self
    }

    /// Builds the request, validating all required fields.
    ///
    /// Validation happens here, before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::InvalidRequest`] if:
    /// - `model_id` is missing or empty
    /// - Neither `url_source` nor `bytes` is set
    /// - Both `url_source` and `bytes` are set
    /// - The byte payload is empty
    pub fn build(self) -> DocResult<AnalyzeRequest> {
        let model_id = self
            .model_id
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DocError::InvalidRequest("model ID is required".into()))?;

        let url_source = self.url_source.filter(|s| !s.is_empty());

        let source = match (url_source, self.bytes) {
            (Some(_), Some(_)) => {
                return Err(DocError::InvalidRequest(
                    "only one source allowed: set url_source or bytes, not both".into(),
                ));
            }
            (Some(url), None) => AnalyzeSource::Url(url),
            (None, Some(data)) => {
                if data.is_empty() {
                    return Err(DocError::InvalidRequest(
                        "document data is required and cannot be empty".into(),
                    ));
                }
                AnalyzeSource::Bytes {
                    data,
                    content_type: self.content_type,
                }
            }
            (None, None) => {
                return Err(DocError::InvalidRequest(
                    "source is required: set url_source or bytes".into(),
                ));
            }
        };

        Ok(AnalyzeRequest {
            model_id,
            source,
            pages: self.pages,
            locale: self.locale,
            string_index_type: self.string_index_type,
        })
    }
}

// ---------------------------------------------------------------------------
// Operation handle
// ---------------------------------------------------------------------------

/// A handle to a submitted analyze operation.
///
/// Carries the `Operation-Location` URL to poll for the result.
#[derive(Debug, Clone)]
pub struct AnalyzeOperation {
    /// The URL to poll for the analysis result.
    pub operation_location: String,
}

impl AnalyzeOperation {
    /// Poll until the operation terminates and materialize the result.
    ///
    /// A terminal `failed` status is surfaced as [`DocError::Api`] carrying
    /// the service's error code and message.
    ///
    /// # Errors
    ///
    /// Returns an error if polling fails, the operation fails, or
    /// `max_attempts` is exceeded.
    pub async fn wait_for_completion(
        &self,
        client: &DocClient,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> DocResult<AnalyzeResult> {
        let outcome =
            poll_until_complete(client, &self.operation_location, poll_interval, max_attempts)
                .await?;

        match outcome.status {
            OperationStatus::Succeeded => outcome.analyze_result.ok_or_else(|| DocError::Api {
                code: "MissingResult".into(),
                message: "operation succeeded but no analyzeResult was returned".into(),
                inner_code: None,
            }),
            _ => {
                let detail = outcome.error;
                Err(DocError::Api {
                    code: detail
                        .as_ref()
                        .map(|d| d.code.clone())
                        .unwrap_or_else(|| "OperationFailed".into()),
                    message: detail
                        .as_ref()
                        .map(|d| d.message.clone())
                        .unwrap_or_else(|| "analyze operation failed".into()),
                    inner_code: detail.and_then(|d| d.innererror).and_then(|i| i.code),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Submit a document for analysis.
///
/// Returns an [`AnalyzeOperation`] with the `Operation-Location` URL to poll.
/// The service returns `202 Accepted` on success.
///
/// For byte sources without an explicit content type, the payload's leading
/// bytes are sniffed; unrecognized formats fail before any network call.
///
/// # Tracing
///
/// Emits a span named `doc_analysis::analyze::begin_analyze` with field
/// `model_id`.
#[tracing::instrument(
    name = "doc_analysis::analyze::begin_analyze",
    skip(client, request),
    fields(model_id = %request.model_id)
)]
pub async fn begin_analyze(
    client: &DocClient,
    request: &AnalyzeRequest,
) -> DocResult<AnalyzeOperation> {
    tracing::debug!("submitting document for analysis");

    let path = request.path();

    let response = match &request.source {
        AnalyzeSource::Url(url) => {
            let body = UrlSourceBody { url_source: url };
            client.post(&path, &body).await?
        }
        AnalyzeSource::Bytes { data, content_type } => {
            let content_type = match content_type {
                Some(ct) => *ct,
                None => detect_content_type(data)?,
            };
            tracing::debug!(content_type = %content_type, "submitting binary payload");
            client
                .post_bytes(&path, data.clone(), content_type.as_str())
                .await?
        }
    };

    let operation_location = response
        .headers()
        .get("Operation-Location")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| DocError::Api {
            code: "MissingHeader".into(),
            message: "Operation-Location header missing from response".into(),
            inner_code: None,
        })?;

    tracing::debug!(operation_location = %operation_location, "document analysis submitted");

    Ok(AnalyzeOperation { operation_location })
}

/// Get the current result of an analyze operation.
///
/// # Tracing
///
/// Emits a span named `doc_analysis::analyze::get_analyze_result`.
#[tracing::instrument(
    name = "doc_analysis::analyze::get_analyze_result",
    skip(client),
    fields(operation_location = %operation_location)
)]
pub async fn get_analyze_result(
    client: &DocClient,
    operation_location: &str,
) -> DocResult<AnalyzeOperationResult> {
    tracing::debug!("fetching analyze result");

    // Operation-Location is a full URL. Extract path + query to reuse the
    // client's relative path-based API (and its auth/retry handling).
    let parsed = url::Url::parse(operation_location).map_err(|e| {
        DocError::invalid_endpoint_with_source("failed to parse Operation-Location URL", e)
    })?;

    let relative_path = match parsed.query() {
        Some(q) => format!("{}?{q}", parsed.path()),
        None => parsed.path().to_string(),
    };

    let response = client.get(&relative_path).await?;
    let result = response.json::<AnalyzeOperationResult>().await?;

    tracing::debug!(status = %result.status, "analyze result fetched");
    Ok(result)
}

/// Poll an analyze operation until it reaches a terminal status.
///
/// Returns the final [`AnalyzeOperationResult`] when the status is
/// `succeeded` or `failed`; the caller decides how to handle a failure.
/// Use [`AnalyzeOperation::wait_for_completion`] to have failures surfaced
/// as errors and the result materialized.
///
/// # Arguments
///
/// * `client` - The document analysis client.
/// * `operation_location` - The URL returned by [`begin_analyze`].
/// * `poll_interval` - How often to check the status.
/// * `max_attempts` - Maximum number of poll attempts before returning an
///   error. Set to `0` to disable the limit (not recommended for production).
///
/// # Errors
///
/// Returns [`DocError::Api`] with code `PollTimeout` if `max_attempts` is
/// exceeded before the operation reaches a terminal status.
///
/// # Tracing
///
/// Emits a span named `doc_analysis::analyze::poll_until_complete`.
#[tracing::instrument(
    name = "doc_analysis::analyze::poll_until_complete",
    skip(client),
    fields(operation_location = %operation_location)
)]
pub async fn poll_until_complete(
    client: &DocClient,
    operation_location: &str,
    poll_interval: Duration,
    max_attempts: u32,
) -> DocResult<AnalyzeOperationResult> {
    tracing::debug!("starting to poll for completion");

    let mut attempts = 0u32;

    loop {
        if max_attempts > 0 {
            attempts += 1;
            if attempts > max_attempts {
                return Err(DocError::Api {
                    code: "PollTimeout".into(),
                    message: format!(
                        "poll_until_complete timed out after {max_attempts} max_attempts"
                    ),
                    inner_code: None,
                });
            }
        }

        let result = get_analyze_result(client, operation_location).await?;

        if result.status.is_terminal() {
            tracing::debug!(status = %result.status, "operation reached terminal status");
            return Ok(result);
        }

        tracing::trace!(
            status = %result.status,
            attempt = attempts,
            "operation still in progress, waiting",
        );
        tokio::time::sleep(poll_interval).await;
    }
}
