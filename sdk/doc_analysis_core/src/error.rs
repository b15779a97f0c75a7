use thiserror::Error;

/// Errors that can occur when interacting with the document analysis service.
#[derive(Error, Debug)]
pub enum DocError {
    /// The request failed due to an HTTP error without a structured body.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The request was rejected client-side before any network call.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The service returned a structured error response.
    ///
    /// `inner_code` carries the `innererror.code` value when the service
    /// provides one (e.g. a numeric code such as `1002` nested under a
    /// generic outer code).
    #[error("API error ({code}): {message}")]
    Api {
        code: String,
        message: String,
        inner_code: Option<String>,
    },
}

impl DocError {
    /// Build an [`DocError::InvalidEndpoint`] from a message and its cause.
    pub fn invalid_endpoint_with_source(
        message: &str,
        source: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidEndpoint(format!("{message}: {source}"))
    }
}

/// Result type alias for document analysis operations.
pub type DocResult<T> = std::result::Result<T, DocError>;
