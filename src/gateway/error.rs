//! Error types for the analyzer gateway.

use thiserror::Error;

/// Additional context from service errors for debugging.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// HTTP status code from the service.
    pub http_status: Option<u16>,
    /// Request ID from the service (x-request-id header).
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// Errors that can occur when calling the analyzer service.
///
/// Every variant means the whole call failed; no partial result is returned.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The request was rejected before sending (blank or oversized prompt).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Non-success HTTP status.
    #[error("analyzer returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    /// Body could not be parsed or lacks the expected payload.
    #[error("malformed analyzer response: {0}")]
    Malformed(String),

    /// Body exceeded the size limit.
    #[error("analyzer response too large: {0} bytes")]
    ResponseTooLarge(usize),

    /// HTTP/network error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (bad base URL, client build failure).
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get a short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Status { .. } => "http_status",
            Self::Malformed(_) => "malformed_response",
            Self::ResponseTooLarge(_) => "response_too_large",
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "http_error",
            Self::Config(_) => "config_error",
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Status { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.context().and_then(|c| c.request_id.as_deref())
    }
}
