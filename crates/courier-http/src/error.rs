//! HTTP error types and handling

use courier_common::HttpStatus;
use thiserror::Error;

/// Errors raised while building, sending, or decoding a request
#[derive(Error, Debug)]
pub enum HttpError {
    /// Network or connection failure reported by the transport
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, only raised when `error_for_status` is enabled
    #[error("Unexpected status {status}: {body}")]
    Status { status: HttpStatus, body: String },

    /// Response body is not valid JSON for the requested type
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A file stream could not be read while building a multipart body
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Base URL or path cannot form an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL parse error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid request configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

/// Error category for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorCategory {
    /// Connection-related errors (DNS, TCP, TLS)
    Connection,
    /// Timeouts configured on the transport
    Timeout,
    /// Invalid request construction
    Request,
    /// Status errors
    Response,
    /// Body did not decode
    Decode,
    /// Local file I/O
    Io,
    /// Unknown/other errors
    Unknown,
}

impl HttpError {
    /// Categorize the error for reporting
    pub fn category(&self) -> HttpErrorCategory {
        match self {
            HttpError::Transport(e) => {
                if e.is_connect() {
                    HttpErrorCategory::Connection
                } else if e.is_timeout() {
                    HttpErrorCategory::Timeout
                } else if e.is_builder() || e.is_request() {
                    HttpErrorCategory::Request
                } else if e.is_decode() || e.is_body() {
                    HttpErrorCategory::Decode
                } else if e.is_status() {
                    HttpErrorCategory::Response
                } else {
                    HttpErrorCategory::Unknown
                }
            }
            HttpError::Status { .. } => HttpErrorCategory::Response,
            HttpError::Decode(_) => HttpErrorCategory::Decode,
            HttpError::Io(_) => HttpErrorCategory::Io,
            HttpError::InvalidUrl(_) | HttpError::UrlParse(_) | HttpError::InvalidRequest(_) => {
                HttpErrorCategory::Request
            }
        }
    }

    /// Status code of the failed response, if the error carries one
    pub fn status(&self) -> Option<HttpStatus> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport(e) => e.status().map(|s| HttpStatus(s.as_u16())),
            _ => None,
        }
    }

    /// Error message with credentials and tokens removed
    pub fn sanitized_message(&self) -> String {
        sanitize(&self.to_string())
    }
}

/// Strip URL credentials and auth tokens from text bound for logs
pub(crate) fn sanitize(msg: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static URL_CREDS_RE: OnceLock<Regex> = OnceLock::new();
    static AUTH_TOKEN_RE: OnceLock<Regex> = OnceLock::new();

    let url_creds_re = URL_CREDS_RE
        .get_or_init(|| Regex::new(r"(https?)://[^/@\s]+@").expect("valid regex"));
    let auth_token_re = AUTH_TOKEN_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(bearer|api[_-]?key|token|access_token)(\s*[:=]\s*|\s+)[^\s&]+")
            .expect("valid regex")
    });

    let sanitized = url_creds_re.replace_all(msg, "$1://[REDACTED]@");
    let sanitized = auth_token_re.replace_all(&sanitized, "$1$2[REDACTED]");

    sanitized.to_string()
}
