use std::fmt;

/// Classifies a failed API interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection-level failure (refused, reset, DNS).
    Network,
    /// The request or connect timeout elapsed.
    Timeout,
    /// The server answered with a non-2xx status.
    HttpStatus(u16),
    /// The response body did not match the expected shape.
    Decode,
    /// The configured base URL cannot address the endpoint.
    InvalidBaseUrl,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Decode => write!(f, "unexpected response body"),
            ApiErrorKind::InvalidBaseUrl => write!(f, "invalid base url"),
        }
    }
}

/// A transport-level failure talking to the scraping API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// Transport-derived error text, always present.
    pub message: String,
    /// Server-provided detail from an error body, when the server sent one.
    pub detail: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(
        kind: ApiErrorKind,
        message: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            detail,
        }
    }

    /// Text to show the user: the server detail when present, otherwise the
    /// transport error text.
    pub fn surface_message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.message)
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiErrorKind::Decode, err.to_string());
    }
    ApiError::new(ApiErrorKind::Network, err.to_string())
}
