use std::time::Duration;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a submission can fail. Errors are terminal for the request that produced them.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no URL was provided")]
    MissingInput,

    #[error("not a supported video link: {0}")]
    InvalidUrlShape(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("network failure: {0}")]
    NetworkFailure(#[source] BoxError),

    #[error("empty response from server{}", detail_suffix(.detail))]
    EmptyResponse { detail: Option<String> },

    #[error("no video URL found in response")]
    NoMediaUrlFound,
}

/// Fieldless mirror of [`ResolveError`], handy for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    InvalidUrlShape,
    Timeout,
    HttpStatus,
    NetworkFailure,
    EmptyResponse,
    NoMediaUrlFound,
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

impl ResolveError {
    pub fn network(err: impl Into<BoxError>) -> Self {
        Self::NetworkFailure(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput => ErrorKind::MissingInput,
            Self::InvalidUrlShape(_) => ErrorKind::InvalidUrlShape,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::HttpStatus(_) => ErrorKind::HttpStatus,
            Self::NetworkFailure(_) => ErrorKind::NetworkFailure,
            Self::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            Self::NoMediaUrlFound => ErrorKind::NoMediaUrlFound,
        }
    }

    /// Text the caller should show the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingInput => "Please enter a TikTok URL.",
            Self::InvalidUrlShape(_) => {
                "Please enter a valid TikTok URL. We support various formats including short links."
            }
            Self::Timeout(_) => "Request timeout. The server is taking too long to respond.",
            Self::HttpStatus(404) => "Video not found. Please check the URL and try again.",
            Self::HttpStatus(500..=599) => "Server error. Please try again in a few minutes.",
            Self::HttpStatus(_) => GENERIC_MESSAGE,
            Self::NetworkFailure(_) => "Network error. Please check your internet connection.",
            Self::EmptyResponse { .. } => GENERIC_MESSAGE,
            Self::NoMediaUrlFound => "Video might be private, removed, or unavailable for download.",
        }
    }
}
