use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    /// No response was received from the backend.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url '{0}' cannot carry path segments")]
    OpaqueBaseUrl(String),
    /// `.` and `..` are collapsed by URL path normalization, even when escaped.
    #[error("tracking id '{0}' cannot be sent as a path segment")]
    UnroutableTrackingId(String),
}

impl TrackingError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Message reported by the backend in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackingError>;
