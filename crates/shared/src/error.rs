use serde::{Deserialize, Serialize};

/// Error body returned by the mail backend on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiError {
    /// Parses a raw response body, yielding the server message only when it is
    /// present and non-blank.
    pub fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<ApiError>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}
