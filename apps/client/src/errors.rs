use thiserror::Error;

/// Client-facing error taxonomy for all backend calls.
/// Display strings are the user-presentable messages; consumers show them verbatim.
/// `Clone + PartialEq` so outcomes can fan out over channels and be asserted in tests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unable to connect to server. Please check your internet connection.")]
    Unreachable,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Invalid request. Please check your search parameters.")]
    BadRequest { detail: Option<String> },

    #[error("Service not found. Please try again later.")]
    NotFound,

    #[error("Too many requests. Please wait a moment before trying again.")]
    RateLimited,

    #[error("Server error. Please try again later.")]
    Server,

    #[error("Server error ({status}): {detail}")]
    Unexpected { status: u16, detail: String },
}

impl ApiError {
    /// Maps an HTTP status to the taxonomy. `detail` is the backend's
    /// `{"detail": ...}` body field when one was present.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            400 => ApiError::BadRequest { detail },
            404 => ApiError::NotFound,
            429 => ApiError::RateLimited,
            500 => ApiError::Server,
            _ => ApiError::Unexpected {
                status,
                detail: detail.unwrap_or_else(|| "An unexpected error occurred".to_string()),
            },
        }
    }

    /// Whether a retry could plausibly succeed. 4xx responses other than 429
    /// are caller mistakes and are never retried.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Unreachable | ApiError::Timeout | ApiError::RateLimited | ApiError::Server => {
                true
            }
            ApiError::Unexpected { status, .. } => (500..=599).contains(status),
            ApiError::BadRequest { .. } | ApiError::NotFound => false,
        }
    }

    /// The backend-provided detail message, when the response carried one.
    /// Auth flows prefer this over the canonical display text.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { detail } => detail.as_deref(),
            ApiError::Unexpected { detail, .. } => Some(detail.as_str()),
            _ => None,
        }
    }
}

/// FastAPI error payloads carry the message under `detail`.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Classifies a non-success response, pulling the backend `detail` message
/// out of the body when one is present.
pub(crate) async fn classify_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .map(|b| b.detail);
    ApiError::from_status(status, detail)
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Unexpected {
                status: 200,
                detail: "Malformed response from server".to_string(),
            }
        } else if let Some(status) = e.status() {
            ApiError::from_status(status.as_u16(), None)
        } else {
            // Connect failures, DNS errors and dropped sockets all land here.
            ApiError::Unreachable
        }
    }
}
