use thiserror::Error;

/// Broad class of a request failure, kept alongside the normalized shape
/// so callers can distinguish transport problems from backend rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response reached the client.
    Transport,
    /// The backend answered with a non-2xx status.
    Http,
    /// Response arrived but could not be interpreted, or anything else.
    Unexpected,
}

/// Normalized failure for every client operation.
///
/// All transport, HTTP, and decode failures collapse into this one shape
/// carrying the status code (when a response was received), a
/// human-readable message, the endpoint, and the correlation id that was
/// attached to the outgoing request.
#[derive(Debug, Clone, Error)]
#[error("{endpoint}: {message}")]
pub struct RequestFailed {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
    pub endpoint: String,
    pub trace_id: String,
}

pub type Result<T> = std::result::Result<T, RequestFailed>;

/// Failure constructing the underlying HTTP client.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_endpoint_and_message() {
        let err = RequestFailed {
            kind: FailureKind::Http,
            status: Some(503),
            message: "storage offline".to_string(),
            endpoint: "/health".to_string(),
            trace_id: "abc123".to_string(),
        };

        assert_eq!(err.to_string(), "/health: storage offline");
    }
}
