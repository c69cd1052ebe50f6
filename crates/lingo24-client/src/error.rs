//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The client was used before it had what it needs locally, e.g. asking
    /// for an access token before any authorization code was exchanged.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP transport failed (connection, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-2xx response.
    #[error("API error ({status}) for {url}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Response body, possibly empty.
        body: String,
    },

    /// Response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing or joining failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Single-item lookup found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A state transition was requested from the wrong status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Integer index outside the collection bounds.
    #[error("Index {index} out of range for collection of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: i64,
        /// Collection length at the time of the request.
        len: u64,
    },

    /// Caller supplied an unusable argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not offered by this collection.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Prices in different currencies cannot be combined.
    #[error("Cannot add prices with different currencies ({left} and {right})")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: String,
        /// Currency of the right operand.
        right: String,
    },

    /// Token store could not persist or load tokens.
    #[error("Token store error: {0}")]
    Store(String),
}

impl Error {
    /// Build an error from a non-2xx response.
    pub(crate) fn status(status: reqwest::StatusCode, url: &str, body: String) -> Self {
        Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        }
    }

    /// Check if this error came from talking to the API: transport failure,
    /// non-2xx response, or an undecodable body.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. } | Error::Json(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || self.status_code() == Some(404)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(status) if status >= 500)
    }

    /// HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> Error {
        Error::Status {
            status,
            url: "https://api.lingo24.com/docs/v1/projects/1".to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_status_classification() {
        assert!(status_error(404).is_not_found());
        assert!(!status_error(404).is_server_error());
        assert!(status_error(401).is_auth_error());
        assert!(status_error(503).is_server_error());
        assert!(status_error(500).is_api_error());
    }

    #[test]
    fn test_local_errors_are_not_api_errors() {
        assert!(!Error::Configuration("no token".into()).is_api_error());
        assert!(!Error::InvalidState("CANCELLED".into()).is_api_error());
        assert!(Error::NotFound("projects/1".into()).is_not_found());
        assert_eq!(Error::Unsupported("sort".into()).status_code(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_api_error());
    }

    #[test]
    fn test_error_display() {
        let err = Error::IndexOutOfRange { index: -1, len: 10 };
        assert_eq!(
            err.to_string(),
            "Index -1 out of range for collection of length 10"
        );

        let err = Error::CurrencyMismatch {
            left: "GBP".into(),
            right: "EUR".into(),
        };
        assert!(err.to_string().contains("GBP and EUR"));
    }
}
