//! Domain errors for the issue tracker.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that abort a tracker run.
///
/// The one recoverable condition, a 403 response whose body mentions the
/// rate limit, is handled inside the fetch loop and never reaches callers
/// unless a retry budget has been configured and exhausted.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Connection, DNS or timeout failure
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any non-success status other than a rate-limited 403
    #[error("{url} returned {status}: {body}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// Response body was not the expected JSON array
    #[error("Failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Rate limit still in effect for {url} after {attempts} attempts")]
    RateLimitExhausted { url: String, attempts: u32 },

    /// Failure while writing the CSV export
    #[error("Export failed: {0}")]
    Export(String),
}

impl TrackerError {
    /// Returns the HTTP status if this error came from a response.
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the request never produced a response (connect, DNS, timeout).
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_error_message() {
        let err = TrackerError::HttpStatus {
            status: StatusCode::NOT_FOUND,
            url: "https://api.github.com/orgs/acme/repos".to_string(),
            body: "Not Found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("/orgs/acme/repos"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_io_error_maps_to_export() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: TrackerError = io.into();
        assert!(matches!(err, TrackerError::Export(ref msg) if msg.contains("read-only")));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_rate_limit_exhausted_message() {
        let err = TrackerError::RateLimitExhausted {
            url: "https://example.test/x".to_string(),
            attempts: 4,
        };
        assert_eq!(
            err.to_string(),
            "Rate limit still in effect for https://example.test/x after 4 attempts"
        );
    }
}
