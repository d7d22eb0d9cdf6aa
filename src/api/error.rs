//! API error types for the marketplace data layer.

use thiserror::Error;

/// Broad category of an API failure, used to decide how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got a usable answer.
    Network,
    /// The request was answered and rejected.
    Api,
    /// The caller is not signed in or not allowed.
    Auth,
    /// Anything else.
    Unknown,
}

/// Errors that can occur when talking to the marketplace API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Network failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The request took longer than the configured timeout.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// The payload was rejected.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Sign-in failed or the session is missing.
    #[error("Authentication failed: check your email and password")]
    Unauthorized,

    /// The signed-in admin lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Server-side failure.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Unclassified failure.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: u16, context: &str) -> Self {
        match status {
            400 | 422 => ApiError::Validation(context.to_string()),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            408 | 504 => ApiError::Network(format!("HTTP {}: {}", status, context)),
            409 => ApiError::Conflict(context.to_string()),
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::Unknown(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }

    /// The taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => ErrorKind::Network,
            ApiError::Validation(_)
            | ApiError::NotFound(_)
            | ApiError::Conflict(_)
            | ApiError::ServerError(_) => ErrorKind::Api,
            ApiError::Unauthorized | ApiError::Forbidden => ErrorKind::Auth,
            ApiError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_status_401() {
        assert_eq!(ApiError::from_status(401, "test"), ApiError::Unauthorized);
    }

    #[test]
    fn test_error_from_status_403() {
        assert_eq!(ApiError::from_status(403, "test"), ApiError::Forbidden);
    }

    #[test]
    fn test_error_from_status_404() {
        match ApiError::from_status(404, "user u42") {
            ApiError::NotFound(msg) => assert_eq!(msg, "user u42"),
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_status_422() {
        assert!(matches!(
            ApiError::from_status(422, "bad email"),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn test_error_from_status_500() {
        assert!(matches!(
            ApiError::from_status(500, "test"),
            ApiError::ServerError(_)
        ));
    }

    #[test]
    fn test_error_from_status_unexpected() {
        assert!(matches!(ApiError::from_status(418, "teapot"), ApiError::Unknown(_)));
    }

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(ApiError::Timeout(100).kind(), ErrorKind::Network);
        assert_eq!(ApiError::Network("down".into()).kind(), ErrorKind::Network);
        assert_eq!(ApiError::Validation("x".into()).kind(), ErrorKind::Api);
        assert_eq!(ApiError::Unauthorized.kind(), ErrorKind::Auth);
        assert_eq!(ApiError::Forbidden.kind(), ErrorKind::Auth);
        assert_eq!(ApiError::Unknown("?".into()).kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::Unauthorized.to_string(),
            "Authentication failed: check your email and password"
        );
        assert_eq!(
            ApiError::NotFound("u42".to_string()).to_string(),
            "Resource not found: u42"
        );
        assert_eq!(ApiError::Timeout(250).to_string(), "Request timed out after 250 ms");
    }
}
