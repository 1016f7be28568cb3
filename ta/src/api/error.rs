//! API error types

use thiserror::Error;

/// Errors that can occur while talking to the task service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Check if the service answered with a non-success status
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    /// HTTP status code, when the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "{\"error\": \"bad\"}".to_string(),
        };
        assert!(err.is_status());
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().starts_with("API error 400"));
    }

    #[test]
    fn test_invalid_response_has_no_status() {
        let err = ApiError::InvalidResponse("not json".to_string());
        assert!(!err.is_status());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = parse.into();
        assert!(matches!(err, ApiError::Json(_)));
    }
}
