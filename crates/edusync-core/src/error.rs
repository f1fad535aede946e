//! Error types.
//!
//! `ApiError` is defined here rather than in `edusync-client` so the session
//! handler can classify transport failures into load errors without string
//! matching.

use thiserror::Error;

/// Errors that can occur when talking to the LMS REST API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token is available for an authenticated request.
    #[error("not logged in: no authentication token found")]
    AuthenticationMissing,

    /// The API answered 401.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API answered 403.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The API answered 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned some other error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request was rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Returns `true` if the failure is about credentials rather than the request.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::AuthenticationMissing | ApiError::AuthenticationFailed(_)
        )
    }
}

/// Terminal errors of an assessment session operation.
///
/// All of these are recoverable by reloading the assessment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("not logged in: no authentication token found, please log in again")]
    AuthenticationMissing,

    #[error("authentication failed, please log in again ({0})")]
    AuthenticationFailed(String),

    #[error("you don't have permission to access this assessment ({0})")]
    PermissionDenied(String),

    #[error("failed to load assessment: {0}")]
    LoadFailed(String),

    #[error("assessment already submitted")]
    AlreadySubmitted,

    #[error("no questions available for this assessment")]
    NoQuestions,
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationMissing => SessionError::AuthenticationMissing,
            ApiError::AuthenticationFailed(msg) => SessionError::AuthenticationFailed(msg),
            ApiError::PermissionDenied(msg) => SessionError::PermissionDenied(msg),
            other => SessionError::LoadFailed(other.to_string()),
        }
    }
}

/// Why a question payload produced no questions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The payload is valid JSON but not an array.
    #[error("question payload is JSON but not an array")]
    NotAnArray,

    /// The payload is a JSON array whose elements are not questions.
    #[error("invalid question in JSON payload: {0}")]
    InvalidQuestion(String),

    /// The payload is text but no block had a prompt, options and answer.
    #[error("no well-formed question blocks ({dropped} malformed block(s) dropped)")]
    NoWellFormedBlocks { dropped: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_distinct_load_errors() {
        assert_eq!(
            SessionError::from(ApiError::AuthenticationMissing),
            SessionError::AuthenticationMissing
        );
        assert!(matches!(
            SessionError::from(ApiError::AuthenticationFailed("expired".into())),
            SessionError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            SessionError::from(ApiError::PermissionDenied("nope".into())),
            SessionError::PermissionDenied(_)
        ));
        let err = SessionError::from(ApiError::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(matches!(&err, SessionError::LoadFailed(m) if m.contains("HTTP 500")));
        assert!(matches!(
            SessionError::from(ApiError::Timeout(30)),
            SessionError::LoadFailed(_)
        ));
    }

    #[test]
    fn auth_classification() {
        assert!(ApiError::AuthenticationMissing.is_auth());
        assert!(ApiError::AuthenticationFailed(String::new()).is_auth());
        assert!(!ApiError::PermissionDenied(String::new()).is_auth());
        assert!(!ApiError::Network("reset".into()).is_auth());
    }
}
