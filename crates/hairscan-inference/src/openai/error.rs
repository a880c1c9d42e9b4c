//! OpenAI-specific error handling.

use hairscan_core::Error;

use super::types::OpenAIErrorResponse;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether a later attempt could succeed. Reported in logs only; the
    /// client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::ServerError)
    }
}

/// Build a transport error from a non-success response.
///
/// `body` is the raw response text; when it is an OpenAI error document its
/// message is used, otherwise the (trimmed) body itself.
pub fn to_transport_error(status: reqwest::StatusCode, body: &str) -> (OpenAIErrorCode, Error) {
    let parsed = serde_json::from_str::<OpenAIErrorResponse>(body).ok();
    let error_type = parsed
        .as_ref()
        .and_then(|p| p.error.code.clone().or_else(|| p.error.error_type.clone()))
        .unwrap_or_default();
    let code = OpenAIErrorCode::from_response(status.as_u16(), &error_type);

    let reason = status.canonical_reason().unwrap_or("Unknown status");
    let message = match parsed {
        Some(p) => format!("{}: {}", reason, p.error.message),
        None if body.trim().is_empty() => reason.to_string(),
        None => format!(
            "{}: {}",
            reason,
            crate::extraction::excerpt(body.trim(), hairscan_core::defaults::EXCERPT_CHARS)
        ),
    };

    (code, Error::transport(Some(status.as_u16()), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_code_from_401() {
        let code = OpenAIErrorCode::from_response(401, "invalid_api_key");
        assert_eq!(code, OpenAIErrorCode::AuthenticationError);
    }

    #[test]
    fn test_error_code_from_429() {
        let code = OpenAIErrorCode::from_response(429, "rate_limit_exceeded");
        assert_eq!(code, OpenAIErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_error_code_from_404() {
        let code = OpenAIErrorCode::from_response(404, "model_not_found");
        assert_eq!(code, OpenAIErrorCode::ModelNotFound);
    }

    #[test]
    fn test_error_code_context_length() {
        let code = OpenAIErrorCode::from_response(400, "context_length_exceeded");
        assert_eq!(code, OpenAIErrorCode::ContextLengthExceeded);
    }

    #[test]
    fn test_error_code_from_502() {
        let code = OpenAIErrorCode::from_response(502, "bad_gateway");
        assert_eq!(code, OpenAIErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        let code = OpenAIErrorCode::from_response(418, "im_a_teapot");
        assert_eq!(code, OpenAIErrorCode::Unknown);
    }

    #[test]
    fn test_retryable() {
        assert!(OpenAIErrorCode::RateLimitExceeded.is_retryable());
        assert!(OpenAIErrorCode::ServerError.is_retryable());
        assert!(!OpenAIErrorCode::AuthenticationError.is_retryable());
        assert!(!OpenAIErrorCode::ModelNotFound.is_retryable());
    }

    #[test]
    fn test_transport_error_from_openai_body() {
        let body = r#"{"error":{"message":"Invalid API key","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        let (code, err) = to_transport_error(StatusCode::UNAUTHORIZED, body);
        assert_eq!(code, OpenAIErrorCode::AuthenticationError);
        match err {
            Error::Transport { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "Unauthorized: Invalid API key");
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_from_plain_body() {
        let (code, err) = to_transport_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(code, OpenAIErrorCode::ServerError);
        assert_eq!(
            err.to_string(),
            "Transport error (HTTP 502): Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_transport_error_from_empty_body() {
        let (_, err) = to_transport_error(StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert_eq!(
            err.to_string(),
            "Transport error (HTTP 500): Internal Server Error"
        );
    }
}
