//! HTTP plumbing shared by the provider implementations.

use docchat_core::GenerationError;
use std::time::Duration;
use tracing::warn;

/// Build a client with the given request timeout.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Map a transport failure.
pub(crate) fn transport_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout(e.to_string())
    } else {
        GenerationError::Network(e.to_string())
    }
}

/// Map a non-success HTTP status to a generation error.
pub(crate) fn status_error(status: u16, body: String, model: &str) -> GenerationError {
    match status {
        429 => GenerationError::RateLimited {
            retry_after_secs: 5,
        },
        401 | 403 => GenerationError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        404 => GenerationError::ModelNotFound(model.to_string()),
        _ => GenerationError::ApiError {
            status_code: status,
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(429, String::new(), "m"),
            GenerationError::RateLimited { .. }
        ));
        assert!(matches!(
            status_error(401, String::new(), "m"),
            GenerationError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error(403, String::new(), "m"),
            GenerationError::AuthenticationFailed(_)
        ));
        match status_error(404, String::new(), "gemini-x") {
            GenerationError::ModelNotFound(model) => assert_eq!(model, "gemini-x"),
            other => panic!("unexpected {other:?}"),
        }
        match status_error(500, "boom".into(), "m") {
            GenerationError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
