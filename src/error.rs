use std::time::Duration;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing API key")]
    MissingCredential,

    #[error("upstream connect failed: {0}")]
    UpstreamConnect(String),

    /// Failure after the SSE headers went out. Never mapped to a status.
    #[error("upstream stream failed: {0}")]
    UpstreamStream(String),

    #[error("no upstream data for {0:?}")]
    IdleTimeout(Duration),

    #[error("relay exceeded total duration of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Plain-text body sent to the caller. Details stay in the server log.
    pub fn client_message(&self) -> &'static str {
        match self {
            RelayError::InvalidJson(_) => "Invalid JSON payload",
            RelayError::MissingCredential => "Missing API key",
            RelayError::UpstreamConnect(_) => "Error contacting upstream API",
            RelayError::NotFound => "Not found",
            RelayError::UpstreamStream(_)
            | RelayError::IdleTimeout(_)
            | RelayError::DeadlineExceeded(_)
            | RelayError::Io(_) => "Server error",
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            RelayError::MissingCredential => StatusCode::UNAUTHORIZED,
            RelayError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.client_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            RelayError::from(bad_json).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::MissingCredential.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RelayError::UpstreamConnect("refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(RelayError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_client_message_hides_details() {
        let err = RelayError::UpstreamConnect("tls handshake eof at 10.0.0.7".into());
        assert_eq!(err.client_message(), "Error contacting upstream API");
        assert!(err.to_string().contains("tls handshake"));
    }
}
