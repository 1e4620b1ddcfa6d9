use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorBody;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No image provided")]
    MissingImage,

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Please wait {wait_secs} seconds before trying again")]
    RateLimited { wait_secs: u64 },

    #[error("API key not configured. Please add {0} to your .env file")]
    MissingCredential(String),

    #[error("{message}")]
    ModelsExhausted { status: Option<u16>, message: String },

    #[error("No response from API. The model may have blocked the request.")]
    NoCandidates,

    #[error("No solution text received from API")]
    NoSolutionText,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingImage | RelayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            RelayError::ModelsExhausted { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            RelayError::MissingCredential(_)
            | RelayError::NoCandidates
            | RelayError::NoSolutionText
            | RelayError::MalformedResponse(_)
            | RelayError::ConfigError(_)
            | RelayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message() {
        let err = RelayError::RateLimited { wait_secs: 2 };
        assert_eq!(err.to_string(), "Please wait 2 seconds before trying again");
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_exhausted_status_propagation() {
        let err = RelayError::ModelsExhausted {
            status: Some(404),
            message: "model not found".into(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "model not found");

        let err = RelayError::ModelsExhausted {
            status: None,
            message: "All API models failed".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_exhausted_success_status_is_not_surfaced() {
        let err = RelayError::ModelsExhausted {
            status: Some(200),
            message: "invalid json".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_credential_and_input_statuses() {
        let err = RelayError::MissingCredential("VITE_GOOGLE_API_KEY".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("VITE_GOOGLE_API_KEY"));
        assert_eq!(RelayError::MissingImage.status_code(), StatusCode::BAD_REQUEST);
    }
}
