// web-server/src/error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::ErrorResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS or timeout failure talking to an upstream service
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered, but not with what we expected
    #[error("{0}")]
    Protocol(String),

    #[error("{service} returned status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    /// No cached identity or privilege token for this session
    #[error("{0}")]
    MissingToken(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Transport {
            context: context.into(),
            source,
        }
    }

    /// Classify a reqwest failure: body decoding is a protocol error, everything else transport
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Protocol(format!("{}: {}", context, err))
        } else {
            ApiError::transport(context, err)
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken(_) | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = self.status_code();
        let message = match self {
            ApiError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(code).json(ErrorResponse {
            error: message,
            code: code.as_u16(),
        })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::from_reqwest("Upstream request failed", err)
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ApiError::Unauthorized(format!("Invalid token: {}", err))
    }
}
