use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::errors::{DomainError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Rejected(ValidationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Rejected(v) => AppError::Rejected(v),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::BadRequest(_) => "VALIDATION_ERROR",
            AppError::Rejected(v) => v.code().as_str(),
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn body(&self) -> Value {
        let (message, details) = match self {
            AppError::Rejected(v) => (v.to_string(), v.details()),
            // Never leak storage or computation detail to clients.
            AppError::Internal(_) => ("Internal server error".to_string(), Value::Null),
            other => (other.to_string(), Value::Null),
        };
        json!({
            "error": {
                "code": self.code(),
                "message": message,
                "details": details,
            }
        })
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Rejected(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(msg) = self {
            log::error!("internal error: {}", msg);
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
