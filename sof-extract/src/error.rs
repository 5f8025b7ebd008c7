use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::api::pages;

#[derive(Error, Debug)]
pub enum SofError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for SofError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SofError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            SofError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SofError::Processing(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            SofError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            SofError::Json(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            SofError::Csv(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            SofError::Llm(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            SofError::LlmUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            SofError::LlmRateLimit { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            SofError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Html(pages::error_page(status, &message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SofError>;
