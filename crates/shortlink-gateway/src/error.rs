use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortlink_core::{ErrorKind, ShortenerError};
use thiserror::Error;
use tracing::{debug, error};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("stored link is not a valid redirect target: {0}")]
    InvalidRedirect(String),
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRedirect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Shortener(err) => match err.kind() {
                ErrorKind::InvalidLink | ErrorKind::InvalidShortCode => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::GenerateTimeout | ErrorKind::Storage => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Machine readable tag placed in the `error` field of the body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidBody(_) => "invalid_body",
            AppError::InvalidRedirect(_) => "invalid_redirect",
            AppError::Shortener(err) => err.kind().as_str(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "request failed");
        } else {
            debug!(error = %self, kind = self.kind(), "request rejected");
        }

        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
