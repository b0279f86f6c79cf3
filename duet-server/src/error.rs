use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use duet_core::{ErrorKind, GameError};
use serde::Serialize;
use thiserror::Error;

const LOG_TARGET: &str = "duet_server::error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Invalid guess")]
    IllegalAction,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: ErrorKind,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Game(err) => err.kind(),
            ApiError::IllegalAction => ErrorKind::IllegalAction,
            ApiError::BadRequest(_) | ApiError::Forbidden(_) => ErrorKind::Validation,
        }
    }

    pub fn status(&self) -> StatusCode {
        if let ApiError::Forbidden(_) = self {
            return StatusCode::FORBIDDEN;
        }
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RoomFull | ErrorKind::NotReady => StatusCode::CONFLICT,
            ErrorKind::Validation | ErrorKind::IllegalAction => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            code: self.kind(),
        };
        tracing::debug!(
            target: LOG_TARGET,
            status = status.as_u16(),
            code = %body.code,
            "{}",
            body.error
        );
        (status, Json(body)).into_response()
    }
}
