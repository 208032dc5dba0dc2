use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

/// Failures surfaced by the account and note services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists!")]
    DuplicateEmail,
    #[error("User not found!")]
    UserNotFound,
    #[error("Invalid credentials!")]
    InvalidCredentials,
    #[error("Note not found!")]
    NoteNotFound,
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UserNotFound | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::NoteNotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `axum::Json` whose body rejections answer as [`AppError::Validation`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), "rejected request body");
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Unwraps a required text field; `None` and `""` both count as absent.
pub fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(message)),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error!".to_string()
            }
            other => other.to_string(),
        };
        (status, axum::Json(json!({ "error": true, "message": message }))).into_response()
    }
}
