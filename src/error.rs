use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing caller input.
    #[error("{0}")]
    Validation(String),
    /// Duplicate rating for the same (user, movie) pair.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("User already exists")]
    UserExists,
    #[error("Bad email or password")]
    BadCredentials,
    #[error("Missing or invalid bearer token")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    /// The metadata provider answered with an error status. Its status and
    /// JSON body are forwarded verbatim.
    #[error("provider returned status {status}")]
    Upstream { status: StatusCode, body: Value },
    /// No response from the provider at all (timeout, DNS, refused).
    #[error("{0}")]
    Unavailable(&'static str),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => error_body(StatusCode::BAD_REQUEST, &msg),
            AppError::Conflict(msg) => error_body(StatusCode::CONFLICT, &msg),
            AppError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, &msg),
            AppError::Upstream { status, body } => (status, Json(body)).into_response(),
            AppError::Unavailable(msg) => error_body(StatusCode::BAD_GATEWAY, msg),
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            },
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            },
            // The auth surface reports failures under a "msg" field.
            auth => {
                let status = match auth {
                    AppError::MissingCredentials | AppError::UserExists => StatusCode::BAD_REQUEST,
                    AppError::UserNotFound => StatusCode::NOT_FOUND,
                    _ => StatusCode::UNAUTHORIZED,
                };
                msg_body(status, &auth.to_string())
            },
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn msg_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "msg": message }))).into_response()
}

pub type AppResult<T> = Result<T, AppError>;
