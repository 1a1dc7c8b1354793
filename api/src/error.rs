use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a request was stopped by the auth pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("Authentication required")]
    MissingCredential,
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
    #[error("Insufficient permissions")]
    InsufficientRole,
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::MissingCredential => StatusCode::UNAUTHORIZED,
            AuthRejection::InvalidOrExpiredToken | AuthRejection::InsufficientRole => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Auth(#[from] AuthRejection),
    #[error(transparent)]
    JsonBody(#[from] JsonRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
    #[error(transparent)]
    Path(#[from] PathRejection),
    #[error("invalid email or password")]
    LoginFail,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Sqlx(e) => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        // SQLite reports no constraint name, only "table.column".
                        let on_email = db_err
                            .constraint()
                            .is_some_and(|c| c.contains("email"))
                            || db_err.message().contains("users.email");
                        let message = if on_email {
                            "Email already exists"
                        } else {
                            "Record already exists"
                        };
                        return (StatusCode::CONFLICT, Json(json!({ "error": message })))
                            .into_response();
                    }
                    if db_err.is_foreign_key_violation() {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "Referenced record does not exist"})),
                        )
                            .into_response();
                    }
                }
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::PasswordHash(e) => {
                tracing::error!(error = %e, "password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password hashing error".to_string(),
                )
            }
            AppError::Jwt(e) => {
                tracing::error!(error = %e, "token signing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Token error".to_string())
            }
            AppError::Join(e) => {
                tracing::error!(error = %e, "blocking task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Auth(rejection) => return rejection.into_response(),
            AppError::JsonBody(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "rejected request body");
                let message = if rejection.status() == StatusCode::UNSUPPORTED_MEDIA_TYPE {
                    "Expected a JSON request body"
                } else {
                    "Invalid request body"
                };
                (rejection.status(), message.to_string())
            }
            AppError::Query(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "rejected query string");
                (StatusCode::BAD_REQUEST, "Invalid query parameters".to_string())
            }
            AppError::Path(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "rejected path parameter");
                (rejection.status(), "Invalid path parameter".to_string())
            }
            AppError::LoginFail => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
