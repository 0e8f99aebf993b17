use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Project not found")]
    ProjectNotFound,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Old password is incorrect")]
    InvalidPassword,

    #[error("Email already exists")]
    EmailExists,

    #[error("Old and new passwords are required")]
    MissingPassword,

    #[error("Refresh token missing")]
    MissingToken,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Session revoked")]
    SessionRevoked,

    #[error("Not authenticated")]
    NotAuthorized,

    #[error("Insufficient permissions")]
    Forbidden,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::Database(DatabaseError::NotFound),
            // 23505: unique_violation, the backstop behind the service-level
            // email existence check
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                AppError::Database(DatabaseError::Duplicate)
            }
            _ => AppError::Database(DatabaseError::Query(err.to_string())),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(DatabaseError::Query(err.to_string()))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Auth(AuthError::TokenExpired)
            }
            _ => AppError::Auth(AuthError::TokenInvalid),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Stable machine-readable code carried in every error response.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(e) => match e {
                AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
                AuthError::InvalidPassword => "INVALID_PASSWORD",
                AuthError::EmailExists => "EMAIL_EXIST",
                AuthError::MissingPassword => "MISSING_PASSWORD",
                AuthError::MissingToken => "MISSING_TOKEN",
                AuthError::TokenInvalid => "TOKEN_INVALID",
                AuthError::TokenExpired => "TOKEN_EXPIRED",
                AuthError::SessionRevoked => "SESSION_REVOKED",
                AuthError::NotAuthorized => "NOT_AUTHORIZED",
                AuthError::Forbidden => "FORBIDDEN",
            },
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::ProjectNotFound => "PROJECT_NOT_FOUND",
            AppError::Database(DatabaseError::NotFound) => "NOT_FOUND",
            AppError::Database(DatabaseError::Duplicate) => "DUPLICATE",
            _ => "SYSTEM_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Server-side failures are logged in full but surfaced opaquely.
        let message = if status.is_server_error() {
            error!("internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let response = json!({
            "message": message,
            "statusCode": status.as_u16(),
            "errorCode": self.error_code(),
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
                AuthError::EmailExists => StatusCode::BAD_REQUEST,
                AuthError::MissingPassword => StatusCode::BAD_REQUEST,
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,
                AuthError::NotAuthorized => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::ProjectNotFound => StatusCode::NOT_FOUND,
            AppError::Database(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Database(DatabaseError::Duplicate) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
