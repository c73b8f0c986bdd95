use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Non autorisé")]
    Unauthorized,

    #[error("Accès refusé")]
    Forbidden,

    #[error("Introuvable : {0}")]
    NotFound(String),

    #[error("Requête invalide : {0}")]
    BadRequest(String),

    #[error("Conflit : {0}")]
    Conflict(String),

    #[error("Erreur de validation : {0}")]
    Validation(String),

    #[error("Trop de requêtes")]
    TooManyRequests,

    #[error("Erreur base de données : {0}")]
    Database(#[from] sqlx::Error),

    #[error("Erreur JWT : {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Erreur interne : {0}")]
    Internal(String),

    #[error("Erreur e-mail : {0}")]
    Email(String),

    #[error("Erreur SMS : {0}")]
    Sms(String),

    #[error("Erreur fichier : {0}")]
    File(String),

    #[error("Code de réinitialisation expiré")]
    CodeExpired,

    #[error("Code de réinitialisation invalide")]
    InvalidCode,

    #[error("Nombre de tentatives dépassé")]
    TooManyAttempts,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_REQUESTS",
                self.to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Erreur base de données".to_string(),
                )
            }
            AppError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Jeton invalide".to_string(),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Erreur interne".to_string(),
                )
            }
            AppError::Email(msg) => (StatusCode::SERVICE_UNAVAILABLE, "EMAIL_ERROR", msg.clone()),
            AppError::Sms(msg) => (StatusCode::SERVICE_UNAVAILABLE, "SMS_ERROR", msg.clone()),
            AppError::File(msg) => (StatusCode::BAD_REQUEST, "FILE_ERROR", msg.clone()),
            AppError::CodeExpired => (StatusCode::BAD_REQUEST, "CODE_EXPIRED", self.to_string()),
            AppError::InvalidCode => (StatusCode::BAD_REQUEST, "INVALID_CODE", self.to_string()),
            AppError::TooManyAttempts => (
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_ATTEMPTS",
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
