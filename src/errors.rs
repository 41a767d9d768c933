use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as TError;

//-------------------------------------- blob store --------------------------------------
#[derive(TError, Debug)]
pub enum StoreError {
    #[error("object not found")]
    NotFound,

    #[error("object storage request failed: {0}")]
    Backend(anyhow::Error),
}

//-------------------------------------- record store ------------------------------------
#[derive(TError, Debug)]
pub enum RecordError {
    #[error("duplicate username")]
    Duplicate,

    #[error("record store connection failed")]
    Connection(#[from] sqlx::Error),
}

//-------------------------------------- crypto ------------------------------------------
#[derive(TError, Debug)]
pub enum CryptoError {
    #[error("password hashing failed")]
    PasswordHash(#[from] argon2::password_hash::Error),

    #[error("JWT encoding failed")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token rejected")]
    TokenRejected,
}

//-------------------------------------- api ---------------------------------------------
#[derive(TError, Debug)]
pub enum ApiError {
    // -------- Infra --------
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    // -------- Domain --------
    #[error("not found")]
    NotFound,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("conflict")]
    Conflict,

    #[error("bad request: {0}")]
    BadRequest(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // ---------- Blob store ----------
            ApiError::Store(e) => match e {
                StoreError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
                StoreError::Backend(_) => {
                    (StatusCode::BAD_GATEWAY, "upstream failure".to_string())
                }
            },

            // ---------- Record store ----------
            ApiError::Record(e) => match e {
                RecordError::Duplicate => (StatusCode::CONFLICT, "conflict".to_string()),
                RecordError::Connection(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "upstream failure".to_string())
                }
            },

            // ---------- Crypto ----------
            ApiError::Crypto(e) => match e {
                // a credential was presented and failed verification; only a
                // missing/malformed header is a 401
                CryptoError::TokenRejected => (StatusCode::FORBIDDEN, "forbidden".to_string()),
                CryptoError::PasswordHash(_) | CryptoError::Jwt(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
                }
            },

            // ---------- Serialization / config ----------
            ApiError::Serialization(_) | ApiError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }

            // ---------- Domain ----------
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "unauthenticated".to_string())
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            ApiError::Conflict => (StatusCode::CONFLICT, "conflict".to_string()),
            ApiError::BadRequest(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
