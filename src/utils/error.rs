use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

use crate::database::StoreError;
use crate::services::token_service::TokenError;

/// Every failure a request can end in.
///
/// The JSON bodies keep the shapes clients of the original API expect; only
/// the status codes differ.
#[derive(Debug)]
pub enum AppError {
    MissingToken,
    InvalidToken(TokenError),
    UnknownIdentity,
    EmailExists,
    PasswordMismatch,
    EmailNotFound,
    WrongPassword,
    NoResults,
    NotFound,
    BadRequest(String),
    Store(StoreError),
    Hash(String),
    Token(String),
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingToken => write!(f, "Token Undefined!"),
            AppError::InvalidToken(e) => write!(f, "{}", e),
            AppError::UnknownIdentity => write!(f, "Token does not belong to a user"),
            AppError::EmailExists => write!(f, "Email already exists"),
            AppError::PasswordMismatch => write!(f, "Password not match"),
            AppError::EmailNotFound => write!(f, "Email not exists"),
            AppError::WrongPassword => write!(f, "Password not match"),
            AppError::NoResults => write!(f, "Result Not Found"),
            AppError::NotFound => write!(f, "data not found"),
            AppError::BadRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Hash(msg) => write!(f, "Password hashing error: {}", msg),
            AppError::Token(msg) => write!(f, "Token error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey(_) => AppError::EmailExists,
            other => AppError::Store(other),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Hash(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken
            | AppError::InvalidToken(_)
            | AppError::UnknownIdentity
            | AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::EmailExists => StatusCode::CONFLICT,
            AppError::PasswordMismatch | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::EmailNotFound | AppError::NoResults | AppError::NotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Store(_) | AppError::Hash(_) | AppError::Token(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::MissingToken
            | AppError::EmailExists
            | AppError::PasswordMismatch => json!({ "message": self.to_string() }),
            AppError::InvalidToken(e) => json!({ "valid": false, "message": e.to_string() }),
            AppError::UnknownIdentity => json!({ "valid": false }),
            AppError::EmailNotFound | AppError::WrongPassword => json!({ "msg": self.to_string() }),
            AppError::NoResults => json!({ "success": false, "msg": self.to_string() }),
            AppError::NotFound => json!({ "success": false, "message": self.to_string() }),
            AppError::BadRequest(_)
            | AppError::Store(_)
            | AppError::Hash(_)
            | AppError::Token(_)
            | AppError::Config(_) => json!({ "success": false, "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
