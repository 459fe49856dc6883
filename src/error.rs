use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("User no longer exists or is inactive")]
    UserNotFound,

    #[error("Not authorized to access this receipt")]
    Forbidden,

    #[error("Not Found")]
    NotFound,

    #[error("{0} already registered")]
    DuplicateUser(String),

    #[error("Receipt must contain at least one line item")]
    EmptyReceipt,

    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    #[error("Payment amount is less than the receipt total")]
    InsufficientPayment,

    #[error("Payment amount must equal the receipt total for cashless payments")]
    AmountMismatch,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code surfaced next to the human message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::Forbidden => "forbidden",
            AppError::NotFound => "not_found",
            AppError::DuplicateUser(_) => "duplicate_user",
            AppError::EmptyReceipt => "empty_receipt",
            AppError::InvalidLineItem(_) => "invalid_line_item",
            AppError::InsufficientPayment => "insufficient_payment",
            AppError::AmountMismatch => "amount_mismatch",
            AppError::DbError(_) => "persistence_error",
            AppError::OrmError(_) => "persistence_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::EmptyReceipt
            | AppError::InvalidLineItem(_)
            | AppError::InsufficientPayment
            | AppError::AmountMismatch => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::UserNotFound => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateUser(_) => StatusCode::CONFLICT,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    code: &'static str,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                code: self.code(),
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

pub type AppResult<T> = Result<T, AppError>;
