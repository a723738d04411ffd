use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::OrderStatus;

/// A single rejected field in an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("order {0} not found")]
    OrderNotFound(String),
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("cannot cancel order that is {status}")]
    CannotCancel { status: OrderStatus },
    #[error("configuration error: {0}")]
    Config(String),
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } | AppError::CannotCancel { .. } => {
                StatusCode::CONFLICT
            }
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::OrderNotFound(_) => "NOT_FOUND",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::CannotCancel { .. } => "CANNOT_CANCEL",
            AppError::Config(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(details) => ErrorBody {
                code: "VALIDATION_ERROR".to_string(),
                message: "Order validation failed".to_string(),
                details: Some(details),
            },
            // Startup errors never reach a client with their details.
            AppError::Config(_) => ErrorBody {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal error occurred".to_string(),
                details: None,
            },
            other => ErrorBody {
                code: other.code().to_string(),
                message: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
