use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::schemas::Message;

/// A single rejected field of an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub message: String,
    pub errors: Vec<FieldError>,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Inbound payload failed schema checks (HTTP 422)
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// No property with this id (HTTP 404)
    #[error("Property {0} not found")]
    NotFound(i32),

    #[error("Store error: {0}")]
    Store(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, reason)])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Pool(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::Validation(errors) => (
                status,
                Json(ValidationErrorBody {
                    message: "Validation failed".to_string(),
                    errors,
                }),
            )
                .into_response(),
            AppError::NotFound(_) => (status, Json(Message::new("Property not found"))).into_response(),
            internal => {
                error!("Request failed: {:?}", internal);
                (status, Json(Message::new("Internal server error"))).into_response()
            }
        }
    }
}
