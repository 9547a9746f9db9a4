use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] Box<surrealdb::Error>),

    #[error("Maintenance record not found")]
    MaintenanceRecordNotFound,

    #[error("Fuel record not found")]
    FuelRecordNotFound,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid date: {0} (expected DD/MM/YYYY or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid date range: start ({start}) must not be after end ({end})")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid odometer reading: {0} must be non-negative")]
    InvalidOdometer(i32),

    #[error("Invalid monetary value: {0} must be between 0 and 10000000")]
    InvalidMonetaryValue(String),

    #[error("Invalid fuel volume: {0} liters must be at least 0.01 and at most 10000")]
    InvalidLiters(String),
}

// Helper conversion to avoid .map_err(Box::new) everywhere
impl From<surrealdb::Error> for AppError {
    fn from(err: surrealdb::Error) -> Self {
        AppError::Database(Box::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::MaintenanceRecordNotFound | AppError::FuelRecordNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::MissingField(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidDateRange { .. }
            | AppError::InvalidOdometer(_)
            | AppError::InvalidMonetaryValue(_)
            | AppError::InvalidLiters(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
