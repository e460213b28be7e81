pub mod health;
pub mod hit;
pub mod stats;

use crate::error::AppError;

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
