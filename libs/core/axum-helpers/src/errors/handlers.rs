use super::AppError;

/// Fallback handler for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("The requested resource was not found".to_string())
}
