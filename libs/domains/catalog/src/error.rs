use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Map to an HTTP error, hiding storage details behind `context`.
    ///
    /// The underlying error is logged by [`AppError`], never sent.
    pub fn into_app_error(self, context: &str) -> AppError {
        match self {
            CatalogError::NotFound(_) => AppError::NotFound("Product not found".to_string()),
            err @ CatalogError::Storage(_) => AppError::internal(context, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = CatalogError::NotFound("99".into()).into_app_error("Failed to fetch product");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Product not found"));
    }

    #[test]
    fn test_storage_error_is_hidden_behind_context() {
        let err = CatalogError::Storage("lock poisoned".into())
            .into_app_error("Failed to fetch products");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            AppError::Internal { message, cause } => {
                assert_eq!(message, "Failed to fetch products");
                assert!(cause.contains("lock poisoned"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
