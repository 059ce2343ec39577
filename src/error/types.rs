// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted payload could not be read back as a ranked sequence
    #[error("Corrupt ranking payload: {0}")]
    Corrupt(String),

    /// Search/import provider failure, message is meant for the user
    #[error("{0}")]
    Provider(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(format!("Network error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;

    #[test]
    fn test_serializes_as_display_string() {
        let err = AppError::Provider("User not found.".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"User not found.\"");
    }

    #[test]
    fn test_domain_errors_convert() {
        let err: AppError = DomainError::Duplicate(ItemId::Int(1)).into();
        assert!(matches!(err, AppError::Domain(DomainError::Duplicate(_))));
        assert!(err.to_string().contains("already in your list"));
    }
}
