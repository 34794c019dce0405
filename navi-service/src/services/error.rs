use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Username or email already registered")]
    Conflict,

    #[error("File type not allowed")]
    FileType,

    #[error("Bad username/email or password")]
    BadCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Bus {0} not found")]
    BusNotFound(i64),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl ServiceError {
    /// True when a write was refused by a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            ServiceError::Database(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Storage(e) => AppError::InternalError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Validation(msg) => AppError::ValidationError(msg),
            ServiceError::Conflict => AppError::Conflict(anyhow::anyhow!(
                "Username or email already registered"
            )),
            ServiceError::FileType => AppError::FileTypeError("File type not allowed".to_string()),
            ServiceError::BadCredentials => {
                AppError::AuthError(anyhow::anyhow!("Bad username/email or password"))
            }
            ServiceError::InvalidToken => {
                AppError::AuthError(anyhow::anyhow!("Invalid or expired token"))
            }
            ServiceError::BusNotFound(id) => AppError::NotFound(anyhow::anyhow!("Bus {} not found", id)),
            ServiceError::UnknownAction(action) => AppError::UnknownAction(format!(
                "Unknown action or missing parameters: {}",
                action
            )),
        }
    }
}
