//! Service layer errors

use shop_common::AppError;
use shop_core::DomainError;

/// Failure of a service operation.
///
/// Ingestion never produces one of these; only detection, dismissal and the
/// retention sweep report errors to their caller.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A repository call failed or returned invalid data
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Wiring or configuration problem surfaced through the shared error type
    #[error(transparent)]
    App(#[from] AppError),

    /// Caller input rejected before any read or write
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP-style status an outer surface would map this to
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) if e.is_validation() => 400,
            Self::Domain(_) => 500,
            Self::App(e) => e.status_code(),
            Self::Validation(_) => 400,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
