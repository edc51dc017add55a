use thiserror::Error;

use crate::gateway::GatewayError;
use crate::repository::RepositoryError;

pub mod eligibility;
pub mod payment_plan;
pub mod payments;
pub mod pricing;
pub mod quotes;
pub mod webhooks;

/// Result alias used by every service operation.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// The addressed record does not exist or is not visible to the caller.
    #[error("not found")]
    NotFound,
    /// The operation conflicts with the record's current state.
    #[error("{0}")]
    Conflict(String),
    /// The request payload was rejected.
    #[error("invalid request: {0}")]
    Form(String),
    /// Catalog or payment-option data is broken; never silently defaulted.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The external gateway failed; retryable, state left as it was.
    #[error("payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conversion(message) => Self::Configuration(message),
            other => Self::Repository(other),
        }
    }
}
