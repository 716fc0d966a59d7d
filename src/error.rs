use thiserror::Error;

/// Service-boundary error taxonomy. Domain errors carry an HTTP-ish status
/// code for the embedding layer; everything else folds into `Internal` and
/// surfaces as a generic server error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("no active relation between trainer and client")]
    NoActiveRelation,

    #[error("invite token is invalid or already used")]
    InvalidInvite,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::NoActiveRelation => 403,
            AppError::InvalidInvite => 400,
            AppError::Validation(_) => 400,
            AppError::Internal(_) => 500,
        }
    }
}
