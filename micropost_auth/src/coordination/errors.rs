//! Failures of the account and micropost use cases

use thiserror::Error;

use crate::micropost::MicropostError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::UserError;
use crate::utils::UtilError;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Submitted attributes failed validation; the form is shown again
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Unknown email or wrong password. The two are deliberately indistinguishable.
    #[error("Invalid email/password combination")]
    InvalidCredentials,

    /// The acting user may not perform this action
    #[error("Unauthorized access")]
    Unauthorized,

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error(transparent)]
    Users(UserError),

    #[error(transparent)]
    Microposts(MicropostError),

    #[error(transparent)]
    Session(SessionError),

    #[error(transparent)]
    Format(UtilError),
}

impl CoordinationError {
    /// Record the failure at a level matching who caused it, then hand it back.
    ///
    /// Rejections of user input stay at debug; refusals are warnings.
    pub fn log(self) -> Self {
        match &self {
            Self::Validation(errors) => tracing::debug!(%errors, "Rejected submission"),
            Self::InvalidCredentials => tracing::debug!("Sign-in refused"),
            Self::NotFound { resource, id } => tracing::debug!(resource, id, "No such record"),
            Self::Unauthorized => tracing::warn!("Action refused for current user"),
            other => tracing::error!(error = %other, "Use case failed"),
        }
        self
    }

    pub(crate) fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    /// Validation messages, when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CoordinationError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Infrastructure failures are logged once, where they enter this layer.
macro_rules! logged_from {
    ($source:ty => $wrap:expr) => {
        impl From<$source> for CoordinationError {
            fn from(err: $source) -> Self {
                let wrap: fn($source) -> CoordinationError = $wrap;
                wrap(err).log()
            }
        }
    };
}

logged_from!(UserError => CoordinationError::Users);
logged_from!(MicropostError => CoordinationError::Microposts);
logged_from!(SessionError => CoordinationError::Session);
logged_from!(UtilError => CoordinationError::Format);
logged_from!(StorageError => |err| CoordinationError::Storage(err.to_string()));
