//! Outcomes of the account operations that are not a success.

use thiserror::Error;

use crate::auth::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("email already exists")]
    EmailConflict,
    #[error("username already exists")]
    UsernameConflict,
    /// Unknown email and wrong password both end up here.
    #[error("authentication failed")]
    AuthenticationFailed,
    /// Store, hasher or signer fault. Details are logged, not returned.
    #[error("storage error")]
    Storage,
}
