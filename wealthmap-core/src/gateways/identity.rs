use thiserror::Error;

use crate::entities::*;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid credentials")]
    Credentials,
    #[error("Not signed in")]
    NotSignedIn,
    #[error("The second factor could not be verified")]
    SecondFactor,
    #[error("The user already exists")]
    UserExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Session and user management of the hosted auth service.
///
/// Exactly one implementation is wired into an application.
pub trait IdentityGateway {
    /// The session of the signed-in user, if any and not expired.
    fn current_session(&self) -> Option<Session>;
    fn sign_in(&self, email: &EmailAddress, password: &str) -> Result<Session>;
    /// Registers a new identity and returns its subject id.
    fn sign_up(&self, email: &EmailAddress, password: &str) -> Result<Id>;
    fn sign_out(&self) -> Result<()>;
    fn enroll_second_factor(&self) -> Result<MfaEnrollment>;
    /// Returns the id of the created challenge.
    fn challenge_second_factor(&self, factor_id: &str) -> Result<Id>;
    fn verify_second_factor(&self, factor_id: &str, challenge_id: &str, code: &str)
        -> Result<Session>;
}
