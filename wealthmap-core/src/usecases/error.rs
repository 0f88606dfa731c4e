use crate::{authorization, gateways::identity, repositories, routes::Route};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Bounding box is invalid")]
    Bbox,
    #[error("Invalid email address")]
    Email,
    #[error("Invalid ZIP code")]
    ZipCode,
    #[error("The minimum of a filter range is greater than its maximum")]
    FilterRange,
    #[error("The company name must not be empty")]
    CompanyName,
    #[error("The password is too short")]
    Password,
    #[error("The invitation is no longer valid")]
    InviteNotPending,
    #[error("The invitation was issued for a different email address")]
    InviteEmail,
    #[error("The user does not exist")]
    UserDoesNotExist,
    #[error("The user already exists")]
    UserExists,
    #[error("The property does not exist")]
    PropertyDoesNotExist,
    #[error("Invalid credentials")]
    Credentials,
    #[error("The second factor could not be verified")]
    SecondFactor,
    #[error("You are not signed in")]
    NotSignedIn,
    #[error("You are not a member of a company")]
    NoCompany,
    #[error("Admins cannot change their own role or access")]
    OwnAccount,
    #[error("This is not allowed: {0}")]
    Forbidden(#[from] authorization::Error),
    #[error("Gateway error: {0}")]
    Gateway(#[source] anyhow::Error),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl Error {
    /// Missing identity is resolved by navigation rather than by an error message.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::NotSignedIn => Some(Route::Login),
            Self::NoCompany => Some(Route::CompanyRegistration),
            _ => None,
        }
    }
}

impl From<identity::Error> for Error {
    fn from(err: identity::Error) -> Self {
        match err {
            identity::Error::Credentials => Self::Credentials,
            identity::Error::NotSignedIn => Self::NotSignedIn,
            identity::Error::SecondFactor => Self::SecondFactor,
            identity::Error::UserExists => Self::UserExists,
            identity::Error::Other(err) => Self::Gateway(err),
        }
    }
}

impl From<wealthmap_entities::email::EmailAddressParseError> for Error {
    fn from(_: wealthmap_entities::email::EmailAddressParseError) -> Self {
        Self::Email
    }
}

impl From<wealthmap_entities::geo::ParseError> for Error {
    fn from(_: wealthmap_entities::geo::ParseError) -> Self {
        Self::Bbox
    }
}

impl From<crate::util::validate::FilterInvalidation> for Error {
    fn from(err: crate::util::validate::FilterInvalidation) -> Self {
        use crate::util::validate::FilterInvalidation as F;
        match err {
            F::ZipCode => Self::ZipCode,
            F::Range => Self::FilterRange,
        }
    }
}
