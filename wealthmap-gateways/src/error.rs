use thiserror::Error;
use wealthmap_core::{gateways::identity, repositories};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Backend configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Backend responded with {status}: {body}")]
    Api { status: u16, body: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Conversion(#[from] wealthmap_boundary::ConversionError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<Error> for repositories::Error {
    fn from(err: Error) -> Self {
        match err.status() {
            Some(404) => Self::NotFound,
            Some(409) => Self::AlreadyExists,
            _ => Self::Other(err.into()),
        }
    }
}

impl From<Error> for identity::Error {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::Api { body, .. } => body.to_lowercase(),
            _ => String::new(),
        };
        match err.status() {
            Some(400) if message.contains("credentials") => Self::Credentials,
            Some(400 | 422) if message.contains("already registered") => Self::UserExists,
            Some(401) => Self::NotSignedIn,
            _ => Self::Other(err.into()),
        }
    }
}
