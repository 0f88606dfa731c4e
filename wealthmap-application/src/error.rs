use std::io;

use thiserror::Error;
use wealthmap_core::{repositories::Error as RepoError, routes::Route, usecases::Error as ParameterError};

pub use wealthmap_core::repositories;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(BError::Repo(err))
    }
}

impl From<ParameterError> for AppError {
    fn from(err: ParameterError) -> AppError {
        AppError::Business(err.into())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] BError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum BError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl AppError {
    /// Where to navigate instead of showing the error.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Business(BError::Parameter(err)) => err.redirect(),
            _ => None,
        }
    }
}
