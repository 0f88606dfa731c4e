//! Persists the signed-in session between invocations of the CLI.

use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wealthmap_core::entities::*;

pub const DEFAULT_SESSION_FILE_NAME: &str = ".wealthmap-session.json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to access session file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Corrupt session file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid email address in session file {0}")]
    Email(PathBuf),
}

#[rustfmt::skip]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct StoredSession {
    access_token  : String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token : Option<String>,
    user_id       : String,
    email         : String,
    /// Unix timestamp in milliseconds.
    expires_at    : i64,
    #[serde(default)]
    multi_factor  : bool,
}

impl From<Session> for StoredSession {
    fn from(from: Session) -> Self {
        let Session {
            access_token,
            refresh_token,
            user_id,
            email,
            expires_at,
            assurance,
        } = from;
        Self {
            access_token,
            refresh_token,
            user_id: user_id.into(),
            email: email.into_string(),
            expires_at: expires_at.as_millis(),
            multi_factor: assurance == Assurance::MultiFactor,
        }
    }
}

pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` if nobody signed in yet or the session expired.
    pub fn load(&self) -> Result<Option<Session>, Error> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let stored: StoredSession = serde_json::from_str(&json).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;
        let StoredSession {
            access_token,
            refresh_token,
            user_id,
            email,
            expires_at,
            multi_factor,
        } = stored;
        let email = email
            .parse()
            .map_err(|_| Error::Email(self.path.clone()))?;
        let session = Session {
            access_token,
            refresh_token,
            user_id: user_id.into(),
            email,
            expires_at: Timestamp::from_millis(expires_at),
            assurance: if multi_factor {
                Assurance::MultiFactor
            } else {
                Assurance::SingleFactor
            },
        };
        if session.is_expired(Timestamp::now()) {
            log::info!("The stored session has expired");
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn save(&self, session: Session) -> Result<(), Error> {
        let stored = StoredSession::from(session);
        let json = serde_json::to_string_pretty(&stored).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Stored session in {}", self.path.display());
        Ok(())
    }

    pub fn remove(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
