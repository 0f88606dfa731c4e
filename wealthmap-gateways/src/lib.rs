//! Adapters for the hosted backend: REST tables, auth service and
//! object storage.

mod backend;
mod error;
mod gotrue;
mod query;
mod repos;
mod storage;

pub use self::{
    backend::{BackendClient, BackendConfig, DEFAULT_LOGO_BUCKET, DEFAULT_TIMEOUT},
    error::Error,
    query::Query,
};
