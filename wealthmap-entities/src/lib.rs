#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # wealthmap-entities
//!
//! Reusable, agnostic domain entities for WealthMap.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod activity;
pub mod bookmark;
pub mod company;
pub mod email;
pub mod geo;
pub mod id;
pub mod invite;
pub mod property;
pub mod session;
pub mod time;
pub mod user;
pub mod url {
    pub use url::{ParseError, Url};
}

#[cfg(any(test, feature = "builders"))]
pub mod builders;
