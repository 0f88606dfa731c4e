//! # wealthmap-core
//!
//! Business rules of WealthMap: the map view controller with its
//! clustering and marker lifecycle, the authorization policy,
//! repository and gateway abstractions, and the use cases built on top.
//!
//! Nothing in here performs I/O. Backends, identity providers and map
//! widgets are plugged in through traits.

pub mod authorization;
pub mod bbox;
pub mod clustering;
pub mod db;
pub mod gateways;
pub mod map;
pub mod repositories;
pub mod routes;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use wealthmap_entities::{
        activity::*, bookmark::*, company::*, email::*, geo::*, id::*, invite::*, property::*,
        session::*, time::*, url::Url, user::*,
    };
}
