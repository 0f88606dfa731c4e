#[macro_use]
extern crate log;

mod bookmarks;
mod change_employee_role;
mod invite_employee;
mod register_company;
mod revoke_employee;
mod search_properties;
mod sign_in;
mod track;
mod update_settings;

pub mod prelude {
    pub use super::{
        bookmarks::*, change_employee_role::*, invite_employee::*, register_company::*,
        revoke_employee::*, search_properties::*, sign_in::*, update_settings::*,
    };
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use wealthmap_core::{
    authorization::{Actor, Policy},
    db::*,
    entities::*,
    gateways::{identity::IdentityGateway, storage::LogoStorage},
    usecases,
};
