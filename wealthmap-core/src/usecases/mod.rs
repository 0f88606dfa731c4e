mod accept_invite;
mod activity;
mod bookmarks;
mod change_employee_role;
mod company;
mod dashboard_stats;
mod employees;
mod error;
mod invite_employee;
mod notification_prefs;
mod register_company;
mod resolve_actor;
mod revoke_employee;
mod search_properties;
mod second_factor;
mod sign_in;

/// In-memory test doubles, also used by the tests of dependent crates.
#[cfg(any(test, feature = "test-doubles"))]
pub mod tests;

pub use self::{
    accept_invite::*, activity::*, bookmarks::*, change_employee_role::*, company::*,
    dashboard_stats::*, employees::*, error::Error, invite_employee::*, notification_prefs::*,
    register_company::*, resolve_actor::*, revoke_employee::*, search_properties::*,
    second_factor::*, sign_in::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{
        authorization::{Action, Actor, Owner, Policy, Resource},
        db::*,
        entities::*,
        repositories::*,
    };
}
