use num_derive::{FromPrimitive, ToPrimitive};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{email::*, id::*, time::*};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id                 : Id,
    pub email              : EmailAddress,
    pub company_id         : Option<Id>,
    pub notification_prefs : NotificationPrefs,
    pub created_at         : Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub sms: bool,
    pub email: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            sms: false,
            email: true,
        }
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive, ToPrimitive, EnumIter, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Employee = 0,
    Admin    = 1,
}

impl Default for Role {
    fn default() -> Role {
        Role::Employee
    }
}

/// The role assignment of a user, stored separately from the user record.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id         : Id,
    pub user_id    : Id,
    pub role       : Role,
    pub updated_at : Timestamp,
}
