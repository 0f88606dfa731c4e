use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{id::*, time::*};

/// Kinds of user actions that are recorded for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActivityType {
    Login,
    Logout,
    Search,
    ViewProperty,
    CreateReport,
    UpdateReport,
    DeleteReport,
    BookmarkProperty,
    RemoveBookmark,
    UpdateSettings,
    InviteEmployee,
    UpdatePermissions,
    RevokeAccess,
}

pub type ActivityDetails = BTreeMap<String, String>;

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id      : Id,
    pub user_id : Id,
    pub action  : ActivityType,
    pub details : ActivityDetails,
    pub at      : Timestamp,
}
