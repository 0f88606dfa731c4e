use strum::{AsRefStr, Display, EnumString};

use crate::{email::*, id::*, time::*, user::Role};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInvite {
    pub id         : Id,
    pub email      : EmailAddress,
    pub role       : Role,
    pub company_id : Id,
    pub invited_by : Id,
    pub status     : InviteStatus,
    pub created_at : Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InviteStatus {
    #[default]
    Pending,
    Accepted,
    Expired,
}

impl EmployeeInvite {
    pub fn is_pending(&self) -> bool {
        self.status == InviteStatus::Pending
    }
}
