use crate::{id::*, time::*};

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id          : Id,
    pub user_id     : Id,
    pub property_id : Id,
    pub created_at  : Timestamp,
}
