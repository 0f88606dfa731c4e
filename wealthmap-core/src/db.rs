use crate::repositories::*;

/// Everything the use cases need from the backend tables.
pub trait Db:
    PropertyRepo + BookmarkRepo + UserRepo + PermissionRepo + CompanyRepo + InviteRepo + ActivityRepo
{
}

impl<T> Db for T where
    T: PropertyRepo
        + BookmarkRepo
        + UserRepo
        + PermissionRepo
        + CompanyRepo
        + InviteRepo
        + ActivityRepo
{
}
