// Low-level data access traits.
// Each repository is responsible for a single backend table.
// Related records are only referenced by their id and never
// modified or loaded by another repository.

use crate::entities::*;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// Server side pre-selection of properties.
///
/// Only the cheap, index-friendly predicates are pushed down to the
/// backend; the exact filter semantics are applied by the use case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyQuery {
    pub address_contains: Option<String>,
    pub zip_code: Option<String>,
}

pub trait PropertyRepo {
    fn get_property(&self, id: &str) -> Result<Property>;
    fn properties_in_bbox(&self, bbox: &MapBbox) -> Result<Vec<Property>>;
    fn query_properties(&self, query: &PropertyQuery) -> Result<Vec<Property>>;
    fn count_properties(&self) -> Result<usize>;
}

pub trait BookmarkRepo {
    fn create_bookmark(&self, bookmark: &Bookmark) -> Result<()>;
    fn try_get_bookmark(&self, user_id: &str, property_id: &str) -> Result<Option<Bookmark>>;
    fn delete_bookmark(&self, user_id: &str, property_id: &str) -> Result<()>;
    /// Newest first.
    fn bookmarks_of_user(&self, user_id: &str) -> Result<Vec<Bookmark>>;
    fn bookmarks_of_users(&self, user_ids: &[&str]) -> Result<Vec<Bookmark>>;
}

pub trait UserRepo {
    fn create_user(&self, user: &User) -> Result<()>;
    fn update_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<User>;
    fn try_get_user(&self, id: &str) -> Result<Option<User>> {
        match self.get_user(id) {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
    fn users_of_company(&self, company_id: &str) -> Result<Vec<User>>;
}

pub trait PermissionRepo {
    fn create_permission(&self, permission: &Permission) -> Result<()>;
    fn update_permission(&self, permission: &Permission) -> Result<()>;
    fn try_get_permission_of_user(&self, user_id: &str) -> Result<Option<Permission>>;
    fn delete_permissions_of_user(&self, user_id: &str) -> Result<()>;
}

pub trait CompanyRepo {
    fn create_company(&self, company: &Company) -> Result<()>;
    fn update_company(&self, company: &Company) -> Result<()>;
    fn get_company(&self, id: &str) -> Result<Company>;
}

pub trait InviteRepo {
    fn create_invite(&self, invite: &EmployeeInvite) -> Result<()>;
    fn update_invite(&self, invite: &EmployeeInvite) -> Result<()>;
    fn get_invite(&self, id: &str) -> Result<EmployeeInvite>;
    fn invites_of_company(&self, company_id: &str) -> Result<Vec<EmployeeInvite>>;
}

pub trait ActivityRepo {
    fn create_activity(&self, activity: &Activity) -> Result<()>;
    /// Newest first.
    fn activities_of_user(&self, user_id: &str, pagination: &Pagination) -> Result<Vec<Activity>>;
    fn count_activities(&self, user_ids: &[&str], action: ActivityType) -> Result<usize>;
}
