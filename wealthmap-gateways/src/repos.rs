use std::convert::TryFrom;

use wealthmap_boundary as json;
use wealthmap_core::{
    entities::*,
    repositories::{Error as RepoError, *},
};

use crate::{backend::BackendClient, error::Error, query::Query};

type RepoResult<T> = std::result::Result<T, RepoError>;

const PROPERTIES: &str = "properties";
const BOOKMARKS: &str = "bookmarks";
const USERS: &str = "users";
const PERMISSIONS: &str = "permissions";
const COMPANIES: &str = "companies";
const INVITES: &str = "employee_invites";
const ACTIVITIES: &str = "user_activity";

fn by_id(id: &str) -> Query {
    Query::new().select("*").eq("id", id)
}

fn convert<R, T>(row: R) -> RepoResult<T>
where
    T: TryFrom<R, Error = json::ConversionError>,
{
    T::try_from(row).map_err(|err| Error::from(err).into())
}

fn convert_all<R, T>(rows: Vec<R>) -> RepoResult<Vec<T>>
where
    T: TryFrom<R, Error = json::ConversionError>,
{
    rows.into_iter().map(convert).collect()
}

/// Unusable property rows are skipped instead of failing the whole map.
fn valid_properties(rows: Vec<json::PropertyRow>) -> Vec<Property> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            Property::try_from(row)
                .map_err(|err| log::warn!("Skipping property {id}: {err}"))
                .ok()
        })
        .collect()
}

impl BackendClient {
    fn get_row<R, T>(&self, table: &str, id: &str) -> RepoResult<T>
    where
        R: serde::de::DeserializeOwned,
        T: TryFrom<R, Error = json::ConversionError>,
    {
        let row: R = self
            .select_one(table, by_id(id))?
            .ok_or(RepoError::NotFound)?;
        convert(row)
    }

    fn update_row<R: serde::Serialize>(&self, table: &str, id: &str, row: &R) -> RepoResult<()> {
        match self.update(table, &Query::new().eq("id", id), row)? {
            0 => Err(RepoError::NotFound),
            _ => Ok(()),
        }
    }
}

impl PropertyRepo for BackendClient {
    fn get_property(&self, id: &str) -> RepoResult<Property> {
        self.get_row::<json::PropertyRow, _>(PROPERTIES, id)
    }

    fn properties_in_bbox(&self, bbox: &MapBbox) -> RepoResult<Vec<Property>> {
        let mut query = Query::new()
            .select("*")
            .gte("coordinates->lat", bbox.south())
            .lte("coordinates->lat", bbox.north());
        // Boxes across the antimeridian are filtered client side.
        if !bbox.crosses_antimeridian() {
            query = query
                .gte("coordinates->lng", bbox.west())
                .lte("coordinates->lng", bbox.east());
        }
        let rows = self.select(PROPERTIES, &query)?;
        Ok(valid_properties(rows))
    }

    fn query_properties(&self, query: &PropertyQuery) -> RepoResult<Vec<Property>> {
        let PropertyQuery {
            address_contains,
            zip_code,
        } = query;
        let mut q = Query::new().select("*");
        if let Some(text) = address_contains {
            q = q.ilike_contains("address", text);
        }
        if let Some(zip_code) = zip_code {
            q = q.eq("zip_code", zip_code);
        }
        let rows = self.select(PROPERTIES, &q.order_asc("address"))?;
        Ok(valid_properties(rows))
    }

    fn count_properties(&self) -> RepoResult<usize> {
        Ok(self.count(PROPERTIES, Query::new())?)
    }
}

impl BookmarkRepo for BackendClient {
    fn create_bookmark(&self, bookmark: &Bookmark) -> RepoResult<()> {
        Ok(self.insert(BOOKMARKS, &json::BookmarkRow::from(bookmark.clone()))?)
    }

    fn try_get_bookmark(&self, user_id: &str, property_id: &str) -> RepoResult<Option<Bookmark>> {
        let query = Query::new()
            .select("*")
            .eq("user_id", user_id)
            .eq("property_id", property_id);
        let row: Option<json::BookmarkRow> = self.select_one(BOOKMARKS, query)?;
        Ok(row.map(Into::into))
    }

    fn delete_bookmark(&self, user_id: &str, property_id: &str) -> RepoResult<()> {
        let query = Query::new()
            .eq("user_id", user_id)
            .eq("property_id", property_id);
        Ok(self.delete(BOOKMARKS, &query)?)
    }

    fn bookmarks_of_user(&self, user_id: &str) -> RepoResult<Vec<Bookmark>> {
        self.bookmarks_of_users(&[user_id])
    }

    fn bookmarks_of_users(&self, user_ids: &[&str]) -> RepoResult<Vec<Bookmark>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = Query::new()
            .select("*")
            .is_in("user_id", user_ids)
            .order_desc("created_at");
        let rows: Vec<json::BookmarkRow> = self.select(BOOKMARKS, &query)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl UserRepo for BackendClient {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        Ok(self.insert(USERS, &json::UserRow::from(user.clone()))?)
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        self.update_row(USERS, user.id.as_str(), &json::UserRow::from(user.clone()))
    }

    fn get_user(&self, id: &str) -> RepoResult<User> {
        self.get_row::<json::UserRow, _>(USERS, id)
    }

    fn users_of_company(&self, company_id: &str) -> RepoResult<Vec<User>> {
        let query = Query::new()
            .select("*")
            .eq("company_id", company_id)
            .order_asc("email");
        let rows: Vec<json::UserRow> = self.select(USERS, &query)?;
        convert_all(rows)
    }
}

impl PermissionRepo for BackendClient {
    fn create_permission(&self, permission: &Permission) -> RepoResult<()> {
        Ok(self.insert(PERMISSIONS, &json::PermissionRow::from(permission.clone()))?)
    }

    fn update_permission(&self, permission: &Permission) -> RepoResult<()> {
        self.update_row(
            PERMISSIONS,
            permission.id.as_str(),
            &json::PermissionRow::from(permission.clone()),
        )
    }

    fn try_get_permission_of_user(&self, user_id: &str) -> RepoResult<Option<Permission>> {
        let query = Query::new()
            .select("*")
            .eq("user_id", user_id)
            .order_desc("updated_at");
        let row: Option<json::PermissionRow> = self.select_one(PERMISSIONS, query)?;
        row.map(convert).transpose()
    }

    fn delete_permissions_of_user(&self, user_id: &str) -> RepoResult<()> {
        Ok(self.delete(PERMISSIONS, &Query::new().eq("user_id", user_id))?)
    }
}

impl CompanyRepo for BackendClient {
    fn create_company(&self, company: &Company) -> RepoResult<()> {
        Ok(self.insert(COMPANIES, &json::CompanyRow::from(company.clone()))?)
    }

    fn update_company(&self, company: &Company) -> RepoResult<()> {
        self.update_row(
            COMPANIES,
            company.id.as_str(),
            &json::CompanyRow::from(company.clone()),
        )
    }

    fn get_company(&self, id: &str) -> RepoResult<Company> {
        self.get_row::<json::CompanyRow, _>(COMPANIES, id)
    }
}

impl InviteRepo for BackendClient {
    fn create_invite(&self, invite: &EmployeeInvite) -> RepoResult<()> {
        Ok(self.insert(INVITES, &json::InviteRow::from(invite.clone()))?)
    }

    fn update_invite(&self, invite: &EmployeeInvite) -> RepoResult<()> {
        self.update_row(
            INVITES,
            invite.id.as_str(),
            &json::InviteRow::from(invite.clone()),
        )
    }

    fn get_invite(&self, id: &str) -> RepoResult<EmployeeInvite> {
        self.get_row::<json::InviteRow, _>(INVITES, id)
    }

    fn invites_of_company(&self, company_id: &str) -> RepoResult<Vec<EmployeeInvite>> {
        let query = Query::new()
            .select("*")
            .eq("company_id", company_id)
            .order_desc("created_at");
        let rows: Vec<json::InviteRow> = self.select(INVITES, &query)?;
        convert_all(rows)
    }
}

impl ActivityRepo for BackendClient {
    fn create_activity(&self, activity: &Activity) -> RepoResult<()> {
        Ok(self.insert(ACTIVITIES, &json::ActivityRow::from(activity.clone()))?)
    }

    fn activities_of_user(&self, user_id: &str, pagination: &Pagination) -> RepoResult<Vec<Activity>> {
        let query = Query::new()
            .select("*")
            .eq("user_id", user_id)
            .order_desc("timestamp")
            .paginate(pagination);
        let rows: Vec<json::ActivityRow> = self.select(ACTIVITIES, &query)?;
        convert_all(rows)
    }

    fn count_activities(&self, user_ids: &[&str], action: ActivityType) -> RepoResult<usize> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let query = Query::new()
            .is_in("user_id", user_ids)
            .eq("action", action);
        Ok(self.count(ACTIVITIES, query)?)
    }
}
