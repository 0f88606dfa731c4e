use std::cell::{Cell, RefCell};

use crate::{
    authorization::Actor,
    entities::*,
    gateways::{
        identity::{self, IdentityGateway},
        storage::{LogoStorage, Upload},
    },
    repositories::{Error as RepoError, *},
};

pub use wealthmap_entities::builders::*;

type RepoResult<T> = std::result::Result<T, RepoError>;

trait Key {
    fn key(&self) -> &str;
}

macro_rules! impl_key {
    ($($t:ty),*) => {
        $(impl Key for $t {
            fn key(&self) -> &str {
                self.id.as_str()
            }
        })*
    };
}

impl_key!(Property, Bookmark, User, Permission, Company, EmployeeInvite, Activity);

fn get<T: Clone + Key>(objects: &[T], id: &str) -> RepoResult<T> {
    objects
        .iter()
        .find(|x| x.key() == id)
        .cloned()
        .ok_or(RepoError::NotFound)
}

fn create<T: Clone + Key>(objects: &mut Vec<T>, e: &T) -> RepoResult<()> {
    if objects.iter().any(|x| x.key() == e.key()) {
        return Err(RepoError::AlreadyExists);
    }
    objects.push(e.clone());
    Ok(())
}

fn update<T: Clone + Key>(objects: &mut [T], e: &T) -> RepoResult<()> {
    let x = objects
        .iter_mut()
        .find(|x| x.key() == e.key())
        .ok_or(RepoError::NotFound)?;
    *x = e.clone();
    Ok(())
}

/// The five properties of the demo data set.
pub fn sample_properties() -> Vec<Property> {
    vec![
        Property::build()
            .id("1")
            .address("123 Main St, San Francisco, CA 94105")
            .lat_lng(37.7749, -122.4194)
            .size_sqft(2000)
            .value_usd(1_500_000)
            .owner_name("John Doe LLC")
            .zip_code("94105")
            .wealth_estimate(5_000_000, 0.8)
            .finish(),
        Property::build()
            .id("2")
            .address("456 Market St, San Francisco, CA 94105")
            .lat_lng(37.7895, -122.3999)
            .size_sqft(1800)
            .value_usd(1_300_000)
            .owner_name("Jane Smith Trust")
            .zip_code("94105")
            .wealth_estimate(4_200_000, 0.75)
            .finish(),
        Property::build()
            .id("3")
            .address("789 Howard St, San Francisco, CA 94103")
            .lat_lng(37.7835, -122.3957)
            .size_sqft(2200)
            .value_usd(1_700_000)
            .owner_name("Mission Bay Ventures")
            .zip_code("94103")
            .wealth_estimate(6_500_000, 0.85)
            .finish(),
        Property::build()
            .id("4")
            .address("101 California St, San Francisco, CA 94111")
            .lat_lng(37.7932, -122.3984)
            .size_sqft(3000)
            .value_usd(2_500_000)
            .owner_name("Financial District Partners")
            .zip_code("94111")
            .wealth_estimate(9_000_000, 0.9)
            .finish(),
        Property::build()
            .id("5")
            .address("1 Market St, San Francisco, CA 94105")
            .lat_lng(37.7938, -122.3949)
            .size_sqft(2500)
            .value_usd(2_100_000)
            .owner_name("Embarcadero Holdings")
            .zip_code("94105")
            .wealth_estimate(7_500_000, 0.82)
            .finish(),
    ]
}

#[derive(Debug, Default)]
pub struct MockDb {
    pub properties: RefCell<Vec<Property>>,
    pub bookmarks: RefCell<Vec<Bookmark>>,
    pub users: RefCell<Vec<User>>,
    pub permissions: RefCell<Vec<Permission>>,
    pub companies: RefCell<Vec<Company>>,
    pub invites: RefCell<Vec<EmployeeInvite>>,
    pub activities: RefCell<Vec<Activity>>,
    /// Makes every insert into the activity log fail.
    pub activity_log_broken: Cell<bool>,
}

impl MockDb {
    pub fn with_sample_properties() -> Self {
        let db = Self::default();
        *db.properties.borrow_mut() = sample_properties();
        db
    }

    pub fn add_company(&self, id: &str, name: &str) {
        self.companies.borrow_mut().push(Company {
            id: id.into(),
            name: name.into(),
            logo_url: None,
            data_access: DataAccess::default(),
            created_at: Timestamp::now(),
        });
    }

    /// Creates a user with an optional role and returns it as actor.
    pub fn add_member(&self, user_id: &str, company_id: Option<&str>, role: Option<Role>) -> Actor {
        let mut user = User::build()
            .id(user_id)
            .email(&format!("{user_id}@example.com"))
            .finish();
        user.company_id = company_id.map(Id::from);
        self.users.borrow_mut().push(user.clone());
        if let Some(role) = role {
            self.permissions.borrow_mut().push(Permission {
                id: Id::new(),
                user_id: user.id.clone(),
                role,
                updated_at: Timestamp::now(),
            });
        }
        Actor {
            user_id: user.id,
            email: user.email,
            role,
            company_id: user.company_id,
        }
    }

    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.permissions
            .borrow()
            .iter()
            .find(|p| p.user_id.as_str() == user_id)
            .map(|p| p.role)
    }
}

impl PropertyRepo for MockDb {
    fn get_property(&self, id: &str) -> RepoResult<Property> {
        get(&self.properties.borrow(), id)
    }
    fn properties_in_bbox(&self, bbox: &MapBbox) -> RepoResult<Vec<Property>> {
        Ok(self
            .properties
            .borrow()
            .iter()
            .filter(|p| bbox.contains_point(p.pos))
            .cloned()
            .collect())
    }
    fn query_properties(&self, query: &PropertyQuery) -> RepoResult<Vec<Property>> {
        Ok(self
            .properties
            .borrow()
            .iter()
            .filter(|p| {
                query.address_contains.as_ref().map_or(true, |text| {
                    p.address.to_lowercase().contains(&text.to_lowercase())
                })
            })
            .filter(|p| query.zip_code.as_ref().map_or(true, |zip| &p.zip_code == zip))
            .cloned()
            .collect())
    }
    fn count_properties(&self) -> RepoResult<usize> {
        Ok(self.properties.borrow().len())
    }
}

impl BookmarkRepo for MockDb {
    fn create_bookmark(&self, bookmark: &Bookmark) -> RepoResult<()> {
        if self
            .try_get_bookmark(bookmark.user_id.as_str(), bookmark.property_id.as_str())?
            .is_some()
        {
            return Err(RepoError::AlreadyExists);
        }
        create(&mut self.bookmarks.borrow_mut(), bookmark)
    }
    fn try_get_bookmark(&self, user_id: &str, property_id: &str) -> RepoResult<Option<Bookmark>> {
        Ok(self
            .bookmarks
            .borrow()
            .iter()
            .find(|b| b.user_id.as_str() == user_id && b.property_id.as_str() == property_id)
            .cloned())
    }
    fn delete_bookmark(&self, user_id: &str, property_id: &str) -> RepoResult<()> {
        self.bookmarks
            .borrow_mut()
            .retain(|b| !(b.user_id.as_str() == user_id && b.property_id.as_str() == property_id));
        Ok(())
    }
    fn bookmarks_of_user(&self, user_id: &str) -> RepoResult<Vec<Bookmark>> {
        self.bookmarks_of_users(&[user_id])
    }
    fn bookmarks_of_users(&self, user_ids: &[&str]) -> RepoResult<Vec<Bookmark>> {
        let mut bookmarks: Vec<_> = self
            .bookmarks
            .borrow()
            .iter()
            .filter(|b| user_ids.contains(&b.user_id.as_str()))
            .cloned()
            .collect();
        bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookmarks)
    }
}

impl UserRepo for MockDb {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        create(&mut self.users.borrow_mut(), user)
    }
    fn update_user(&self, user: &User) -> RepoResult<()> {
        update(&mut self.users.borrow_mut(), user)
    }
    fn get_user(&self, id: &str) -> RepoResult<User> {
        get(&self.users.borrow(), id)
    }
    fn users_of_company(&self, company_id: &str) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .filter(|u| u.company_id.as_ref().map(Id::as_str) == Some(company_id))
            .cloned()
            .collect())
    }
}

impl PermissionRepo for MockDb {
    fn create_permission(&self, permission: &Permission) -> RepoResult<()> {
        create(&mut self.permissions.borrow_mut(), permission)
    }
    fn update_permission(&self, permission: &Permission) -> RepoResult<()> {
        update(&mut self.permissions.borrow_mut(), permission)
    }
    fn try_get_permission_of_user(&self, user_id: &str) -> RepoResult<Option<Permission>> {
        Ok(self
            .permissions
            .borrow()
            .iter()
            .find(|p| p.user_id.as_str() == user_id)
            .cloned())
    }
    fn delete_permissions_of_user(&self, user_id: &str) -> RepoResult<()> {
        self.permissions
            .borrow_mut()
            .retain(|p| p.user_id.as_str() != user_id);
        Ok(())
    }
}

impl CompanyRepo for MockDb {
    fn create_company(&self, company: &Company) -> RepoResult<()> {
        create(&mut self.companies.borrow_mut(), company)
    }
    fn update_company(&self, company: &Company) -> RepoResult<()> {
        update(&mut self.companies.borrow_mut(), company)
    }
    fn get_company(&self, id: &str) -> RepoResult<Company> {
        get(&self.companies.borrow(), id)
    }
}

impl InviteRepo for MockDb {
    fn create_invite(&self, invite: &EmployeeInvite) -> RepoResult<()> {
        create(&mut self.invites.borrow_mut(), invite)
    }
    fn update_invite(&self, invite: &EmployeeInvite) -> RepoResult<()> {
        update(&mut self.invites.borrow_mut(), invite)
    }
    fn get_invite(&self, id: &str) -> RepoResult<EmployeeInvite> {
        get(&self.invites.borrow(), id)
    }
    fn invites_of_company(&self, company_id: &str) -> RepoResult<Vec<EmployeeInvite>> {
        Ok(self
            .invites
            .borrow()
            .iter()
            .filter(|i| i.company_id.as_str() == company_id)
            .cloned()
            .collect())
    }
}

impl ActivityRepo for MockDb {
    fn create_activity(&self, activity: &Activity) -> RepoResult<()> {
        if self.activity_log_broken.get() {
            return Err(RepoError::Other(anyhow::anyhow!("activity log unavailable")));
        }
        create(&mut self.activities.borrow_mut(), activity)
    }
    fn activities_of_user(
        &self,
        user_id: &str,
        pagination: &Pagination,
    ) -> RepoResult<Vec<Activity>> {
        let mut activities: Vec<_> = self
            .activities
            .borrow()
            .iter()
            .filter(|a| a.user_id.as_str() == user_id)
            .cloned()
            .collect();
        activities.sort_by(|a, b| b.at.cmp(&a.at));
        let offset = pagination.offset.unwrap_or(0) as usize;
        let limit = pagination.limit.map_or(usize::MAX, |l| l as usize);
        Ok(activities.into_iter().skip(offset).take(limit).collect())
    }
    fn count_activities(&self, user_ids: &[&str], action: ActivityType) -> RepoResult<usize> {
        Ok(self
            .activities
            .borrow()
            .iter()
            .filter(|a| a.action == action && user_ids.contains(&a.user_id.as_str()))
            .count())
    }
}

pub const VALID_OTP: &str = "123456";

/// Identity provider with in-memory accounts.
#[derive(Debug, Default)]
pub struct MockIdentity {
    pub accounts: RefCell<Vec<(String, String, Id)>>,
    pub session: RefCell<Option<Session>>,
    pub factors: RefCell<Vec<Id>>,
}

impl MockIdentity {
    pub fn with_account(email: &str, password: &str, user_id: &str) -> Self {
        let identity = Self::default();
        identity
            .accounts
            .borrow_mut()
            .push((email.to_lowercase(), password.into(), user_id.into()));
        identity
    }

    fn new_session(user_id: Id, email: EmailAddress, assurance: Assurance) -> Session {
        Session {
            access_token: format!("token-{user_id}"),
            refresh_token: None,
            user_id,
            email,
            expires_at: Timestamp::from_millis(Timestamp::now().as_millis() + 3_600_000),
            assurance,
        }
    }
}

impl IdentityGateway for MockIdentity {
    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }
    fn sign_in(&self, email: &EmailAddress, password: &str) -> identity::Result<Session> {
        let accounts = self.accounts.borrow();
        let (_, _, user_id) = accounts
            .iter()
            .find(|(e, p, _)| *e == email.normalized() && p == password)
            .ok_or(identity::Error::Credentials)?;
        let session = Self::new_session(user_id.clone(), email.clone(), Assurance::SingleFactor);
        *self.session.borrow_mut() = Some(session.clone());
        Ok(session)
    }
    fn sign_up(&self, email: &EmailAddress, password: &str) -> identity::Result<Id> {
        let mut accounts = self.accounts.borrow_mut();
        if accounts.iter().any(|(e, _, _)| *e == email.normalized()) {
            return Err(identity::Error::UserExists);
        }
        let id = Id::new();
        accounts.push((email.normalized(), password.into(), id.clone()));
        Ok(id)
    }
    fn sign_out(&self) -> identity::Result<()> {
        self.session
            .borrow_mut()
            .take()
            .map(|_| ())
            .ok_or(identity::Error::NotSignedIn)
    }
    fn enroll_second_factor(&self) -> identity::Result<MfaEnrollment> {
        let session = self.current_session().ok_or(identity::Error::NotSignedIn)?;
        let factor_id = Id::new();
        self.factors.borrow_mut().push(factor_id.clone());
        Ok(MfaEnrollment {
            factor_id,
            totp_uri: format!("otpauth://totp/WealthMap:{}", session.email.as_str()),
            secret: "JBSWY3DPEHPK3PXP".into(),
        })
    }
    fn challenge_second_factor(&self, factor_id: &str) -> identity::Result<Id> {
        if self.current_session().is_none() {
            return Err(identity::Error::NotSignedIn);
        }
        if !self.factors.borrow().iter().any(|f| f.as_str() == factor_id) {
            return Err(identity::Error::SecondFactor);
        }
        Ok(Id::new())
    }
    fn verify_second_factor(
        &self,
        factor_id: &str,
        _challenge_id: &str,
        code: &str,
    ) -> identity::Result<Session> {
        let session = self.current_session().ok_or(identity::Error::NotSignedIn)?;
        if code != VALID_OTP || !self.factors.borrow().iter().any(|f| f.as_str() == factor_id) {
            return Err(identity::Error::SecondFactor);
        }
        let session = Self::new_session(session.user_id, session.email, Assurance::MultiFactor);
        *self.session.borrow_mut() = Some(session.clone());
        Ok(session)
    }
}

#[derive(Debug, Default)]
pub struct MockStorage {
    pub uploads: RefCell<Vec<(String, Upload)>>,
}

impl LogoStorage for MockStorage {
    fn upload_logo(&self, company_id: &str, upload: Upload) -> anyhow::Result<Url> {
        let url = format!(
            "https://storage.example.com/company-logos/{company_id}/{}",
            upload.file_name
        );
        self.uploads
            .borrow_mut()
            .push((company_id.to_owned(), upload));
        Ok(url.parse()?)
    }
}
