use super::{prelude::*, resolve_actor::require_company};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeOverview {
    pub user: User,
    pub role: Option<Role>,
    /// Number of tracked activities.
    pub activity_count: usize,
}

pub fn list_employees<D: Db>(db: &D, policy: &Policy, actor: &Actor) -> Result<Vec<EmployeeOverview>> {
    let company_id = require_company(actor)?;
    policy.authorize(
        actor,
        Resource::Employee {
            company_id: Some(company_id.as_str()),
        },
        Action::Read,
    )?;
    let mut users = db.users_of_company(company_id.as_str())?;
    users.sort_by(|a, b| a.email.cmp(&b.email));
    users
        .into_iter()
        .map(|user| {
            let role = db
                .try_get_permission_of_user(user.id.as_str())?
                .map(|p| p.role);
            let activity_count = db
                .activities_of_user(user.id.as_str(), &Pagination::default())?
                .len();
            Ok(EmployeeOverview {
                user,
                role,
                activity_count,
            })
        })
        .collect()
}

/// Loads a user and checks that the actor may manage it.
pub(crate) fn managed_employee<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    user_id: &str,
) -> Result<User> {
    let user = match db.get_user(user_id) {
        Ok(user) => user,
        Err(crate::repositories::Error::NotFound) => return Err(Error::UserDoesNotExist),
        Err(err) => return Err(err.into()),
    };
    policy.authorize(
        actor,
        Resource::Employee {
            company_id: user.company_id.as_ref().map(Id::as_str),
        },
        Action::Update,
    )?;
    if user.id == actor.user_id {
        return Err(Error::OwnAccount);
    }
    Ok(user)
}
