use std::collections::HashSet;

use super::{prelude::*, resolve_actor::require_company};

/// Key figures on the admin dashboard.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub employees  : usize,
    /// Distinct properties bookmarked by members of the company.
    pub properties : usize,
    pub logins     : usize,
    pub searches   : usize,
}

pub fn dashboard_stats<D: Db>(db: &D, policy: &Policy, actor: &Actor) -> Result<DashboardStats> {
    let company_id = require_company(actor)?;
    policy.authorize(
        actor,
        Resource::Company {
            company_id: company_id.as_str(),
        },
        Action::Read,
    )?;
    let users = db.users_of_company(company_id.as_str())?;
    let user_ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
    let properties = db
        .bookmarks_of_users(&user_ids)?
        .into_iter()
        .map(|b| b.property_id)
        .collect::<HashSet<_>>()
        .len();
    Ok(DashboardStats {
        employees: users.len(),
        properties,
        logins: db.count_activities(&user_ids, ActivityType::Login)?,
        searches: db.count_activities(&user_ids, ActivityType::Search)?,
    })
}
