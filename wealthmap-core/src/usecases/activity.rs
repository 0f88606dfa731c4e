use super::{
    prelude::*,
    resolve_actor::{owner_of, require_company},
};

pub fn track_activity<R>(
    repo: &R,
    user_id: &Id,
    action: ActivityType,
    details: ActivityDetails,
) -> Result<Activity>
where
    R: ActivityRepo + ?Sized,
{
    let activity = Activity {
        id: Id::new(),
        user_id: user_id.clone(),
        action,
        details,
        at: Timestamp::now(),
    };
    log::debug!("Tracking {} of user {}", activity.action, activity.user_id);
    repo.create_activity(&activity)?;
    Ok(activity)
}

/// Activity log of the signed-in user, newest first.
pub fn own_activity<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    pagination: &Pagination,
) -> Result<Vec<Activity>> {
    policy.authorize(actor, Resource::Activity(owner_of(actor)), Action::Read)?;
    Ok(db.activities_of_user(actor.user_id.as_str(), pagination)?)
}

/// Activity log of a member of the admin's company, newest first.
pub fn employee_activity<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    employee_id: &str,
    pagination: &Pagination,
) -> Result<Vec<Activity>> {
    require_company(actor)?;
    let employee = match db.get_user(employee_id) {
        Ok(user) => user,
        Err(crate::repositories::Error::NotFound) => return Err(Error::UserDoesNotExist),
        Err(err) => return Err(err.into()),
    };
    policy.authorize(
        actor,
        Resource::Employee {
            company_id: employee.company_id.as_ref().map(Id::as_str),
        },
        Action::Read,
    )?;
    Ok(db.activities_of_user(employee.id.as_str(), pagination)?)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};

    fn push_activity(db: &MockDb, user_id: &str, action: ActivityType, at: i64) {
        db.activities.borrow_mut().push(Activity {
            id: Id::new(),
            user_id: user_id.into(),
            action,
            details: ActivityDetails::new(),
            at: Timestamp::from_millis(at),
        });
    }

    #[test]
    fn track_with_details() {
        let db = MockDb::default();
        let mut details = ActivityDetails::new();
        details.insert("query".into(), "market st".into());
        track_activity(&db, &"e".into(), ActivityType::Search, details).unwrap();
        let activities = db.activities.borrow();
        assert_eq!(1, activities.len());
        assert_eq!(ActivityType::Search, activities[0].action);
        assert_eq!("market st", activities[0].details["query"]);
    }

    #[test]
    fn own_activity_newest_first_and_paginated() {
        let db = MockDb::default();
        let actor = db.add_member("e", Some("acme"), Some(Role::Employee));
        push_activity(&db, "e", ActivityType::Login, 1_000);
        push_activity(&db, "e", ActivityType::Search, 3_000);
        push_activity(&db, "e", ActivityType::Logout, 2_000);
        push_activity(&db, "other", ActivityType::Login, 4_000);
        let all = own_activity(&db, &Policy::default(), &actor, &Pagination::default()).unwrap();
        let actions: Vec<_> = all.iter().map(|a| a.action).collect();
        assert_eq!(
            vec![ActivityType::Search, ActivityType::Logout, ActivityType::Login],
            actions
        );
        let page = own_activity(
            &db,
            &Policy::default(),
            &actor,
            &Pagination {
                offset: Some(1),
                limit: Some(1),
            },
        )
        .unwrap();
        assert_eq!(ActivityType::Logout, page[0].action);
        assert_eq!(1, page.len());
    }

    #[test]
    fn admins_read_activity_of_their_employees() {
        let db = MockDb::default();
        let admin = db.add_member("a", Some("acme"), Some(Role::Admin));
        db.add_member("e", Some("acme"), Some(Role::Employee));
        db.add_member("x", Some("globex"), Some(Role::Employee));
        push_activity(&db, "e", ActivityType::Login, 1_000);
        push_activity(&db, "x", ActivityType::Login, 1_000);
        let policy = Policy::default();
        assert_eq!(
            1,
            employee_activity(&db, &policy, &admin, "e", &Pagination::default())
                .unwrap()
                .len()
        );
        assert!(matches!(
            employee_activity(&db, &policy, &admin, "x", &Pagination::default()),
            Err(Error::Forbidden(_))
        ));
        let employee = db.add_member("f", Some("acme"), Some(Role::Employee));
        assert!(matches!(
            employee_activity(&db, &policy, &employee, "e", &Pagination::default()),
            Err(Error::Forbidden(_))
        ));
    }
}
