use super::{prelude::*, resolve_actor::require_company};
use crate::util::validate;

#[derive(Debug, Clone)]
pub struct NewInvite {
    pub email: String,
    pub role: Role,
}

pub fn invite_employee<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    new_invite: NewInvite,
) -> Result<EmployeeInvite> {
    let company_id = require_company(actor)?;
    policy.authorize(
        actor,
        Resource::Invite {
            company_id: company_id.as_str(),
        },
        Action::Create,
    )?;
    let email: EmailAddress = new_invite.email.parse()?;
    if !validate::is_valid_email(email.as_str()) {
        return Err(Error::Email);
    }
    let invite = EmployeeInvite {
        id: Id::new(),
        email,
        role: new_invite.role,
        company_id: company_id.clone(),
        invited_by: actor.user_id.clone(),
        status: InviteStatus::Pending,
        created_at: Timestamp::now(),
    };
    log::info!(
        "Inviting {} as {} to company {}",
        invite.email,
        invite.role,
        invite.company_id
    );
    db.create_invite(&invite)?;
    Ok(invite)
}

pub fn pending_invites<D: Db>(db: &D, policy: &Policy, actor: &Actor) -> Result<Vec<EmployeeInvite>> {
    let company_id = require_company(actor)?;
    policy.authorize(
        actor,
        Resource::Invite {
            company_id: company_id.as_str(),
        },
        Action::Read,
    )?;
    let mut invites = db.invites_of_company(company_id.as_str())?;
    invites.retain(EmployeeInvite::is_pending);
    Ok(invites)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};

    #[test]
    fn admin_invites_an_employee() {
        let db = MockDb::default();
        let admin = db.add_member("a", Some("acme"), Some(Role::Admin));
        let invite = invite_employee(
            &db,
            &Policy::default(),
            &admin,
            NewInvite {
                email: "new.hire@acme.test".into(),
                role: Role::Employee,
            },
        )
        .unwrap();
        assert!(invite.is_pending());
        assert_eq!("acme", invite.company_id.as_str());
        assert_eq!("a", invite.invited_by.as_str());
        assert_eq!(1, pending_invites(&db, &Policy::default(), &admin).unwrap().len());
    }

    #[test]
    fn reject_invalid_email() {
        let db = MockDb::default();
        let admin = db.add_member("a", Some("acme"), Some(Role::Admin));
        let res = invite_employee(
            &db,
            &Policy::default(),
            &admin,
            NewInvite {
                email: "nope".into(),
                role: Role::Employee,
            },
        );
        assert!(matches!(res, Err(Error::Email)));
        assert!(db.invites.borrow().is_empty());
    }

    #[test]
    fn employees_cannot_invite() {
        let db = MockDb::default();
        let employee = db.add_member("e", Some("acme"), Some(Role::Employee));
        let res = invite_employee(
            &db,
            &Policy::default(),
            &employee,
            NewInvite {
                email: "friend@acme.test".into(),
                role: Role::Admin,
            },
        );
        assert!(matches!(res, Err(Error::Forbidden(_))));
    }
}
