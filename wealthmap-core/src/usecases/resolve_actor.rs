use super::prelude::*;

/// Loads the user record and role behind a session.
pub fn resolve_actor<D>(db: &D, session: &Session) -> Result<Actor>
where
    D: UserRepo + PermissionRepo,
{
    if session.is_expired(Timestamp::now()) {
        return Err(Error::NotSignedIn);
    }
    let user_id = session.user_id.as_str();
    let role = db.try_get_permission_of_user(user_id)?.map(|p| p.role);
    let (email, company_id) = match db.try_get_user(user_id)? {
        Some(user) => (user.email, user.company_id),
        None => (session.email.clone(), None),
    };
    Ok(Actor {
        user_id: session.user_id.clone(),
        email,
        role,
        company_id,
    })
}

pub fn require_company(actor: &Actor) -> Result<&Id> {
    actor.company_id.as_ref().ok_or(Error::NoCompany)
}

pub(crate) fn owner_of(actor: &Actor) -> Owner<'_> {
    Owner {
        user_id: actor.user_id.as_str(),
        company_id: actor.company_id.as_ref().map(Id::as_str),
    }
}
