use super::{prelude::*, resolve_actor::resolve_actor};
use crate::gateways::identity::IdentityGateway;

pub fn sign_in<D, I>(db: &D, identity: &I, email: &str, password: &str) -> Result<(Session, Actor)>
where
    D: UserRepo + PermissionRepo,
    I: IdentityGateway + ?Sized,
{
    let email: EmailAddress = email.parse()?;
    let session = identity.sign_in(&email, password)?;
    let actor = resolve_actor(db, &session)?;
    log::info!("User {} signed in", actor.user_id);
    Ok((session, actor))
}

/// The actor behind the current session of the identity provider.
pub fn current_actor<D, I>(db: &D, identity: &I) -> Result<Actor>
where
    D: UserRepo + PermissionRepo,
    I: IdentityGateway + ?Sized,
{
    let session = identity.current_session().ok_or(Error::NotSignedIn)?;
    resolve_actor(db, &session)
}

pub fn sign_out<I>(identity: &I) -> Result<()>
where
    I: IdentityGateway + ?Sized,
{
    identity.sign_out()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};

    #[test]
    fn sign_in_resolves_actor() {
        let db = MockDb::default();
        db.add_member("a", Some("acme"), Some(Role::Admin));
        let identity = MockIdentity::with_account("a@example.com", "secret1", "a");
        let (session, actor) = sign_in(&db, &identity, "A@example.com", "secret1").unwrap();
        assert_eq!("a", session.user_id.as_str());
        assert!(actor.is_admin());
        assert_eq!(actor, current_actor(&db, &identity).unwrap());
    }

    #[test]
    fn wrong_password() {
        let db = MockDb::default();
        let identity = MockIdentity::with_account("a@example.com", "secret1", "a");
        assert!(matches!(
            sign_in(&db, &identity, "a@example.com", "secret2"),
            Err(Error::Credentials)
        ));
        assert!(matches!(
            sign_in(&db, &identity, "not-an-email", "secret1"),
            Err(Error::Email)
        ));
    }

    #[test]
    fn sign_out_ends_session() {
        let db = MockDb::default();
        let identity = MockIdentity::with_account("a@example.com", "secret1", "a");
        sign_in(&db, &identity, "a@example.com", "secret1").unwrap();
        sign_out(&identity).unwrap();
        let err = current_actor(&db, &identity).unwrap_err();
        assert_eq!(Some(crate::routes::Route::Login), err.redirect());
        assert!(matches!(sign_out(&identity), Err(Error::NotSignedIn)));
    }
}
