use super::{track::track, *};

pub fn sign_in<D, I>(db: &D, identity: &I, email: &str, password: &str) -> Result<(Session, Actor)>
where
    D: Db,
    I: IdentityGateway + ?Sized,
{
    let (session, actor) = usecases::sign_in(db, identity, email, password).map_err(|err| {
        warn!("Failed to sign in {email}: {err}");
        err
    })?;
    track(db, &actor.user_id, ActivityType::Login, Default::default());
    Ok((session, actor))
}

pub fn sign_out<D, I>(db: &D, identity: &I) -> Result<()>
where
    D: Db,
    I: IdentityGateway + ?Sized,
{
    let actor = usecases::current_actor(db, identity).ok();
    usecases::sign_out(identity)?;
    if let Some(actor) = actor {
        track(db, &actor.user_id, ActivityType::Logout, Default::default());
    }
    Ok(())
}
