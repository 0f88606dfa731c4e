use super::{
    track::{details, track},
    *,
};

pub fn invite_employee<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    new_invite: usecases::NewInvite,
) -> Result<EmployeeInvite> {
    let email = new_invite.email.clone();
    let invite = usecases::invite_employee(db, policy, actor, new_invite).map_err(|err| {
        warn!("Failed to invite {email}: {err}");
        err
    })?;
    track(
        db,
        &actor.user_id,
        ActivityType::InviteEmployee,
        details([
            ("email", invite.email.as_str().to_owned()),
            ("role", invite.role.to_string()),
        ]),
    );
    Ok(invite)
}

pub fn accept_invite<D, I>(
    db: &D,
    identity: &I,
    invite_id: &str,
    email: &str,
    password: &str,
) -> Result<User>
where
    D: Db,
    I: IdentityGateway + ?Sized,
{
    Ok(
        usecases::accept_invite(db, identity, invite_id, email, password).map_err(|err| {
            warn!("Failed to accept invite {invite_id}: {err}");
            err
        })?,
    )
}
