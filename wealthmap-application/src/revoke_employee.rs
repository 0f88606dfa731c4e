use super::{
    track::{details, track},
    *,
};

pub fn revoke_employee<D: Db>(db: &D, policy: &Policy, actor: &Actor, user_id: &str) -> Result<()> {
    usecases::revoke_employee(db, policy, actor, user_id).map_err(|err| {
        warn!("Failed to revoke access of user {user_id}: {err}");
        err
    })?;
    track(
        db,
        &actor.user_id,
        ActivityType::RevokeAccess,
        details([("employee_id", user_id.to_owned())]),
    );
    Ok(())
}
