use super::{
    track::{details, track},
    *,
};

pub fn change_employee_role<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    user_id: &str,
    role: Role,
) -> Result<Permission> {
    let permission =
        usecases::change_employee_role(db, policy, actor, user_id, role).map_err(|err| {
            warn!("Failed to change role of user {user_id}: {err}");
            err
        })?;
    track(
        db,
        &actor.user_id,
        ActivityType::UpdatePermissions,
        details([
            ("employee_id", user_id.to_owned()),
            ("role", role.to_string()),
        ]),
    );
    Ok(permission)
}
