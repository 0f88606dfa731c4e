use super::{employees::managed_employee, prelude::*};

pub fn change_employee_role<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    user_id: &str,
    role: Role,
) -> Result<Permission> {
    log::info!("Changing role of user {user_id} to {role}");
    let user = managed_employee(db, policy, actor, user_id)?;
    let now = Timestamp::now();
    let permission = match db.try_get_permission_of_user(user.id.as_str())? {
        Some(mut permission) => {
            permission.role = role;
            permission.updated_at = now;
            db.update_permission(&permission)?;
            permission
        }
        None => {
            let permission = Permission {
                id: Id::new(),
                user_id: user.id,
                role,
                updated_at: now,
            };
            db.create_permission(&permission)?;
            permission
        }
    };
    Ok(permission)
}
