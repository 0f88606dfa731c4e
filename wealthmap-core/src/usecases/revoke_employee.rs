use super::{employees::managed_employee, prelude::*};

/// Removes a user from the company and drops its role.
pub fn revoke_employee<D: Db>(db: &D, policy: &Policy, actor: &Actor, user_id: &str) -> Result<()> {
    log::info!("Revoking access of user {user_id}");
    let mut user = managed_employee(db, policy, actor, user_id)?;
    db.delete_permissions_of_user(user.id.as_str())?;
    user.company_id = None;
    db.update_user(&user)?;
    Ok(())
}
