use super::prelude::*;
use crate::{gateways::identity::IdentityGateway, repositories::Error as RepoError, util::validate};

/// Turns a pending invitation into an account with the invited role.
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
    let mut invite = match db.get_invite(invite_id) {
        Ok(invite) => invite,
        Err(RepoError::NotFound) => return Err(Error::InviteNotPending),
        Err(err) => return Err(err.into()),
    };
    if !invite.is_pending() {
        return Err(Error::InviteNotPending);
    }
    let email: EmailAddress = email.parse()?;
    if email.normalized() != invite.email.normalized() {
        return Err(Error::InviteEmail);
    }
    if !validate::is_valid_password(password) {
        return Err(Error::Password);
    }
    let user_id = identity.sign_up(&email, password)?;
    log::info!(
        "Accepting invite {} of company {} for user {}",
        invite.id,
        invite.company_id,
        user_id
    );
    let now = Timestamp::now();
    let user = User {
        id: user_id,
        email,
        company_id: Some(invite.company_id.clone()),
        notification_prefs: NotificationPrefs::default(),
        created_at: now,
    };
    db.create_user(&user)?;
    db.create_permission(&Permission {
        id: Id::new(),
        user_id: user.id.clone(),
        role: invite.role,
        updated_at: now,
    })?;
    invite.status = InviteStatus::Accepted;
    db.update_invite(&invite)?;
    Ok(user)
}
