use super::prelude::*;

pub fn update_notification_prefs<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    user_id: &str,
    prefs: NotificationPrefs,
) -> Result<User> {
    let mut user = match db.get_user(user_id) {
        Ok(user) => user,
        Err(crate::repositories::Error::NotFound) => return Err(Error::UserDoesNotExist),
        Err(err) => return Err(err.into()),
    };
    policy.authorize(
        actor,
        Resource::Profile(Owner {
            user_id: user.id.as_str(),
            company_id: user.company_id.as_ref().map(Id::as_str),
        }),
        Action::Update,
    )?;
    user.notification_prefs = prefs;
    db.update_user(&user)?;
    Ok(user)
}
