use super::{
    track::{details, track},
    *,
};

pub fn update_notification_prefs<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    prefs: NotificationPrefs,
) -> Result<User> {
    let user = usecases::update_notification_prefs(db, policy, actor, actor.user_id.as_str(), prefs)
        .map_err(|err| {
            warn!("Failed to update notification preferences: {err}");
            err
        })?;
    track(
        db,
        &actor.user_id,
        ActivityType::UpdateSettings,
        details([
            ("sms", prefs.sms.to_string()),
            ("email", prefs.email.to_string()),
        ]),
    );
    Ok(user)
}

pub fn update_data_access<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    data_access: DataAccess,
) -> Result<Company> {
    let company = usecases::update_data_access(db, policy, actor, data_access).map_err(|err| {
        warn!("Failed to update data access: {err}");
        err
    })?;
    let DataAccess {
        zillow,
        reportall,
        wealth_engine,
    } = data_access;
    track(
        db,
        &actor.user_id,
        ActivityType::UpdateSettings,
        details([
            (DataSource::Zillow.as_ref(), zillow.to_string()),
            (DataSource::Reportall.as_ref(), reportall.to_string()),
            (DataSource::WealthEngine.as_ref(), wealth_engine.to_string()),
        ]),
    );
    Ok(company)
}
