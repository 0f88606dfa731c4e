use super::*;

/// Records an activity. Failures are logged and never fail the
/// surrounding operation.
pub(crate) fn track<D: Db>(db: &D, user_id: &Id, action: ActivityType, details: ActivityDetails) {
    if let Err(err) = usecases::track_activity(db, user_id, action, details) {
        warn!("Failed to track {action} of user {user_id}: {err}");
    }
}

pub(crate) fn details<const N: usize>(pairs: [(&str, String); N]) -> ActivityDetails {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}
