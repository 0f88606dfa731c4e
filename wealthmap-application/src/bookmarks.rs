use super::{
    track::{details, track},
    *,
};
use wealthmap_core::usecases::BookmarkToggle;

fn property_details(property_id: &str) -> ActivityDetails {
    details([("property_id", property_id.to_owned())])
}

pub fn add_bookmark<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    property_id: &str,
) -> Result<Bookmark> {
    let bookmark = usecases::add_bookmark(db, policy, actor, property_id).map_err(|err| {
        warn!("Failed to bookmark property {property_id}: {err}");
        err
    })?;
    track(
        db,
        &actor.user_id,
        ActivityType::BookmarkProperty,
        property_details(property_id),
    );
    Ok(bookmark)
}

pub fn remove_bookmark<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    owner_id: &str,
    property_id: &str,
) -> Result<()> {
    usecases::remove_bookmark(db, policy, actor, owner_id, property_id).map_err(|err| {
        warn!("Failed to remove bookmark of property {property_id}: {err}");
        err
    })?;
    track(
        db,
        &actor.user_id,
        ActivityType::RemoveBookmark,
        property_details(property_id),
    );
    Ok(())
}

pub fn toggle_bookmark<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    property_id: &str,
) -> Result<BookmarkToggle> {
    let toggle = usecases::toggle_bookmark(db, policy, actor, property_id).map_err(|err| {
        warn!("Failed to toggle bookmark of property {property_id}: {err}");
        err
    })?;
    let action = match toggle {
        BookmarkToggle::Added(_) => ActivityType::BookmarkProperty,
        BookmarkToggle::Removed => ActivityType::RemoveBookmark,
    };
    track(db, &actor.user_id, action, property_details(property_id));
    Ok(toggle)
}

#[cfg(test)]
mod tests {
    use super::super::tests::prelude::*;

    #[test]
    fn toggle_twice_tracks_add_and_remove() {
        let db = MockDb::with_sample_properties();
        let policy = Policy::default();
        let actor = db.add_member("e", Some("acme"), Some(Role::Employee));
        super::toggle_bookmark(&db, &policy, &actor, "4").unwrap();
        super::toggle_bookmark(&db, &policy, &actor, "4").unwrap();
        assert!(db.bookmarks.borrow().is_empty());
        assert_eq!(
            vec![ActivityType::BookmarkProperty, ActivityType::RemoveBookmark],
            tracked(&db, "e")
        );
        assert_eq!("4", db.activities.borrow()[0].details["property_id"]);
    }

    #[test]
    fn denied_removal_is_not_tracked() {
        let db = MockDb::with_sample_properties();
        let policy = Policy::default();
        let owner = db.add_member("e", Some("acme"), Some(Role::Employee));
        let other = db.add_member("f", Some("acme"), Some(Role::Employee));
        super::add_bookmark(&db, &policy, &owner, "1").unwrap();
        assert!(super::remove_bookmark(&db, &policy, &other, "e", "1").is_err());
        assert_eq!(1, db.bookmarks.borrow().len());
        assert!(tracked(&db, "f").is_empty());
    }
}
