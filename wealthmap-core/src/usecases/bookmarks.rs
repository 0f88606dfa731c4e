use super::{prelude::*, resolve_actor::owner_of};
use crate::repositories::Error as RepoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added(Bookmark),
    Removed,
}

fn load_property<R: PropertyRepo>(repo: &R, property_id: &str) -> Result<Property> {
    repo.get_property(property_id).map_err(|err| match err {
        RepoError::NotFound => Error::PropertyDoesNotExist,
        err => err.into(),
    })
}

fn owner_company<R: UserRepo>(repo: &R, owner_id: &str) -> Result<Option<Id>> {
    Ok(repo.try_get_user(owner_id)?.and_then(|u| u.company_id))
}

/// Bookmarks a property for the signed-in user. Bookmarking twice is a no-op.
pub fn add_bookmark<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    property_id: &str,
) -> Result<Bookmark> {
    policy.authorize(actor, Resource::Bookmark(owner_of(actor)), Action::Create)?;
    let property = load_property(db, property_id)?;
    if let Some(existing) = db.try_get_bookmark(actor.user_id.as_str(), property.id.as_str())? {
        return Ok(existing);
    }
    let bookmark = Bookmark {
        id: Id::new(),
        user_id: actor.user_id.clone(),
        property_id: property.id,
        created_at: Timestamp::now(),
    };
    db.create_bookmark(&bookmark)?;
    Ok(bookmark)
}

pub fn remove_bookmark<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    owner_id: &str,
    property_id: &str,
) -> Result<()> {
    let company_id = owner_company(db, owner_id)?;
    let owner = Owner {
        user_id: owner_id,
        company_id: company_id.as_ref().map(Id::as_str),
    };
    policy.authorize(actor, Resource::Bookmark(owner), Action::Delete)?;
    db.delete_bookmark(owner_id, property_id)?;
    Ok(())
}

pub fn toggle_bookmark<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    property_id: &str,
) -> Result<BookmarkToggle> {
    if is_bookmarked(db, actor, property_id)? {
        remove_bookmark(db, policy, actor, actor.user_id.as_str(), property_id)?;
        Ok(BookmarkToggle::Removed)
    } else {
        add_bookmark(db, policy, actor, property_id).map(BookmarkToggle::Added)
    }
}

pub fn is_bookmarked<R: BookmarkRepo>(repo: &R, actor: &Actor, property_id: &str) -> Result<bool> {
    Ok(repo
        .try_get_bookmark(actor.user_id.as_str(), property_id)?
        .is_some())
}

/// Bookmarks of a user together with their properties, newest first.
///
/// Bookmarks of properties that no longer exist are skipped.
pub fn bookmarked_properties<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    owner_id: &str,
) -> Result<Vec<(Bookmark, Property)>> {
    let company_id = owner_company(db, owner_id)?;
    let owner = Owner {
        user_id: owner_id,
        company_id: company_id.as_ref().map(Id::as_str),
    };
    policy.authorize(actor, Resource::Bookmark(owner), Action::Read)?;
    let mut results = vec![];
    for bookmark in db.bookmarks_of_user(owner_id)? {
        match db.get_property(bookmark.property_id.as_str()) {
            Ok(property) => results.push((bookmark, property)),
            Err(RepoError::NotFound) => {
                log::warn!("Bookmarked property {} not found", bookmark.property_id);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(results)
}
