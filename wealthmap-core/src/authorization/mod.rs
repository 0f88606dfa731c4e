//! Central authorization policy.
//!
//! Every use case that touches company data or data owned by a user
//! asks [`Policy::authorize`] before it reads or writes anything.

use std::result::Result as StdResult;

use thiserror::Error;

use crate::entities::*;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("administrator role required")]
    NotAdmin,
    #[error("resource belongs to another company")]
    ForeignCompany,
    #[error("resource belongs to another user")]
    NotOwner,
}

pub type Result<T> = StdResult<T, Error>;

/// The signed-in user on whose behalf an operation runs.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id    : Id,
    pub email      : EmailAddress,
    pub role       : Option<Role>,
    pub company_id : Option<Id>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    fn is_member_of(&self, company_id: Option<&str>) -> bool {
        match (self.company_id.as_ref(), company_id) {
            (Some(own), Some(other)) => own.as_str() == other,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// A company that does not exist yet.
    NewCompany,
    Company { company_id: &'a str },
    /// A user record and everything attached to it (role, activity log)
    /// seen from the company's perspective.
    Employee { company_id: Option<&'a str> },
    Invite { company_id: &'a str },
    Bookmark(Owner<'a>),
    Activity(Owner<'a>),
    Profile(Owner<'a>),
}

/// Owner of a self-service resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner<'a> {
    pub user_id: &'a str,
    pub company_id: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Who may act on self-service resources besides their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfServicePolicy {
    #[default]
    OwnerOnly,
    /// Admins may also act on resources of users in their own company.
    OwnerOrCompanyAdmin,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Policy {
    pub self_service: SelfServicePolicy,
}

impl Policy {
    pub const fn new(self_service: SelfServicePolicy) -> Self {
        Self { self_service }
    }

    pub fn authorize(&self, actor: &Actor, resource: Resource, action: Action) -> Result<()> {
        let res = match resource {
            Resource::NewCompany => {
                debug_assert_eq!(Action::Create, action);
                require_admin(actor)
            }
            Resource::Company { company_id } | Resource::Invite { company_id } => {
                require_admin(actor)?;
                require_same_company(actor, Some(company_id))
            }
            Resource::Employee { company_id } => {
                require_admin(actor)?;
                require_same_company(actor, company_id)
            }
            Resource::Bookmark(owner) | Resource::Activity(owner) | Resource::Profile(owner) => {
                self.authorize_self_service(actor, owner)
            }
        };
        if let Err(err) = res {
            log::debug!(
                "Denied {action:?} on {resource:?} for user {}: {err}",
                actor.user_id
            );
        }
        res
    }

    fn authorize_self_service(&self, actor: &Actor, owner: Owner) -> Result<()> {
        if actor.user_id.as_str() == owner.user_id {
            return Ok(());
        }
        match self.self_service {
            SelfServicePolicy::OwnerOnly => Err(Error::NotOwner),
            SelfServicePolicy::OwnerOrCompanyAdmin => {
                if !actor.is_admin() {
                    return Err(Error::NotOwner);
                }
                require_same_company(actor, owner.company_id)
            }
        }
    }
}

fn require_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::NotAdmin)
    }
}

fn require_same_company(actor: &Actor, company_id: Option<&str>) -> Result<()> {
    if actor.is_member_of(company_id) {
        Ok(())
    } else {
        Err(Error::ForeignCompany)
    }
}
