use super::{prelude::*, resolve_actor::require_company};

/// The company of the signed-in admin.
pub fn own_company<D: Db>(db: &D, policy: &Policy, actor: &Actor) -> Result<Company> {
    let company_id = require_company(actor)?;
    policy.authorize(
        actor,
        Resource::Company {
            company_id: company_id.as_str(),
        },
        Action::Read,
    )?;
    Ok(db.get_company(company_id.as_str())?)
}

pub fn update_data_access<D: Db>(
    db: &D,
    policy: &Policy,
    actor: &Actor,
    data_access: DataAccess,
) -> Result<Company> {
    let company_id = require_company(actor)?;
    policy.authorize(
        actor,
        Resource::Company {
            company_id: company_id.as_str(),
        },
        Action::Update,
    )?;
    let mut company = db.get_company(company_id.as_str())?;
    log::info!(
        "Changing data access of company {} to {:?}",
        company.id,
        data_access
    );
    company.data_access = data_access;
    db.update_company(&company)?;
    Ok(company)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};

    #[test]
    fn admin_disables_a_data_source() {
        let db = MockDb::default();
        db.add_company("acme", "Acme");
        let admin = db.add_member("a", Some("acme"), Some(Role::Admin));
        let mut access = own_company(&db, &Policy::default(), &admin)
            .unwrap()
            .data_access;
        access.set(DataSource::Zillow, false);
        update_data_access(&db, &Policy::default(), &admin, access).unwrap();
        let stored = db.get_company("acme").unwrap().data_access;
        assert!(!stored.zillow);
        assert!(stored.reportall);
        assert!(stored.wealth_engine);
    }

    #[test]
    fn employees_cannot_change_data_access() {
        let db = MockDb::default();
        db.add_company("acme", "Acme");
        let employee = db.add_member("e", Some("acme"), Some(Role::Employee));
        let res = update_data_access(&db, &Policy::default(), &employee, DataAccess::default());
        assert!(matches!(res, Err(Error::Forbidden(_))));
    }

    #[test]
    fn admin_without_company_is_redirected() {
        let db = MockDb::default();
        let admin = db.add_member("a", None, Some(Role::Admin));
        let err = own_company(&db, &Policy::default(), &admin).unwrap_err();
        assert_eq!(
            Some(crate::routes::Route::CompanyRegistration),
            err.redirect()
        );
    }
}
