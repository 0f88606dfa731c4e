use super::prelude::*;
use crate::{
    gateways::storage::{LogoStorage, Upload},
    util::validate,
};

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub logo: Option<Upload>,
}

/// Creates a company and makes the registering admin its first member.
pub fn register_company<D, S>(
    db: &D,
    storage: &S,
    policy: &Policy,
    actor: &Actor,
    new_company: NewCompany,
) -> Result<Company>
where
    D: Db,
    S: LogoStorage + ?Sized,
{
    policy.authorize(actor, Resource::NewCompany, Action::Create)?;
    let NewCompany { name, logo } = new_company;
    if !validate::is_valid_company_name(&name) {
        return Err(Error::CompanyName);
    }
    let id = Id::new();
    let logo_url = logo
        .map(|upload| storage.upload_logo(id.as_str(), upload))
        .transpose()
        .map_err(Error::Gateway)?;
    let company = Company {
        id,
        name: name.trim().to_owned(),
        logo_url,
        data_access: DataAccess::default(),
        created_at: Timestamp::now(),
    };
    log::info!("Registering company {} ({})", company.name, company.id);
    db.create_company(&company)?;
    match db.try_get_user(actor.user_id.as_str())? {
        Some(mut user) => {
            user.company_id = Some(company.id.clone());
            db.update_user(&user)?;
        }
        None => {
            db.create_user(&User {
                id: actor.user_id.clone(),
                email: actor.email.clone(),
                company_id: Some(company.id.clone()),
                notification_prefs: NotificationPrefs::default(),
                created_at: Timestamp::now(),
            })?;
        }
    }
    Ok(company)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};

    #[test]
    fn admin_registers_company_with_logo() {
        let db = MockDb::default();
        let storage = MockStorage::default();
        let admin = db.add_member("a", None, Some(Role::Admin));
        let company = register_company(
            &db,
            &storage,
            &Policy::default(),
            &admin,
            NewCompany {
                name: " Acme Wealth ".into(),
                logo: Some(Upload {
                    file_name: "logo.png".into(),
                    content_type: "image/png".into(),
                    bytes: vec![1, 2, 3],
                }),
            },
        )
        .unwrap();
        assert_eq!("Acme Wealth", company.name);
        assert_eq!(DataAccess::default(), company.data_access);
        assert!(company
            .logo_url
            .as_ref()
            .unwrap()
            .as_str()
            .ends_with("/logo.png"));
        assert_eq!(1, storage.uploads.borrow().len());
        assert_eq!(Some(company.id.clone()), db.get_user("a").unwrap().company_id);
    }

    #[test]
    fn admin_without_user_record_gets_one() {
        let db = MockDb::default();
        let admin = db.add_member("a", None, Some(Role::Admin));
        db.users.borrow_mut().clear();
        let company = register_company(
            &db,
            &MockStorage::default(),
            &Policy::default(),
            &admin,
            NewCompany {
                name: "Acme".into(),
                logo: None,
            },
        )
        .unwrap();
        let user = db.get_user("a").unwrap();
        assert_eq!(Some(company.id), user.company_id);
        assert_eq!(NotificationPrefs::default(), user.notification_prefs);
    }

    #[test]
    fn employees_cannot_register_companies() {
        let db = MockDb::default();
        let employee = db.add_member("e", None, Some(Role::Employee));
        let res = register_company(
            &db,
            &MockStorage::default(),
            &Policy::default(),
            &employee,
            NewCompany {
                name: "Acme".into(),
                logo: None,
            },
        );
        assert!(matches!(res, Err(Error::Forbidden(_))));
        assert!(db.companies.borrow().is_empty());
    }

    #[test]
    fn reject_blank_names() {
        let db = MockDb::default();
        let admin = db.add_member("a", None, Some(Role::Admin));
        let res = register_company(
            &db,
            &MockStorage::default(),
            &Policy::default(),
            &admin,
            NewCompany {
                name: "  ".into(),
                logo: None,
            },
        );
        assert!(matches!(res, Err(Error::CompanyName)));
    }
}
