use super::*;

pub fn register_company<D, S>(
    db: &D,
    storage: &S,
    policy: &Policy,
    actor: &Actor,
    new_company: usecases::NewCompany,
) -> Result<Company>
where
    D: Db,
    S: LogoStorage + ?Sized,
{
    let name = new_company.name.clone();
    Ok(
        usecases::register_company(db, storage, policy, actor, new_company).map_err(|err| {
            warn!("Failed to register company {name}: {err}");
            err
        })?,
    )
}
