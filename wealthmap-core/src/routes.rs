use crate::authorization::Actor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Landing,
    Login,
    CompanyRegistration,
    Map,
    Profile,
    AdminDashboard,
    AdminEmployees,
    AdminDataPreferences,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Self::Landing,
        Self::Login,
        Self::CompanyRegistration,
        Self::Map,
        Self::Profile,
        Self::AdminDashboard,
        Self::AdminEmployees,
        Self::AdminDataPreferences,
        Self::NotFound,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::CompanyRegistration => "/register-company",
            Self::Map => "/map",
            Self::Profile => "/profile",
            Self::AdminDashboard => "/admin",
            Self::AdminEmployees => "/admin/employees",
            Self::AdminDataPreferences => "/admin/data-preferences",
            Self::NotFound => "*",
        }
    }

    /// Unknown paths resolve to [`Route::NotFound`].
    pub fn from_path(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL
            .into_iter()
            .find(|r| *r != Self::NotFound && r.path() == path)
            .unwrap_or(Self::NotFound)
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Landing | Self::Login | Self::NotFound)
    }

    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::CompanyRegistration
                | Self::AdminDashboard
                | Self::AdminEmployees
                | Self::AdminDataPreferences
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(Route),
}

/// Decides whether `actor` may open `route`.
pub fn guard(route: Route, actor: Option<&Actor>) -> Guard {
    if !route.requires_session() {
        return Guard::Allow;
    }
    let Some(actor) = actor else {
        return Guard::Redirect(Route::Login);
    };
    if route.requires_admin() && !actor.is_admin() {
        return Guard::Redirect(Route::Landing);
    }
    if route.requires_admin() && route != Route::CompanyRegistration && actor.company_id.is_none()
    {
        return Guard::Redirect(Route::CompanyRegistration);
    }
    Guard::Allow
}
