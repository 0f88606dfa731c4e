use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
    sync::Arc,
};

use anyhow::{anyhow, bail, Context as _, Result};
use serde::Serialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use wealthmap_application::{error::AppError, prelude as flows};
use wealthmap_boundary as json;
use wealthmap_core::{
    authorization::{Actor, Policy},
    entities::*,
    gateways::{identity::IdentityGateway, storage::Upload},
    repositories::{Pagination, UserRepo},
    routes::{guard, Guard, Route},
    usecases::{self, BookmarkToggle, NewCompany, NewInvite, SearchRequest},
};
use wealthmap_gateways::BackendClient;

use crate::{
    cli::*,
    config::Config,
    explorer,
    session_file::{SessionFile, DEFAULT_SESSION_FILE_NAME},
};

/// The route whose guard an error stands for, if any.
pub fn redirect_of(err: &anyhow::Error) -> Option<Route> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<AppError>()
            .and_then(AppError::redirect)
            .or_else(|| {
                cause
                    .downcast_ref::<usecases::Error>()
                    .and_then(usecases::Error::redirect)
            })
    })
}

pub fn hint(route: Route) -> &'static str {
    match route {
        Route::Login => "Please sign in first: wealthmap login --email <EMAIL>",
        Route::CompanyRegistration => {
            "Please register your company first: wealthmap admin register-company --name <NAME>"
        }
        Route::Landing => "This requires the administrator role",
        _ => "This is not available",
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    fn done(&self, message: &str) -> Result<()> {
        self.emit(&json!({ "ok": true }), || format!("{message}\n"))
    }
}

struct Context {
    config: Config,
    session_file: SessionFile,
    out: Output,
}

impl Context {
    fn policy(&self) -> &Policy {
        &self.config.policy
    }

    fn client(&self) -> Result<BackendClient> {
        let client = BackendClient::try_new(&self.config.backend)
            .context("Unable to set up the backend client")?;
        client.set_session(self.session_file.load()?);
        Ok(client)
    }

    /// The signed-in actor if the guard of `route` lets them pass.
    fn actor(&self, client: &BackendClient, route: Route) -> Result<Actor> {
        let actor = match usecases::current_actor(client, client) {
            Ok(actor) => Some(actor),
            Err(usecases::Error::NotSignedIn) => None,
            Err(err) => return Err(err.into()),
        };
        match (guard(route, actor.as_ref()), actor) {
            (Guard::Allow, Some(actor)) => Ok(actor),
            (Guard::Allow, None) => bail!(hint(Route::Login)),
            (Guard::Redirect(target), _) => {
                log::debug!("{} redirects to {}", route.path(), target.path());
                bail!(hint(target))
            }
        }
    }

    fn store_session(&self, client: &BackendClient) -> Result<()> {
        let session = client
            .current_session()
            .ok_or_else(|| anyhow!("The backend did not return a session"))?;
        self.session_file.save(session)?;
        Ok(())
    }
}

fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn logo_upload(path: &Path) -> Result<Upload> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let content_type = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => bail!("Unsupported logo format: {}", path.display()),
    };
    let bytes = fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("logo")
        .to_owned();
    Ok(Upload {
        file_name,
        content_type: content_type.to_owned(),
        bytes,
    })
}

fn format_timestamp(at: Timestamp) -> String {
    at.to_offset_date_time()
        .format(&Rfc3339)
        .unwrap_or_else(|_| at.as_millis().to_string())
}

pub(crate) fn describe_property(p: &Property) -> String {
    let mut out = format!("{} [{}]\n", p.address, p.id);
    if let Some(owner) = &p.owner_name {
        out.push_str(&format!("  owner:  {owner}\n"));
    }
    if let Some(value) = p.value_usd {
        out.push_str(&format!("  value:  {}\n", Usd(value)));
    }
    if let Some(size) = p.size_sqft {
        out.push_str(&format!("  size:   {size} sqft\n"));
    }
    out.push_str(&format!("  zip:    {}\n", p.zip_code));
    if let Some(estimate) = p.wealth_estimate {
        match estimate.confidence_percent() {
            Some(percent) => out.push_str(&format!(
                "  wealth: {} ({percent}% confidence)\n",
                Usd(estimate.usd)
            )),
            None => out.push_str(&format!("  wealth: {}\n", Usd(estimate.usd))),
        }
    }
    out
}

fn property_rows<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Vec<json::PropertyRow> {
    properties.into_iter().cloned().map(Into::into).collect()
}

fn describe_properties(properties: &[Property]) -> String {
    let mut out: String = properties.iter().map(describe_property).collect();
    out.push_str(&format!("{} properties\n", properties.len()));
    out
}

fn describe_activities(activities: &[Activity]) -> String {
    activities
        .iter()
        .map(|a| {
            let details = a
                .details
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{} {:<18} {details}\n", format_timestamp(a.at), a.action)
        })
        .collect()
}

fn describe_data_access(access: &DataAccess) -> String {
    let flag = |enabled| if enabled { "enabled" } else { "disabled" };
    format!(
        "zillow:        {}\nreportall:     {}\nwealth-engine: {}\n",
        flag(access.zillow),
        flag(access.reportall),
        flag(access.wealth_engine)
    )
}

pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        session_file,
        json: json_output,
        command,
    } = cli;
    let config = Config::try_load_from_file_or_default(config.as_ref())?;
    let ctx = Context {
        config,
        session_file: SessionFile::new(
            session_file.unwrap_or_else(|| DEFAULT_SESSION_FILE_NAME.into()),
        ),
        out: Output { json: json_output },
    };
    match command {
        Commands::Login(args) => login(&ctx, args),
        Commands::Logout => logout(&ctx),
        Commands::Whoami => whoami(&ctx),
        Commands::Properties(PropertiesArgs { bbox }) => {
            let client = ctx.client()?;
            ctx.actor(&client, Route::Map)?;
            let properties = usecases::properties_in_bbox(&client, &bbox)?;
            ctx.out
                .emit(&property_rows(&properties), || describe_properties(&properties))
        }
        Commands::Search(SearchArgs { text, filters }) => {
            let client = ctx.client()?;
            let actor = ctx.actor(&client, Route::Map)?;
            let request = SearchRequest {
                text: text.join(" "),
                filters: filters.into(),
            };
            let properties = flows::search_properties(&client, &actor, &request)?;
            ctx.out
                .emit(&property_rows(&properties), || describe_properties(&properties))
        }
        Commands::Explore(args) => explore(&ctx, args),
        Commands::Bookmark(cmd) => bookmark(&ctx, cmd),
        Commands::Admin(cmd) => admin(&ctx, cmd),
        Commands::Profile(cmd) => profile(&ctx, cmd),
    }
}

fn login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let LoginArgs {
        email,
        password,
        factor,
        code,
    } = args;
    let password = read_password(password)?;
    let client = ctx.client()?;
    let (_, actor) = flows::sign_in(&client, &client, &email, &password)?;
    if let (Some(factor), Some(code)) = (factor, code) {
        usecases::verify_second_factor(&client, &factor, &code)?;
    }
    ctx.store_session(&client)?;
    ctx.out.emit(
        &json!({ "user_id": actor.user_id.as_str(), "email": actor.email.as_str() }),
        || format!("Signed in as {}\n", actor.email.as_str()),
    )
}

fn logout(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let result = flows::sign_out(&client, &client);
    // The local session is gone either way.
    ctx.session_file.remove()?;
    result?;
    ctx.out.done("Signed out")
}

fn whoami(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let actor = ctx.actor(&client, Route::Profile)?;
    let company = actor
        .company_id
        .as_ref()
        .map(|_| usecases::own_company(&client, ctx.policy(), &actor))
        .transpose()
        .unwrap_or_else(|err| {
            log::debug!("Company of {} is not readable: {err}", actor.user_id);
            None
        });
    let role = actor.role.map(|r| r.to_string());
    ctx.out.emit(
        &json!({
            "user_id": actor.user_id.as_str(),
            "email": actor.email.as_str(),
            "role": role,
            "company_id": actor.company_id.as_ref().map(Id::as_str),
            "company": company.as_ref().map(|c| c.name.as_str()),
        }),
        || {
            let mut out = format!("{} [{}]\n", actor.email.as_str(), actor.user_id);
            out.push_str(&format!("  role:    {}\n", role.as_deref().unwrap_or("-")));
            let company = match (&company, &actor.company_id) {
                (Some(c), _) => c.name.clone(),
                (None, Some(id)) => id.to_string(),
                (None, None) => "-".into(),
            };
            out.push_str(&format!("  company: {company}\n"));
            out
        },
    )
}

fn explore(ctx: &Context, args: ExploreArgs) -> Result<()> {
    let ExploreArgs { center, zoom } = args;
    let client = ctx.client()?;
    let actor = ctx.actor(&client, Route::Map)?;
    let mut view = ctx.config.map.view.clone();
    if let Some(center) = center {
        view.center = center;
    }
    if let Some(zoom) = zoom {
        view.zoom = zoom;
    }
    let client = Arc::new(client);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(explorer::run(
        Arc::clone(&client),
        actor,
        view,
        ctx.config.map.width_px,
        ctx.config.map.height_px,
    ))
}

fn bookmark(ctx: &Context, cmd: BookmarkCommands) -> Result<()> {
    let client = ctx.client()?;
    let actor = ctx.actor(&client, Route::Map)?;
    let policy = ctx.policy();
    match cmd {
        BookmarkCommands::Add { property_id } => {
            let bookmark = flows::add_bookmark(&client, policy, &actor, &property_id)?;
            ctx.out.emit(&json::BookmarkRow::from(bookmark), || {
                format!("Bookmarked property {property_id}\n")
            })
        }
        BookmarkCommands::Remove { property_id, owner } => {
            let owner = owner.unwrap_or_else(|| actor.user_id.to_string());
            flows::remove_bookmark(&client, policy, &actor, &owner, &property_id)?;
            ctx.out.done(&format!("Removed bookmark of property {property_id}"))
        }
        BookmarkCommands::Toggle { property_id } => {
            match flows::toggle_bookmark(&client, policy, &actor, &property_id)? {
                BookmarkToggle::Added(bookmark) => {
                    ctx.out.emit(&json::BookmarkRow::from(bookmark), || {
                        format!("Bookmarked property {property_id}\n")
                    })
                }
                BookmarkToggle::Removed => {
                    ctx.out.done(&format!("Removed bookmark of property {property_id}"))
                }
            }
        }
        BookmarkCommands::List { owner } => {
            let owner = owner.unwrap_or_else(|| actor.user_id.to_string());
            let bookmarks = usecases::bookmarked_properties(&client, policy, &actor, &owner)?;
            let properties: Vec<_> = bookmarks.into_iter().map(|(_, p)| p).collect();
            ctx.out
                .emit(&property_rows(&properties), || describe_properties(&properties))
        }
    }
}

fn admin(ctx: &Context, cmd: AdminCommands) -> Result<()> {
    let client = ctx.client()?;
    let policy = ctx.policy();
    match cmd {
        AdminCommands::RegisterCompany { name, logo } => {
            let actor = ctx.actor(&client, Route::CompanyRegistration)?;
            let logo = logo.as_deref().map(logo_upload).transpose()?;
            let company =
                flows::register_company(&client, &client, policy, &actor, NewCompany { name, logo })?;
            ctx.out.emit(&json::CompanyRow::from(company.clone()), || {
                format!("Registered {} [{}]\n", company.name, company.id)
            })
        }
        AdminCommands::Invite { email, role } => {
            let actor = ctx.actor(&client, Route::AdminEmployees)?;
            let invite = flows::invite_employee(&client, policy, &actor, NewInvite { email, role })?;
            ctx.out.emit(&json::InviteRow::from(invite.clone()), || {
                format!("Invited {} as {} [{}]\n", invite.email.as_str(), invite.role, invite.id)
            })
        }
        AdminCommands::Invites => {
            let actor = ctx.actor(&client, Route::AdminEmployees)?;
            let invites = usecases::pending_invites(&client, policy, &actor)?;
            let rows: Vec<json::InviteRow> = invites.iter().cloned().map(Into::into).collect();
            ctx.out.emit(&rows, || {
                invites
                    .iter()
                    .map(|i| {
                        format!(
                            "{} {:<8} {} [{}]\n",
                            format_timestamp(i.created_at),
                            i.role,
                            i.email.as_str(),
                            i.id
                        )
                    })
                    .collect()
            })
        }
        AdminCommands::AcceptInvite {
            invite_id,
            email,
            password,
        } => {
            let password = read_password(password)?;
            let user = flows::accept_invite(&client, &client, &invite_id, &email, &password)?;
            ctx.out.emit(&json::UserRow::from(user.clone()), || {
                format!(
                    "Welcome {}! Sign in with: wealthmap login --email {}\n",
                    user.email.as_str(),
                    user.email.as_str()
                )
            })
        }
        AdminCommands::SetRole { user_id, role } => {
            let actor = ctx.actor(&client, Route::AdminEmployees)?;
            let permission = flows::change_employee_role(&client, policy, &actor, &user_id, role)?;
            ctx.out.emit(&json::PermissionRow::from(permission), || {
                format!("User {user_id} is now {role}\n")
            })
        }
        AdminCommands::Revoke { user_id } => {
            let actor = ctx.actor(&client, Route::AdminEmployees)?;
            flows::revoke_employee(&client, policy, &actor, &user_id)?;
            ctx.out.done(&format!("Revoked access of user {user_id}"))
        }
        AdminCommands::Employees => {
            let actor = ctx.actor(&client, Route::AdminEmployees)?;
            let employees = usecases::list_employees(&client, policy, &actor)?;
            let rows: Vec<_> = employees
                .iter()
                .map(|e| {
                    json!({
                        "user": json::UserRow::from(e.user.clone()),
                        "role": e.role.map(|r| r.to_string()),
                        "activity_count": e.activity_count,
                    })
                })
                .collect();
            ctx.out.emit(&rows, || {
                employees
                    .iter()
                    .map(|e| {
                        let role = e.role.map(|r| r.to_string()).unwrap_or_else(|| "-".into());
                        format!(
                            "{:<30} {role:<8} {:>5} activities [{}]\n",
                            e.user.email.as_str(),
                            e.activity_count,
                            e.user.id
                        )
                    })
                    .collect()
            })
        }
        AdminCommands::DataAccess {
            zillow,
            reportall,
            wealth_engine,
        } => {
            let actor = ctx.actor(&client, Route::AdminDataPreferences)?;
            let company = usecases::own_company(&client, policy, &actor)?;
            let changes = [
                (DataSource::Zillow, zillow),
                (DataSource::Reportall, reportall),
                (DataSource::WealthEngine, wealth_engine),
            ];
            let company = if changes.iter().any(|(_, enabled)| enabled.is_some()) {
                let mut access = company.data_access;
                for (source, enabled) in changes {
                    if let Some(enabled) = enabled {
                        access.set(source, enabled);
                    }
                }
                flows::update_data_access(&client, policy, &actor, access)?
            } else {
                company
            };
            ctx.out
                .emit(&json::DataAccess::from(company.data_access), || {
                    describe_data_access(&company.data_access)
                })
        }
        AdminCommands::Activity { user_id, page } => {
            let actor = ctx.actor(&client, Route::AdminEmployees)?;
            let activities =
                usecases::employee_activity(&client, policy, &actor, &user_id, &page.into())?;
            let rows: Vec<json::ActivityRow> = activities.iter().cloned().map(Into::into).collect();
            ctx.out.emit(&rows, || describe_activities(&activities))
        }
        AdminCommands::Stats => {
            let actor = ctx.actor(&client, Route::AdminDashboard)?;
            let stats = usecases::dashboard_stats(&client, policy, &actor)?;
            ctx.out.emit(
                &json!({
                    "employees": stats.employees,
                    "properties": stats.properties,
                    "logins": stats.logins,
                    "searches": stats.searches,
                }),
                || {
                    format!(
                        "employees:  {}\nbookmarked: {}\nlogins:     {}\nsearches:   {}\n",
                        stats.employees, stats.properties, stats.logins, stats.searches
                    )
                },
            )
        }
    }
}

fn profile(ctx: &Context, cmd: ProfileCommands) -> Result<()> {
    let client = ctx.client()?;
    let actor = ctx.actor(&client, Route::Profile)?;
    let policy = ctx.policy();
    match cmd {
        ProfileCommands::Notifications { sms, email } => {
            let user = client
                .try_get_user(actor.user_id.as_str())?
                .ok_or(usecases::Error::UserDoesNotExist)?;
            let mut prefs = user.notification_prefs;
            let user = if sms.is_some() || email.is_some() {
                prefs.sms = sms.unwrap_or(prefs.sms);
                prefs.email = email.unwrap_or(prefs.email);
                flows::update_notification_prefs(&client, policy, &actor, prefs)?
            } else {
                user
            };
            let prefs = user.notification_prefs;
            ctx.out.emit(&json::NotificationPrefs::from(prefs), || {
                format!("sms:   {}\nemail: {}\n", prefs.sms, prefs.email)
            })
        }
        ProfileCommands::EnrollMfa => {
            let enrollment = usecases::enroll_second_factor(&client)?;
            ctx.out.emit(
                &json!({
                    "factor_id": enrollment.factor_id.as_str(),
                    "totp_uri": enrollment.totp_uri,
                    "secret": enrollment.secret,
                }),
                || {
                    format!(
                        "Add this secret to your authenticator app: {}\n{}\n\
                         Then sign in with: wealthmap login --email {} --factor {} --code <CODE>\n",
                        enrollment.secret,
                        enrollment.totp_uri,
                        actor.email.as_str(),
                        enrollment.factor_id
                    )
                },
            )
        }
        ProfileCommands::Activity { page } => {
            let pagination = Pagination::from(page);
            let activities = usecases::own_activity(&client, policy, &actor, &pagination)?;
            let rows: Vec<json::ActivityRow> = activities.iter().cloned().map(Into::into).collect();
            ctx.out.emit(&rows, || describe_activities(&activities))
        }
    }
}
