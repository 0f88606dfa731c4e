use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use wealthmap_core::{
    entities::{MapBbox, MapPoint, Role},
    repositories::Pagination,
    usecases::SearchFilters,
};

#[derive(Parser)]
#[command(name = "wealthmap", version, about = "Property research on a map")]
pub struct Cli {
    /// Configuration file (default: wealthmap.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Where the signed-in session is stored
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login(LoginArgs),
    Logout,
    /// Show the signed-in user, role and company
    Whoami,
    /// List the properties inside a bounding box
    Properties(PropertiesArgs),
    /// Search properties by text and filters
    Search(SearchArgs),
    /// Explore the property map interactively
    Explore(ExploreArgs),
    #[command(subcommand)]
    Bookmark(BookmarkCommands),
    #[command(subcommand)]
    Admin(AdminCommands),
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    /// Read from stdin if omitted
    #[arg(long)]
    pub password: Option<String>,
    /// Id of an enrolled TOTP factor
    #[arg(long, requires = "code")]
    pub factor: Option<String>,
    /// Current 6 digit TOTP code
    #[arg(long, requires = "factor")]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct PropertiesArgs {
    /// sw_lat,sw_lng,ne_lat,ne_lng
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: MapBbox,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Minimum property value in USD
    #[arg(long)]
    pub min_value: Option<u64>,
    /// Maximum property value in USD
    #[arg(long)]
    pub max_value: Option<u64>,
    /// Minimum living area in square feet
    #[arg(long)]
    pub min_size: Option<u32>,
    /// Maximum living area in square feet
    #[arg(long)]
    pub max_size: Option<u32>,
    #[arg(long)]
    pub zip: Option<String>,
}

impl From<FilterArgs> for SearchFilters {
    fn from(from: FilterArgs) -> Self {
        let FilterArgs {
            min_value,
            max_value,
            min_size,
            max_size,
            zip,
        } = from;
        Self {
            min_value_usd: min_value,
            max_value_usd: max_value,
            min_size_sqft: min_size,
            max_size_sqft: max_size,
            zip_code: zip,
        }
    }
}

#[derive(Args)]
pub struct SearchArgs {
    /// Matched against address and owner name
    pub text: Vec<String>,
    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args)]
pub struct ExploreArgs {
    /// lat,lng (default from the configuration)
    #[arg(long, allow_hyphen_values = true)]
    pub center: Option<MapPoint>,
    #[arg(long)]
    pub zoom: Option<f64>,
}

#[derive(Subcommand)]
pub enum BookmarkCommands {
    Add {
        property_id: String,
    },
    Remove {
        property_id: String,
        /// Remove the bookmark of another user
        #[arg(long)]
        owner: Option<String>,
    },
    Toggle {
        property_id: String,
    },
    List {
        /// List the bookmarks of another user
        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PageArgs {
    #[arg(long)]
    pub offset: Option<u64>,
    #[arg(long)]
    pub limit: Option<u64>,
}

impl From<PageArgs> for Pagination {
    fn from(from: PageArgs) -> Self {
        let PageArgs { offset, limit } = from;
        Self { offset, limit }
    }
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Register the company of the signed-in admin
    RegisterCompany {
        #[arg(long)]
        name: String,
        /// PNG, JPEG, SVG or WebP image
        #[arg(long)]
        logo: Option<PathBuf>,
    },
    /// Invite an employee by email
    Invite {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "employee")]
        role: Role,
    },
    /// List pending invitations
    Invites,
    /// Accept an invitation and create the account
    AcceptInvite {
        invite_id: String,
        #[arg(long)]
        email: String,
        /// Read from stdin if omitted
        #[arg(long)]
        password: Option<String>,
    },
    SetRole {
        user_id: String,
        #[arg(long)]
        role: Role,
    },
    /// Remove an employee from the company
    Revoke {
        user_id: String,
    },
    Employees,
    /// Show or change the enabled data sources
    DataAccess {
        #[arg(long)]
        zillow: Option<bool>,
        #[arg(long)]
        reportall: Option<bool>,
        #[arg(long)]
        wealth_engine: Option<bool>,
    },
    /// Activity log of an employee
    Activity {
        user_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Stats,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show or change the notification preferences
    Notifications {
        #[arg(long)]
        sms: Option<bool>,
        #[arg(long)]
        email: Option<bool>,
    },
    /// Register a TOTP authenticator app
    EnrollMfa,
    /// Own activity log
    Activity {
        #[command(flatten)]
        page: PageArgs,
    },
}
