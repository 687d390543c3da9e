//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hostel_admin_core::WardenTab;

#[derive(Parser, Debug)]
#[command(
    name = "hostel-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for hostel warden accounts"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "HOSTEL_ADMIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List wardens in one status tab
    List {
        /// new, active, banned or rejected
        #[arg(short, long, default_value = "new")]
        tab: WardenTab,

        /// Filter by warden name, hostel name or location
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show a warden with hostel and room details
    Show { id: String },

    /// Approve a new registration
    Approve { id: String },

    /// Reject a new registration
    Reject { id: String },

    /// Ban an active warden
    Ban { id: String },

    /// Reactivate a banned warden
    Reactivate { id: String },

    /// Delete a warden account
    Delete { id: String },

    /// Totals, monthly trend and active hostels
    Dashboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import warden registrations from a JSON file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Create an admin account
    CreateAdmin {
        email: String,
        name: String,
        password: String,
    },

    /// Show or edit the admin profile
    Profile {
        #[command(flatten)]
        credentials: Credentials,

        #[command(flatten)]
        update: ProfileArgs,
    },

    /// Change the admin password
    Passwd {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(long = "new", value_name = "PASSWORD")]
        new_password: String,

        #[arg(long = "confirm", value_name = "PASSWORD")]
        confirm_password: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "HOSTEL_ADMIN_PASSWORD")]
    pub password: String,
}

/// Profile fields to change; omitted fields keep their value
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub photo_url: Option<String>,
}

impl ProfileArgs {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.state.is_none()
            && self.photo_url.is_none()
    }
}
