//! Hostel Admin Core Library
//!
//! Warden roster engine, data-access traits, dashboard summary, admin
//! profile management and SQLite storage for the hostel admin dashboard.

pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod invariants;
pub mod models;
pub mod password;
pub mod profile;
pub mod roster;
pub mod storage;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use dashboard::{DashboardSummary, HostelRow, TrendSeries, MONTH_LABELS};
pub use directory::{AdminAccounts, WardenDirectory};
pub use error::{Error, Result};
pub use models::*;
pub use profile::{AccountError, ValidationErrors};
pub use roster::{
    monthly_creation_histogram, visible_subset, RosterEngine, TransitionError, TransitionPolicy,
    WardenAction,
};
pub use storage::{Database, WardenRegistration};
