//! SQLite storage layer
//!
//! Backs both collaborator traits: [`WardenDirectory`] for the roster engine
//! and [`AdminAccounts`] for the profile pages.

mod admins;
mod migrations;
mod parse;
mod wardens;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;
use tracing::{info, instrument, warn};

use crate::directory::{AdminAccounts, WardenDirectory};
use crate::error::{Error, Result};
use crate::models::{Admin, AdminProfile, AdminSession, ProfileUpdate, Warden, WardenStatus};
use crate::password::{hash_password, verify_password};

use parse::OptionalExt;

pub use admins::AdminStore;
pub use wardens::{WardenRegistration, WardenStore};

/// Main database handle
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Initialize database schema via migrations
    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // a panic mid-statement leaves no Rust-side state to repair
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the connection
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock();
        f(&conn)
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<u32> {
        let version: Option<u32> = self
            .lock()
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .optional()?
            .flatten();
        Ok(version.unwrap_or(0))
    }

    /// Store a new registration with status `new`
    pub fn register_warden(&self, registration: WardenRegistration) -> Result<Warden> {
        let warden = self.with_conn(|c| WardenStore::new(c).register(registration))?;
        info!(id = %warden.id, warden_id = %warden.warden_id, "Registered warden");
        Ok(warden)
    }

    /// Store a complete warden record as-is
    pub fn insert_warden(&self, warden: &Warden) -> Result<()> {
        self.with_conn(|c| WardenStore::new(c).insert(warden))
    }

    /// Create an admin account with a hashed password
    pub fn create_admin(&self, email: &str, full_name: &str, password: &str) -> Result<Admin> {
        let admin = Admin::new(
            email.trim().to_string(),
            full_name.trim().to_string(),
            hash_password(password)?,
        );
        self.with_conn(|c| AdminStore::new(c).create(&admin))?;
        info!(email = %admin.email, "Created admin account");
        Ok(admin)
    }

    /// Check credentials and open a session
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, email: &str, password: &str) -> Result<AdminSession> {
        let admin = self
            .with_conn(|c| AdminStore::new(c).find_by_email(email))?
            .ok_or_else(|| Error::Authentication("Unknown admin email".to_string()))?;

        if !verify_password(password, &admin.password_hash)? {
            warn!("Rejected admin sign-in");
            return Err(Error::Authentication("Invalid password".to_string()));
        }

        Ok(AdminSession::new(admin.id, admin.email))
    }

    fn session_admin(&self, session: &AdminSession) -> Result<Admin> {
        self.with_conn(|c| AdminStore::new(c).find_by_id(session.admin_id))?
            .ok_or_else(|| Error::Authentication("No admin is currently signed in".to_string()))
    }
}

#[async_trait]
impl WardenDirectory for Database {
    async fn list_wardens(&self) -> Result<Vec<Warden>> {
        self.with_conn(|c| WardenStore::new(c).list_all())
    }

    async fn set_warden_status(&self, id: &str, status: WardenStatus) -> Result<()> {
        self.with_conn(|c| WardenStore::new(c).set_status(id, status))
    }
}

#[async_trait]
impl AdminAccounts for Database {
    async fn profile(&self, session: &AdminSession) -> Result<AdminProfile> {
        Ok(self.session_admin(session)?.profile())
    }

    async fn update_profile(&self, session: &AdminSession, update: &ProfileUpdate) -> Result<()> {
        let admin = self.session_admin(session)?;
        self.with_conn(|c| AdminStore::new(c).update_profile(admin.id, update))
    }

    async fn verify_password(&self, session: &AdminSession, password: &str) -> Result<bool> {
        let admin = self.session_admin(session)?;
        verify_password(password, &admin.password_hash)
    }

    async fn update_password(&self, session: &AdminSession, new_password: &str) -> Result<()> {
        let admin = self.session_admin(session)?;
        let hash = hash_password(new_password)?;
        self.with_conn(|c| AdminStore::new(c).update_password_hash(admin.id, &hash))
    }
}
