//! Data-access collaborator traits
//!
//! These traits are the seam between the roster engine and whatever store
//! holds the warden documents (SQLite here, a remote document database in
//! production, fakes in tests).

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AdminProfile, AdminSession, ProfileUpdate, Warden, WardenStatus};

/// Warden records and status commands
#[async_trait]
pub trait WardenDirectory: Send + Sync {
    /// Fetch every warden with its hostel and rooms already attached
    async fn list_wardens(&self) -> Result<Vec<Warden>>;

    /// Overwrite the status of a single warden
    async fn set_warden_status(&self, id: &str, status: WardenStatus) -> Result<()>;
}

/// Admin profile and credential operations, scoped by the caller's session
#[async_trait]
pub trait AdminAccounts: Send + Sync {
    async fn profile(&self, session: &AdminSession) -> Result<AdminProfile>;

    async fn update_profile(&self, session: &AdminSession, update: &ProfileUpdate) -> Result<()>;

    /// Whether `password` is the signed-in admin's current password
    async fn verify_password(&self, session: &AdminSession, password: &str) -> Result<bool>;

    async fn update_password(&self, session: &AdminSession, new_password: &str) -> Result<()>;
}

#[async_trait]
impl<T: WardenDirectory + ?Sized> WardenDirectory for std::sync::Arc<T> {
    async fn list_wardens(&self) -> Result<Vec<Warden>> {
        (**self).list_wardens().await
    }

    async fn set_warden_status(&self, id: &str, status: WardenStatus) -> Result<()> {
        (**self).set_warden_status(id, status).await
    }
}
